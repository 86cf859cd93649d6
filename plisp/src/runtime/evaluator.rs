//! Tree-walking evaluator.

use crate::ast::{Expression, Form};
use crate::config::EvaluatorConfig;
use crate::runtime::environment::Env;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::host_interface::{IoHost, StdioHost};
use crate::runtime::values::{Closure, EvalPolicy, Function, Value};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Interprets expressions against environments.
///
/// Holds no bindings of its own: every call names the environment to work in. The host
/// backs the I/O builtins and the depth counter enforces `max_depth` when one is set.
#[derive(Clone)]
pub struct Evaluator {
    host: Rc<dyn IoHost>,
    config: EvaluatorConfig,
    depth: Rc<Cell<usize>>,
}

impl Evaluator {
    pub fn new(host: Rc<dyn IoHost>) -> Self {
        Self::with_config(host, EvaluatorConfig::default())
    }

    pub fn with_config(host: Rc<dyn IoHost>, config: EvaluatorConfig) -> Self {
        Evaluator {
            host,
            config,
            depth: Rc::new(Cell::new(0)),
        }
    }

    pub fn host(&self) -> &dyn IoHost {
        self.host.as_ref()
    }

    pub fn eval(&self, env: &Env, expr: &Expression) -> RuntimeResult<Value> {
        match expr.form() {
            Form::Atom(value) => Ok(value.clone()),
            Form::Symbol(symbol) => env.lookup(symbol),
            Form::Compound(items) => {
                let _guard = DepthGuard::enter(&self.depth, self.config.max_depth)?;
                self.eval_compound(env, items)
            }
        }
    }

    fn eval_compound(&self, env: &Env, items: &[Value]) -> RuntimeResult<Value> {
        let (head, operands) = items
            .split_first()
            .ok_or_else(|| RuntimeError::malformed("cannot evaluate an empty compound"))?;

        let function = match self.eval(env, head)? {
            Value::Function(function) => function,
            other => {
                return Err(RuntimeError::type_mismatch(
                    "function",
                    other.type_name(),
                    "call",
                ))
            }
        };

        let args = match function.policy() {
            EvalPolicy::Eager => operands
                .iter()
                .map(|operand| self.eval(env, operand))
                .collect::<RuntimeResult<Vec<_>>>()?,
            EvalPolicy::CallByName => operands.to_vec(),
        };

        self.invoke(env, &function, args)
    }

    /// Calls a function value with arguments that are passed through as-is.
    ///
    /// This is the entry used by `apply` and the higher-order builtins.
    pub fn call_function(&self, env: &Env, callee: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
        match callee {
            Value::Function(function) => self.invoke(env, function, args),
            other => Err(RuntimeError::type_mismatch(
                "function",
                other.type_name(),
                "call",
            )),
        }
    }

    fn invoke(&self, env: &Env, function: &Function, args: Vec<Value>) -> RuntimeResult<Value> {
        match function {
            Function::Builtin(builtin) => {
                if !builtin.arity.accepts(args.len()) {
                    return Err(match builtin.policy {
                        EvalPolicy::CallByName => RuntimeError::malformed(format!(
                            "'{}' takes {} operands, got {}",
                            builtin.name,
                            builtin.arity,
                            args.len()
                        )),
                        EvalPolicy::Eager => RuntimeError::ArityMismatch {
                            function: builtin.name.clone(),
                            expected: builtin.arity.to_string(),
                            actual: args.len(),
                        },
                    });
                }
                trace!(builtin = %builtin.name, argc = args.len(), "invoke");
                (builtin.func)(self, env, args)
            }
            Function::Closure(closure) => self.apply_closure(closure, args),
        }
    }

    /// Binds parameters positionally in a fresh child of the defining scope, then
    /// evaluates the body there. Surplus arguments are dropped; parameters without an
    /// argument stay unbound.
    fn apply_closure(&self, closure: &Closure, args: Vec<Value>) -> RuntimeResult<Value> {
        trace!(params = closure.params.len(), argc = args.len(), "invoke lambda");
        let call_env = closure.env.child();
        for (param, arg) in closure.params.iter().zip(args) {
            call_env.define(param.clone(), arg);
        }
        self.eval(&call_env, &closure.body)
    }

    /// Evaluates each expression in order and returns the last value (nil when empty).
    pub fn eval_sequence(&self, env: &Env, exprs: &[Value]) -> RuntimeResult<Value> {
        let mut result = Value::Nil;
        for expr in exprs {
            result = self.eval(env, expr)?;
        }
        Ok(result)
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("host", &self.host)
            .field("config", &self.config)
            .field("depth", &self.depth.get())
            .finish()
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new(Rc::new(StdioHost))
    }
}

struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<usize>, limit: Option<usize>) -> RuntimeResult<Self> {
        let next = depth.get().saturating_add(1);
        if let Some(limit) = limit {
            if next > limit {
                return Err(RuntimeError::RecursionLimit { limit });
            }
        }
        depth.set(next);
        Ok(DepthGuard { depth })
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}
