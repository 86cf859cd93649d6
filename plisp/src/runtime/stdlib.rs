//! plisp Standard Library
//!
//! Builds the root environment every program runs under. The library is organized into
//! categories:
//! - Meta forms (`eval`, `quote`)
//! - Binding forms (`set`, `setq`, `let`, `lambda`)
//! - Console I/O (`print`, `read`)
//! - Control flow (`begin`, `dowhile`, `loop`, `if`, `cond`)
//! - Constants (`t`, `otherwise`, `nil`)
//! - Arithmetic, comparison and boolean logic
//! - Higher-order and list functions

use crate::ast::Symbol;
use crate::reader;
use crate::runtime::environment::Env;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::evaluator::Evaluator;
use crate::runtime::host_interface::end_of_input;
use crate::runtime::values::{Arity, BuiltinFunction, Closure, EvalPolicy, Function, Value};
use std::cmp::Ordering;
use std::rc::Rc;
use tracing::{debug, trace};

/// The Standard Library for the plisp runtime.
///
/// Responsible for creating the root environment and loading all the built-in
/// procedures and constants into it.
pub struct StandardLibrary;

impl StandardLibrary {
    /// Creates a new root environment populated with every builtin and constant.
    pub fn create_global_environment() -> Env {
        let env = Env::new();

        Self::load_meta_forms(&env);
        Self::load_binding_forms(&env);
        Self::load_io_functions(&env);
        Self::load_control_forms(&env);
        Self::load_constants(&env);
        Self::load_arithmetic_functions(&env);
        Self::load_comparison_functions(&env);
        Self::load_logic_functions(&env);
        Self::load_higher_order_functions(&env);
        Self::load_list_functions(&env);

        debug!(bindings = env.binding_count(), "loaded standard library");
        env
    }

    /// Binds one builtin under every name in `names`. Aliases share the same function.
    fn define_builtin<F>(env: &Env, names: &[&str], arity: Arity, policy: EvalPolicy, func: F)
    where
        F: Fn(&Evaluator, &Env, Vec<Value>) -> RuntimeResult<Value> + 'static,
    {
        let Some(primary) = names.first() else {
            return;
        };
        let builtin = Value::Function(Function::Builtin(BuiltinFunction::new(
            primary, arity, policy, func,
        )));
        for name in names {
            env.define(Symbol::from(*name), builtin.clone());
        }
    }

    fn load_meta_forms(env: &Env) {
        Self::define_builtin(env, &["eval"], Arity::Fixed(1), EvalPolicy::Eager, Self::eval);
        Self::define_builtin(
            env,
            &["quote"],
            Arity::Fixed(1),
            EvalPolicy::CallByName,
            Self::quote,
        );
    }

    fn load_binding_forms(env: &Env) {
        Self::define_builtin(env, &["set"], Arity::Fixed(2), EvalPolicy::Eager, Self::set);
        Self::define_builtin(
            env,
            &["setq"],
            Arity::Fixed(2),
            EvalPolicy::CallByName,
            Self::setq,
        );
        Self::define_builtin(env, &["let"], Arity::Fixed(2), EvalPolicy::CallByName, Self::let_);
        Self::define_builtin(
            env,
            &["lambda"],
            Arity::Fixed(2),
            EvalPolicy::CallByName,
            Self::lambda,
        );
    }

    fn load_io_functions(env: &Env) {
        Self::define_builtin(env, &["print"], Arity::Fixed(1), EvalPolicy::Eager, Self::print);
        Self::define_builtin(env, &["read"], Arity::Fixed(0), EvalPolicy::Eager, Self::read);
    }

    fn load_control_forms(env: &Env) {
        Self::define_builtin(
            env,
            &["begin"],
            Arity::Variadic(0),
            EvalPolicy::CallByName,
            |evaluator, env, args| evaluator.eval_sequence(env, &args),
        );
        Self::define_builtin(
            env,
            &["dowhile"],
            Arity::Variadic(0),
            EvalPolicy::CallByName,
            Self::dowhile,
        );
        Self::define_builtin(
            env,
            &["loop"],
            Arity::Variadic(0),
            EvalPolicy::CallByName,
            Self::loop_,
        );
        Self::define_builtin(env, &["if"], Arity::Range(2, 3), EvalPolicy::CallByName, Self::if_);
        Self::define_builtin(
            env,
            &["cond"],
            Arity::Variadic(0),
            EvalPolicy::CallByName,
            Self::cond,
        );
    }

    fn load_constants(env: &Env) {
        env.define(Symbol::from("otherwise"), Value::Boolean(true));
        env.define(Symbol::from("t"), Value::Boolean(true));
        env.define(Symbol::from("nil"), Value::Boolean(false));
    }

    fn load_arithmetic_functions(env: &Env) {
        Self::define_builtin(env, &["+"], Arity::Variadic(0), EvalPolicy::Eager, Self::add);
        Self::define_builtin(env, &["-"], Arity::Fixed(2), EvalPolicy::Eager, Self::subtract);
        Self::define_builtin(env, &["*"], Arity::Fixed(2), EvalPolicy::Eager, Self::multiply);
        Self::define_builtin(env, &["/"], Arity::Fixed(2), EvalPolicy::Eager, Self::divide);
        Self::define_builtin(env, &["%"], Arity::Fixed(2), EvalPolicy::Eager, Self::modulo);
    }

    fn load_comparison_functions(env: &Env) {
        Self::define_builtin(env, &["=="], Arity::Fixed(2), EvalPolicy::Eager, |_, _, args| {
            let [a, b] = fixed("==", args)?;
            Ok(Value::Boolean(values_equal(&a, &b)))
        });
        Self::define_builtin(env, &["!="], Arity::Fixed(2), EvalPolicy::Eager, |_, _, args| {
            let [a, b] = fixed("!=", args)?;
            Ok(Value::Boolean(!values_equal(&a, &b)))
        });

        let orderings: [(&'static str, fn(Ordering) -> bool); 4] = [
            ("<", Ordering::is_lt),
            (">", Ordering::is_gt),
            ("<=", Ordering::is_le),
            (">=", Ordering::is_ge),
        ];
        for (name, test) in orderings {
            Self::define_builtin(env, &[name], Arity::Fixed(2), EvalPolicy::Eager, move |_, _, args| {
                let [a, b] = fixed(name, args)?;
                Ok(Value::Boolean(test(compare_values(&a, &b, name)?)))
            });
        }
    }

    fn load_logic_functions(env: &Env) {
        Self::define_builtin(env, &["and"], Arity::Variadic(0), EvalPolicy::Eager, |_, _, args| {
            Ok(Value::Boolean(args.iter().all(Value::is_truthy)))
        });
        Self::define_builtin(env, &["or"], Arity::Variadic(0), EvalPolicy::Eager, |_, _, args| {
            Ok(Value::Boolean(args.iter().any(Value::is_truthy)))
        });
        Self::define_builtin(env, &["not"], Arity::Fixed(1), EvalPolicy::Eager, |_, _, args| {
            let [value] = fixed("not", args)?;
            Ok(Value::Boolean(!value.is_truthy()))
        });
    }

    fn load_higher_order_functions(env: &Env) {
        Self::define_builtin(env, &["filter"], Arity::Fixed(2), EvalPolicy::Eager, Self::filter);
        Self::define_builtin(env, &["map"], Arity::Fixed(2), EvalPolicy::Eager, Self::map);
        Self::define_builtin(env, &["reduce"], Arity::Fixed(2), EvalPolicy::Eager, Self::reduce);
        Self::define_builtin(
            env,
            &["partition"],
            Arity::Fixed(2),
            EvalPolicy::Eager,
            Self::partition,
        );
    }

    fn load_list_functions(env: &Env) {
        Self::define_builtin(env, &["apply"], Arity::Fixed(2), EvalPolicy::Eager, Self::apply);
        Self::define_builtin(env, &["list"], Arity::Variadic(0), EvalPolicy::Eager, |_, _, args| {
            Ok(Value::List(args))
        });
        Self::define_builtin(env, &["cons"], Arity::Fixed(2), EvalPolicy::Eager, Self::cons);
        Self::define_builtin(
            env,
            &["first", "car", "head"],
            Arity::Fixed(1),
            EvalPolicy::Eager,
            Self::first,
        );
        Self::define_builtin(
            env,
            &["rest", "cdr", "tail"],
            Arity::Fixed(1),
            EvalPolicy::Eager,
            Self::rest,
        );
        Self::define_builtin(env, &["null"], Arity::Fixed(1), EvalPolicy::Eager, Self::null);
        Self::define_builtin(env, &["concat"], Arity::Fixed(1), EvalPolicy::Eager, |_, _, args| {
            let [lists] = fixed("concat", args)?;
            let lists = expect_list(lists, "concat")?;
            concat(lists, "concat")
        });
        Self::define_builtin(
            env,
            &["append"],
            Arity::Variadic(0),
            EvalPolicy::Eager,
            |_, _, args| concat(args, "append"),
        );
    }

    // --- meta ---

    fn eval(evaluator: &Evaluator, env: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [expr] = fixed("eval", args)?;
        evaluator.eval(env, &expr)
    }

    fn quote(_: &Evaluator, _: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [expr] = fixed("quote", args)?;
        Ok(expr)
    }

    // --- binding ---

    fn set(_: &Evaluator, env: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [key, value] = fixed("set", args)?;
        let name = match key {
            Value::Symbol(symbol) => symbol,
            Value::String(name) => Symbol(name),
            other => {
                return Err(RuntimeError::type_mismatch(
                    "symbol",
                    other.type_name(),
                    "set",
                ))
            }
        };
        trace!(name = %name, "set");
        env.assign(name, value.clone());
        Ok(value)
    }

    fn setq(evaluator: &Evaluator, env: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [key, expr] = fixed("setq", args)?;
        let name = match key {
            Value::Symbol(name) => name,
            other => {
                return Err(RuntimeError::malformed(format!(
                    "setq expects a symbol name, got {}",
                    other.type_name()
                )))
            }
        };
        let value = evaluator.eval(env, &expr)?;
        trace!(name = %name, "setq");
        env.assign(name, value.clone());
        Ok(value)
    }

    /// Bindings are evaluated in the new scope as it fills up, so later bindings see
    /// earlier ones.
    fn let_(evaluator: &Evaluator, env: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [bindings, body] = fixed("let", args)?;
        let Value::List(bindings) = bindings else {
            return Err(RuntimeError::malformed("let bindings must be a list of pairs"));
        };

        let scope = env.child();
        for binding in bindings {
            let (name, expr) = binding_pair(binding)?;
            let value = evaluator.eval(&scope, &expr)?;
            scope.define(name, value);
        }
        evaluator.eval(&scope, &body)
    }

    fn lambda(_: &Evaluator, env: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [params, body] = fixed("lambda", args)?;
        let Value::List(params) = params else {
            return Err(RuntimeError::malformed("lambda parameters must be a list of symbols"));
        };
        let params = params
            .into_iter()
            .map(|param| match param {
                Value::Symbol(symbol) => Ok(symbol),
                other => Err(RuntimeError::malformed(format!(
                    "lambda parameter must be a symbol, got {}",
                    other.type_name()
                ))),
            })
            .collect::<RuntimeResult<Vec<_>>>()?;

        Ok(Value::Function(Function::Closure(Rc::new(Closure {
            env: env.clone(),
            params,
            body,
        }))))
    }

    // --- io ---

    fn print(evaluator: &Evaluator, _: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [value] = fixed("print", args)?;
        evaluator.host().print_line(&value.to_string())?;
        Ok(Value::Nil)
    }

    /// Lines that are not valid literals come back as text.
    fn read(evaluator: &Evaluator, _: &Env, _args: Vec<Value>) -> RuntimeResult<Value> {
        let line = evaluator.host().read_line()?.ok_or_else(end_of_input)?;
        Ok(reader::parse_program(&line).unwrap_or(Value::String(line)))
    }

    // --- control ---

    /// Stops only on the boolean `false`; other falsy results keep the loop going.
    fn dowhile(evaluator: &Evaluator, env: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        loop {
            let result = evaluator.eval_sequence(env, &args)?;
            if result == Value::Boolean(false) {
                return Ok(result);
            }
        }
    }

    fn loop_(evaluator: &Evaluator, env: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        loop {
            evaluator.eval_sequence(env, &args)?;
        }
    }

    fn if_(evaluator: &Evaluator, env: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let mut operands = args.into_iter();
        let (Some(condition), Some(then_branch)) = (operands.next(), operands.next()) else {
            return Err(RuntimeError::malformed("if requires a condition and a branch"));
        };
        let else_branch = operands.next();

        if evaluator.eval(env, &condition)?.is_truthy() {
            evaluator.eval(env, &then_branch)
        } else {
            match else_branch {
                Some(expr) => evaluator.eval(env, &expr),
                None => Ok(Value::Nil),
            }
        }
    }

    fn cond(evaluator: &Evaluator, env: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        for clause in args {
            let [condition, value] = match clause {
                Value::List(pair) => <[Value; 2]>::try_from(pair).map_err(|pair| {
                    RuntimeError::malformed(format!(
                        "cond clause must have 2 elements, got {}",
                        pair.len()
                    ))
                })?,
                other => {
                    return Err(RuntimeError::malformed(format!(
                        "cond clause must be a list, got {}",
                        other.type_name()
                    )))
                }
            };
            if evaluator.eval(env, &condition)?.is_truthy() {
                return evaluator.eval(env, &value);
            }
        }
        Ok(Value::Nil)
    }

    // --- arithmetic ---

    fn add(_: &Evaluator, _: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        args.into_iter().try_fold(Value::Integer(0), |acc, value| {
            arithmetic("+", &acc, &value, i64::checked_add, |a, b| a + b)
        })
    }

    fn subtract(_: &Evaluator, _: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [a, b] = fixed("-", args)?;
        arithmetic("-", &a, &b, i64::checked_sub, |a, b| a - b)
    }

    fn multiply(_: &Evaluator, _: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [a, b] = fixed("*", args)?;
        arithmetic("*", &a, &b, i64::checked_mul, |a, b| a * b)
    }

    fn divide(_: &Evaluator, _: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [a, b] = fixed("/", args)?;
        ensure_nonzero_divisor(&b, "/")?;
        arithmetic("/", &a, &b, floor_div, |a, b| a / b)
    }

    fn modulo(_: &Evaluator, _: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [a, b] = fixed("%", args)?;
        ensure_nonzero_divisor(&b, "%")?;
        arithmetic("%", &a, &b, floor_mod, float_mod)
    }

    // --- higher order ---

    fn filter(evaluator: &Evaluator, env: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [predicate, items] = fixed("filter", args)?;
        let items = expect_list(items, "filter")?;
        let mut kept = Vec::new();
        for item in items {
            if evaluator
                .call_function(env, &predicate, vec![item.clone()])?
                .is_truthy()
            {
                kept.push(item);
            }
        }
        Ok(Value::List(kept))
    }

    fn map(evaluator: &Evaluator, env: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [func, items] = fixed("map", args)?;
        let items = expect_list(items, "map")?;
        items
            .into_iter()
            .map(|item| evaluator.call_function(env, &func, vec![item]))
            .collect::<RuntimeResult<Vec<_>>>()
            .map(Value::List)
    }

    /// Left fold seeded with the first element.
    fn reduce(evaluator: &Evaluator, env: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [func, items] = fixed("reduce", args)?;
        let mut items = expect_list(items, "reduce")?.into_iter();
        let seed = items.next().ok_or_else(|| RuntimeError::EmptySequence {
            operation: "reduce".to_string(),
        })?;
        items.try_fold(seed, |acc, item| {
            evaluator.call_function(env, &func, vec![acc, item])
        })
    }

    /// `[matching, non-matching]`, each in input order. The predicate runs once per element.
    fn partition(evaluator: &Evaluator, env: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [predicate, items] = fixed("partition", args)?;
        let items = expect_list(items, "partition")?;
        let mut matching = Vec::new();
        let mut rest = Vec::new();
        for item in items {
            if evaluator
                .call_function(env, &predicate, vec![item.clone()])?
                .is_truthy()
            {
                matching.push(item);
            } else {
                rest.push(item);
            }
        }
        Ok(Value::List(vec![Value::List(matching), Value::List(rest)]))
    }

    // --- lists ---

    fn apply(evaluator: &Evaluator, env: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [func, call_args] = fixed("apply", args)?;
        let call_args = expect_list(call_args, "apply")?;
        evaluator.call_function(env, &func, call_args)
    }

    fn cons(_: &Evaluator, _: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [head, tail] = fixed("cons", args)?;
        let tail = expect_list(tail, "cons")?;
        let mut items = Vec::with_capacity(tail.len() + 1);
        items.push(head);
        items.extend(tail);
        Ok(Value::List(items))
    }

    fn first(_: &Evaluator, _: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [items] = fixed("first", args)?;
        expect_list(items, "first")?
            .into_iter()
            .next()
            .ok_or_else(|| RuntimeError::IndexOutOfRange {
                operation: "first".to_string(),
            })
    }

    fn rest(_: &Evaluator, _: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [items] = fixed("rest", args)?;
        let items = expect_list(items, "rest")?;
        Ok(Value::List(items.into_iter().skip(1).collect()))
    }

    fn null(_: &Evaluator, _: &Env, args: Vec<Value>) -> RuntimeResult<Value> {
        let [value] = fixed("null", args)?;
        match value {
            Value::List(items) => Ok(Value::Boolean(items.is_empty())),
            Value::String(s) => Ok(Value::Boolean(s.is_empty())),
            other => Err(RuntimeError::type_mismatch(
                "list or text",
                other.type_name(),
                "null",
            )),
        }
    }
}

/// Moves a checked argument vector into a fixed-size array.
fn fixed<const N: usize>(function: &str, args: Vec<Value>) -> RuntimeResult<[Value; N]> {
    let actual = args.len();
    <[Value; N]>::try_from(args).map_err(|_| RuntimeError::ArityMismatch {
        function: function.to_string(),
        expected: N.to_string(),
        actual,
    })
}

fn expect_list(value: Value, operation: &str) -> RuntimeResult<Vec<Value>> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(RuntimeError::type_mismatch("list", other.type_name(), operation)),
    }
}

fn binding_pair(binding: Value) -> RuntimeResult<(Symbol, Value)> {
    match binding {
        Value::List(pair) => match <[Value; 2]>::try_from(pair) {
            Ok([Value::Symbol(name), expr]) => Ok((name, expr)),
            Ok([other, _]) => Err(RuntimeError::malformed(format!(
                "let binding name must be a symbol, got {}",
                other.type_name()
            ))),
            Err(pair) => Err(RuntimeError::malformed(format!(
                "let binding must have 2 elements, got {}",
                pair.len()
            ))),
        },
        other => Err(RuntimeError::malformed(format!(
            "let binding must be a list, got {}",
            other.type_name()
        ))),
    }
}

fn concat(lists: Vec<Value>, operation: &str) -> RuntimeResult<Value> {
    let mut result = Vec::new();
    for list in lists {
        result.extend(expect_list(list, operation)?);
    }
    Ok(Value::List(result))
}

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn of(value: &Value, operation: &str) -> RuntimeResult<Self> {
        match value {
            Value::Integer(n) => Ok(Number::Int(*n)),
            Value::Float(x) => Ok(Number::Float(*x)),
            other => Err(RuntimeError::type_mismatch("number", other.type_name(), operation)),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(x) => x,
        }
    }
}

/// Integer pairs stay integral (overflow is an error); any float operand promotes both.
fn arithmetic(
    operation: &str,
    a: &Value,
    b: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> RuntimeResult<Value> {
    match (Number::of(a, operation)?, Number::of(b, operation)?) {
        (Number::Int(x), Number::Int(y)) => int_op(x, y).map(Value::Integer).ok_or_else(|| {
            RuntimeError::ArithmeticOverflow {
                operation: operation.to_string(),
            }
        }),
        (x, y) => Ok(Value::Float(float_op(x.as_f64(), y.as_f64()))),
    }
}

fn ensure_nonzero_divisor(divisor: &Value, operation: &str) -> RuntimeResult<()> {
    match Number::of(divisor, operation)? {
        Number::Int(0) => Err(RuntimeError::DivisionByZero),
        Number::Float(x) if x == 0.0 => Err(RuntimeError::DivisionByZero),
        _ => Ok(()),
    }
}

/// Rounds toward negative infinity.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let quotient = a.checked_div(b)?;
    let remainder = a.checked_rem(b)?;
    if remainder != 0 && ((remainder < 0) != (b < 0)) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

/// Result takes the sign of the divisor.
fn floor_mod(a: i64, b: i64) -> Option<i64> {
    let remainder = a.checked_rem(b)?;
    if remainder != 0 && ((remainder < 0) != (b < 0)) {
        remainder.checked_add(b)
    } else {
        Some(remainder)
    }
}

fn float_mod(a: f64, b: f64) -> f64 {
    let remainder = a % b;
    if remainder != 0.0 && ((remainder < 0.0) != (b < 0.0)) {
        remainder + b
    } else {
        remainder
    }
}

/// Structural equality where integers and floats compare by numeric value.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Integer(x), Value::Float(y)) | (Value::Float(y), Value::Integer(x)) => {
            compare_int_float(*x, *y) == Some(Ordering::Equal)
        }
        (Value::List(xs), Value::List(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        _ => a == b,
    }
}

/// Exact ordering of an integer against a float; `None` only for NaN.
fn compare_int_float(int: i64, float: f64) -> Option<Ordering> {
    // 2^63 is exactly representable; every float in [-2^63, 2^63) converts losslessly.
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    if float.is_nan() {
        return None;
    }
    let floor = float.floor();
    if floor >= BOUND {
        return Some(Ordering::Less);
    }
    if floor < -BOUND {
        return Some(Ordering::Greater);
    }
    Some(match int.cmp(&(floor as i64)) {
        Ordering::Equal if float != floor => Ordering::Less,
        ordering => ordering,
    })
}

/// Ordering for `< > <= >=`: numbers, text, booleans, and lists compared element-wise.
pub fn compare_values(a: &Value, b: &Value, operation: &str) -> RuntimeResult<Ordering> {
    let incomparable = || RuntimeError::type_mismatch(a.type_name(), b.type_name(), operation);
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Ok(x.cmp(y)),
        (Value::Integer(x), Value::Float(y)) => {
            compare_int_float(*x, *y).ok_or_else(incomparable)
        }
        (Value::Float(x), Value::Integer(y)) => compare_int_float(*y, *x)
            .map(Ordering::reverse)
            .ok_or_else(incomparable),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y).ok_or_else(incomparable),
        (Value::String(x), Value::String(y)) => Ok(x.cmp(y)),
        (Value::Boolean(x), Value::Boolean(y)) => Ok(x.cmp(y)),
        (Value::List(xs), Value::List(ys)) => {
            for (x, y) in xs.iter().zip(ys) {
                let ordering = compare_values(x, y, operation)?;
                if ordering != Ordering::Equal {
                    return Ok(ordering);
                }
            }
            Ok(xs.len().cmp(&ys.len()))
        }
        _ => Err(incomparable()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_division_matches_host_semantics() {
        assert_eq!(floor_div(7, 2), Some(3));
        assert_eq!(floor_div(-7, 2), Some(-4));
        assert_eq!(floor_div(7, -2), Some(-4));
        assert_eq!(floor_div(i64::MIN, -1), None);
        assert_eq!(floor_mod(-7, 3), Some(2));
        assert_eq!(floor_mod(7, -3), Some(-2));
        assert_eq!(floor_mod(14, 7), Some(0));
        assert_eq!(float_mod(-1.5, 1.0), 0.5);
    }

    #[test]
    fn mixed_numbers_compare_numerically() {
        assert!(values_equal(&Value::Integer(2), &Value::Float(2.0)));
        assert_eq!(
            compare_values(&Value::Integer(1), &Value::Float(1.5), "<"),
            Ok(Ordering::Less)
        );
        assert!(compare_values(&Value::Integer(1), &Value::String("a".into()), "<").is_err());
    }

    #[test]
    fn mixed_numbers_compare_exactly_beyond_float_precision() {
        let int = Value::Integer(9_007_199_254_740_993);
        let float = Value::Float(9_007_199_254_740_992.0);
        assert!(!values_equal(&int, &float));
        assert!(values_equal(&Value::Integer(9_007_199_254_740_992), &float));
        assert_eq!(compare_values(&float, &int, "<"), Ok(Ordering::Less));
        assert_eq!(compare_values(&int, &float, ">"), Ok(Ordering::Greater));
        assert_eq!(compare_int_float(2, 2.5), Some(Ordering::Less));
        assert_eq!(compare_int_float(-3, -2.5), Some(Ordering::Less));
        assert_eq!(compare_int_float(-2, -2.5), Some(Ordering::Greater));
        assert_eq!(compare_int_float(i64::MAX, 9.3e18), Some(Ordering::Less));
        assert_eq!(compare_int_float(i64::MIN, f64::NEG_INFINITY), Some(Ordering::Greater));
        assert_eq!(compare_int_float(0, f64::NAN), None);
    }

    #[test]
    fn lists_compare_lexicographically() {
        let short = Value::List(vec![Value::Integer(1)]);
        let long = Value::List(vec![Value::Integer(1), Value::Integer(0)]);
        assert_eq!(compare_values(&short, &long, "<"), Ok(Ordering::Less));
    }

    #[test]
    fn global_environment_registers_aliases() {
        let env = StandardLibrary::create_global_environment();
        assert!(!env.has_parent());
        for name in ["first", "car", "head", "rest", "cdr", "tail"] {
            assert!(env.is_bound_locally(&Symbol::from(name)), "missing {name}");
        }
        assert_eq!(
            env.lookup(&Symbol::from("car")),
            env.lookup(&Symbol::from("head"))
        );
        assert_eq!(env.lookup(&Symbol::from("nil")), Ok(Value::Boolean(false)));
    }
}
