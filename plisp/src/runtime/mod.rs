//! plisp Runtime System
//!
//! High-level runtime entry point. The heavy logic is implemented in the submodules
//! listed below.

pub mod environment;
pub mod error;
pub mod evaluator;
pub mod host_interface;
pub mod stdlib;
pub mod values;

pub use environment::Env;
pub use error::{RuntimeError, RuntimeResult};
pub use evaluator::Evaluator;
pub use host_interface::{BufferedHost, IoHost, StdioHost};
pub use stdlib::StandardLibrary;
pub use values::{Arity, BuiltinFunction, Closure, EvalPolicy, Function, Value};

use crate::ast::Expression;
use crate::config::EvaluatorConfig;
use std::rc::Rc;
use tracing::debug;

/// One evaluator bound to a fresh child of the standard-library root environment.
///
/// Top-level `setq`s land in the session scope, leaving the root environment holding only
/// the builtins. Successive `run` calls share that scope.
#[derive(Debug, Clone)]
pub struct Runtime {
    evaluator: Evaluator,
    env: Env,
}

impl Runtime {
    pub fn new(host: Rc<dyn IoHost>) -> Self {
        Self::with_config(host, EvaluatorConfig::default())
    }

    pub fn with_config(host: Rc<dyn IoHost>, config: EvaluatorConfig) -> Self {
        debug!(max_depth = ?config.max_depth, "starting runtime");
        let root = StandardLibrary::create_global_environment();
        Runtime {
            evaluator: Evaluator::with_config(host, config),
            env: root.child(),
        }
    }

    pub fn run(&self, program: &Expression) -> RuntimeResult<Value> {
        self.evaluator.eval(&self.env, program)
    }

    /// The session scope programs run in.
    pub fn environment(&self) -> &Env {
        &self.env
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new(Rc::new(StdioHost))
    }
}
