//! Runtime errors. Every error aborts the whole evaluation; the language has no way to catch one.

use thiserror::Error;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("Unbound symbol: {0}")]
    UnboundSymbol(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Type mismatch in '{operation}': expected {expected}, got {actual}")]
    TypeMismatch {
        expected: String,
        actual: String,
        operation: String,
    },

    #[error("Index out of range: '{operation}' on an empty sequence")]
    IndexOutOfRange { operation: String },

    #[error("Empty sequence passed to '{operation}'")]
    EmptySequence { operation: String },

    #[error("Malformed expression: {0}")]
    MalformedExpression(String),

    #[error("Arity mismatch: '{function}' expects {expected} arguments, got {actual}")]
    ArityMismatch {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("Arithmetic overflow in '{operation}'")]
    ArithmeticOverflow { operation: String },

    #[error("Recursion limit of {limit} nested evaluations exceeded")]
    RecursionLimit { limit: usize },

    #[error("I/O error: {0}")]
    IoError(String),
}

impl RuntimeError {
    pub fn type_mismatch(expected: &str, actual: &str, operation: &str) -> Self {
        RuntimeError::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        RuntimeError::MalformedExpression(message.into())
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(e: std::io::Error) -> Self {
        RuntimeError::IoError(e.to_string())
    }
}
