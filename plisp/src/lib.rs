//! plisp - a minimal Lisp evaluator
//!
//! Programs arrive already parsed as symbolic expressions: atoms evaluate to themselves,
//! symbols resolve through a chain of lexical environments, and compound forms call the
//! procedure in operator position. Procedures are either host builtins (some of which take
//! their operands unevaluated, like `if` and `lambda`) or closures built by `lambda`.
//!
//! ```
//! use plisp::reader::parse_program;
//! use plisp::runtime::{BufferedHost, Runtime, Value};
//! use std::rc::Rc;
//!
//! let runtime = Runtime::new(Rc::new(BufferedHost::new()));
//! let program = parse_program(r#"["let", [["x", 3], ["y", ["+", "x", 5]]], ["*", "x", "y"]]"#)
//!     .unwrap();
//! assert_eq!(runtime.run(&program).unwrap(), Value::Integer(24));
//! ```

pub mod ast;
pub mod config;
pub mod input_handling;
pub mod reader;
pub mod runtime;

pub use ast::{Expression, Symbol};
pub use runtime::{Runtime, RuntimeError, RuntimeResult, Value};
