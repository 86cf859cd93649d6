//! Program reader.
//!
//! Programs are written as JSON documents: arrays are compound forms (or list data once
//! quoted), strings are symbols, numbers and booleans are themselves, `null` is nil, and
//! `{"text": "..."}` is a text atom.
//!
//! ```json
//! ["begin",
//!   ["setq", "square", ["lambda", ["x"], ["*", "x", "x"]]],
//!   ["print", ["square", 9]]]
//! ```

use crate::ast::{Expression, Symbol};
use crate::runtime::values::Value;
use serde_json::Value as Json;
use thiserror::Error;

/// Key of the single-entry object that marks a text atom.
pub const TEXT_KEY: &str = "text";

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("invalid program syntax: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("number {0} does not fit an integer or a float")]
    UnrepresentableNumber(String),

    #[error("unsupported object {0}: only {{\"text\": \"...\"}} is allowed")]
    UnsupportedObject(String),
}

/// Parses program text into one root expression.
pub fn parse_program(source: &str) -> Result<Expression, ReadError> {
    let json: Json = serde_json::from_str(source)?;
    from_json(json)
}

/// Converts an already-parsed JSON document into an expression.
pub fn from_json(json: Json) -> Result<Expression, ReadError> {
    match json {
        Json::Null => Ok(Value::Nil),
        Json::Bool(b) => Ok(Value::Boolean(b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(ReadError::UnrepresentableNumber(n.to_string()))
            }
        }
        Json::String(name) => Ok(Value::Symbol(Symbol(name))),
        Json::Array(items) => items
            .into_iter()
            .map(from_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Json::Object(map) => {
            if map.len() == 1 {
                if let Some(Json::String(content)) = map.get(TEXT_KEY) {
                    return Ok(Value::String(content.clone()));
                }
            }
            Err(ReadError::UnsupportedObject(Json::Object(map).to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{list, sym, text};
    use serde_json::json;

    #[test]
    fn reads_nested_program() {
        let expr = parse_program(r#"["+", 3, ["-", 9.5, 7], {"text": "hi"}, null, true]"#)
            .expect("program should parse");
        assert_eq!(
            expr,
            list([
                sym("+"),
                Value::Integer(3),
                list([sym("-"), Value::Float(9.5), Value::Integer(7)]),
                text("hi"),
                Value::Nil,
                Value::Boolean(true),
            ])
        );
    }

    #[test]
    fn rejects_other_objects() {
        assert!(matches!(
            from_json(json!({"text": "a", "extra": 1})),
            Err(ReadError::UnsupportedObject(_))
        ));
        assert!(matches!(
            from_json(json!({"text": 5})),
            Err(ReadError::UnsupportedObject(_))
        ));
    }

    #[test]
    fn reports_syntax_errors() {
        assert!(matches!(parse_program("[1, 2"), Err(ReadError::Syntax(_))));
        assert!(matches!(parse_program("hello"), Err(ReadError::Syntax(_))));
    }

    #[test]
    fn large_unsigned_numbers_become_floats() {
        assert_eq!(
            from_json(json!(u64::MAX)).expect("number should convert"),
            Value::Float(u64::MAX as f64)
        );
    }
}
