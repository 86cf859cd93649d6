use plisp::config::EvaluatorConfig;
use plisp::reader::from_json;
use plisp::runtime::{BufferedHost, Runtime, RuntimeError, Value};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::rc::Rc;

/// Runs programs that must fail and checks the error each one raises.
struct RuntimeErrorTestRunner {
    runtime: Runtime,
}

impl RuntimeErrorTestRunner {
    fn new() -> Self {
        Self {
            runtime: Runtime::new(Rc::new(BufferedHost::new())),
        }
    }

    fn with_max_depth(limit: usize) -> Self {
        Self {
            runtime: Runtime::with_config(
                Rc::new(BufferedHost::new()),
                EvaluatorConfig {
                    max_depth: Some(limit),
                },
            ),
        }
    }

    fn run(&self, program: serde_json::Value) -> Result<Value, RuntimeError> {
        let expr = from_json(program).expect("program should convert");
        self.runtime.run(&expr)
    }

    fn run_error_test(&self, program: serde_json::Value, expected: RuntimeError) {
        match self.run(program.clone()) {
            Ok(value) => panic!("expected {expected:?} from {program}, got value {value:?}"),
            Err(error) => assert_eq!(error, expected, "program: {program}"),
        }
    }
}

fn type_mismatch(expected: &str, actual: &str, operation: &str) -> RuntimeError {
    RuntimeError::type_mismatch(expected, actual, operation)
}

#[test]
fn test_unbound_symbol() {
    let runner = RuntimeErrorTestRunner::new();
    runner.run_error_test(json!("undefined-thing"), RuntimeError::UnboundSymbol("undefined-thing".into()));
    runner.run_error_test(
        json!(["+", 1, "missing"]),
        RuntimeError::UnboundSymbol("missing".into()),
    );
    runner.run_error_test(json!(["no-such-fn", 1]), RuntimeError::UnboundSymbol("no-such-fn".into()));
}

#[test]
fn test_division_by_zero() {
    let runner = RuntimeErrorTestRunner::new();
    runner.run_error_test(json!(["/", 1, 0]), RuntimeError::DivisionByZero);
    runner.run_error_test(json!(["%", 5, 0]), RuntimeError::DivisionByZero);
    runner.run_error_test(json!(["/", 1.0, 0.0]), RuntimeError::DivisionByZero);
    runner.run_error_test(json!(["%", 1.5, 0]), RuntimeError::DivisionByZero);
}

#[test]
fn test_type_mismatch() {
    let runner = RuntimeErrorTestRunner::new();
    runner.run_error_test(json!([1, 2]), type_mismatch("function", "integer", "call"));
    runner.run_error_test(
        json!([{"text": "not callable"}]),
        type_mismatch("function", "text", "call"),
    );
    assert!(matches!(
        runner.run(json!(["+", 1, {"text": "a"}])),
        Err(RuntimeError::TypeMismatch { .. })
    ));
    assert!(matches!(
        runner.run(json!(["<", 1, {"text": "a"}])),
        Err(RuntimeError::TypeMismatch { .. })
    ));
    assert!(matches!(
        runner.run(json!(["first", 5])),
        Err(RuntimeError::TypeMismatch { .. })
    ));
    assert!(matches!(
        runner.run(json!(["map", 5, ["quote", [1]]])),
        Err(RuntimeError::TypeMismatch { .. })
    ));
}

#[test]
fn test_index_out_of_range() {
    let runner = RuntimeErrorTestRunner::new();
    for name in ["first", "car", "head"] {
        runner.run_error_test(
            json!([name, ["quote", []]]),
            RuntimeError::IndexOutOfRange {
                operation: "first".to_string(),
            },
        );
    }
}

#[test]
fn test_reduce_of_empty_list() {
    let runner = RuntimeErrorTestRunner::new();
    runner.run_error_test(
        json!(["reduce", "+", ["quote", []]]),
        RuntimeError::EmptySequence {
            operation: "reduce".to_string(),
        },
    );
}

#[test]
fn test_malformed_expressions() {
    let runner = RuntimeErrorTestRunner::new();
    let malformed = [
        json!([]),
        json!(["quote"]),
        json!(["if", true]),
        json!(["if", true, 1, 2, 3]),
        json!(["setq", 5, 1]),
        json!(["let", [["x"]], "x"]),
        json!(["let", "x", "x"]),
        json!(["lambda", [1], 1]),
        json!(["lambda", "x", "x"]),
        json!(["cond", [true]]),
        json!(["cond", 1]),
    ];
    for program in malformed {
        assert!(
            matches!(runner.run(program.clone()), Err(RuntimeError::MalformedExpression(_))),
            "expected malformed expression from {program}"
        );
    }
}

#[test]
fn test_arity_mismatch_for_eager_builtins() {
    let runner = RuntimeErrorTestRunner::new();
    runner.run_error_test(
        json!(["-", 1]),
        RuntimeError::ArityMismatch {
            function: "-".to_string(),
            expected: "2".to_string(),
            actual: 1,
        },
    );
    runner.run_error_test(
        json!(["not", 1, 2]),
        RuntimeError::ArityMismatch {
            function: "not".to_string(),
            expected: "1".to_string(),
            actual: 2,
        },
    );
    runner.run_error_test(
        json!(["read", 1]),
        RuntimeError::ArityMismatch {
            function: "read".to_string(),
            expected: "0".to_string(),
            actual: 1,
        },
    );
}

#[test]
fn test_integer_overflow() {
    let runner = RuntimeErrorTestRunner::new();
    runner.run_error_test(
        json!(["*", 9223372036854775807i64, 2]),
        RuntimeError::ArithmeticOverflow {
            operation: "*".to_string(),
        },
    );
    runner.run_error_test(
        json!(["+", 9223372036854775807i64, 1]),
        RuntimeError::ArithmeticOverflow {
            operation: "+".to_string(),
        },
    );
}

#[test]
fn test_recursion_limit() {
    let runner = RuntimeErrorTestRunner::with_max_depth(64);
    runner
        .run(json!(["setq", "forever", ["lambda", [], ["forever"]]]))
        .expect("definition should succeed");
    runner.run_error_test(json!(["forever"]), RuntimeError::RecursionLimit { limit: 64 });

    // The depth counter unwinds with the error, so later programs still run.
    assert_eq!(runner.run(json!(["+", 1, 2])), Ok(Value::Integer(3)));
}

#[test]
fn test_read_past_end_of_input() {
    let runner = RuntimeErrorTestRunner::new();
    runner.run_error_test(json!(["read"]), RuntimeError::IoError("end of input".to_string()));
}

#[test]
fn test_error_aborts_remaining_evaluation() {
    let runner = RuntimeErrorTestRunner::new();
    runner.run_error_test(
        json!(["begin", ["setq", "before", 1], ["/", 1, 0], ["setq", "after", 2]]),
        RuntimeError::DivisionByZero,
    );
    assert_eq!(runner.run(json!("before")), Ok(Value::Integer(1)));
    assert_eq!(
        runner.run(json!("after")),
        Err(RuntimeError::UnboundSymbol("after".to_string()))
    );
}

#[test]
fn test_error_messages() {
    assert_eq!(
        RuntimeError::UnboundSymbol("x".into()).to_string(),
        "Unbound symbol: x"
    );
    assert_eq!(RuntimeError::DivisionByZero.to_string(), "Division by zero");
    assert_eq!(
        type_mismatch("number", "text", "+").to_string(),
        "Type mismatch in '+': expected number, got text"
    );
}
