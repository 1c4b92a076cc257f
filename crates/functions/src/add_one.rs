// ADDONE - hand a range to the remote transform service

use rangefn_core::{normalize, FunctionError, FunctionOutput, FunctionResult, Range};
use rangefn_remote_client::TransformClient;
use serde_json::Value;

/// Whatever carries a range to the remote service and back.
pub trait RangeTransport: Send + Sync {
    fn transform(&self, range: &Range) -> Result<Value, FunctionError>;
}

impl RangeTransport for TransformClient {
    fn transform(&self, range: &Range) -> Result<Value, FunctionError> {
        TransformClient::transform(self, range).map_err(FunctionError::from)
    }
}

/// Validate the input, make exactly one remote call, and pass the
/// service's `result` through untouched.
///
/// Invalid input never reaches the network.
pub fn add_one(transport: &dyn RangeTransport, range: Option<&Value>) -> FunctionResult {
    let range = normalize(range)?;
    let result = transport.transform(&range)?;
    Ok(FunctionOutput::Remote(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use rangefn_core::into_cell_value;
    use serde_json::json;

    /// Records calls and answers with a canned result.
    struct StubTransport {
        reply: Result<Value, FunctionError>,
        calls: Mutex<Vec<Value>>,
    }

    impl StubTransport {
        fn new(reply: Result<Value, FunctionError>) -> Self {
            Self { reply, calls: Mutex::new(Vec::new()) }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    impl RangeTransport for StubTransport {
        fn transform(&self, range: &Range) -> Result<Value, FunctionError> {
            self.calls.lock().push(range.to_json());
            self.reply.clone()
        }
    }

    fn run(stub: &StubTransport, input: Value) -> Value {
        into_cell_value(add_one(stub, Some(&input)))
    }

    #[test]
    fn test_success_is_verbatim() {
        let stub = StubTransport::new(Ok(json!([[2, 3]])));
        assert_eq!(run(&stub, json!([[1, 2]])), json!([[2, 3]]));
        assert_eq!(stub.call_count(), 1);
    }

    #[test]
    fn test_sends_normalized_range() {
        let stub = StubTransport::new(Ok(json!([[2, 3]])));
        run(&stub, json!([1, 2]));
        assert_eq!(stub.calls.lock()[0], json!([[1, 2]]));
    }

    #[test]
    fn test_non_array_input_skips_network() {
        let stub = StubTransport::new(Ok(json!([[0]])));
        let out = run(&stub, json!(42));
        assert_eq!(out, json!([["Error: Invalid range: expected an array of rows"]]));
        assert_eq!(stub.call_count(), 0);

        let out = into_cell_value(add_one(&stub, None));
        assert!(out[0][0].as_str().unwrap().starts_with("Error: Invalid range"));
        assert_eq!(stub.call_count(), 0);
    }

    #[test]
    fn test_http_error() {
        let stub = StubTransport::new(Err(FunctionError::Http(500, String::new())));
        assert_eq!(run(&stub, json!([[1]])), json!([["Error: HTTP 500"]]));
    }

    #[test]
    fn test_service_failure() {
        let stub = StubTransport::new(Err(FunctionError::Service("Unknown error".into())));
        assert_eq!(run(&stub, json!([[1]])), json!([["Error: Unknown error"]]));
    }

    #[test]
    fn test_network_exception() {
        let stub = StubTransport::new(Err(FunctionError::Network("connection refused".into())));
        assert_eq!(
            run(&stub, json!([[1]])),
            json!([["Error: Network error: connection refused"]])
        );
    }
}
