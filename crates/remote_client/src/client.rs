//! Remote transform HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required), so it can be
//! called straight from a host's recalculation thread.

use std::time::Duration;

use rangefn_core::error::http_message;
use rangefn_core::{FunctionError, Range};
use serde::{Deserialize, Serialize};

/// Client for the remote range transform service (blocking).
#[derive(Clone)]
pub struct TransformClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

/// Error type for remote transform calls.
#[derive(Debug)]
pub enum RemoteError {
    /// Connect failure, timeout, or broken body
    Network(String),
    /// HTTP error with status code and response body
    Http(u16, String),
    /// Response body is not the expected JSON
    Parse(String),
    /// Service answered with a non-success status
    Service(String),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::Network(msg) => write!(f, "Network error: {}", msg),
            RemoteError::Http(code, body) => f.write_str(&http_message(*code, body)),
            RemoteError::Parse(msg) => write!(f, "Parse error: {}", msg),
            RemoteError::Service(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RemoteError {}

impl From<RemoteError> for FunctionError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Network(msg) => FunctionError::Network(msg),
            RemoteError::Http(code, body) => FunctionError::Http(code, body),
            RemoteError::Parse(msg) => FunctionError::Parse(msg),
            RemoteError::Service(msg) => FunctionError::Service(msg),
        }
    }
}

/// Request body sent to the service.
#[derive(Debug, Serialize)]
pub struct TransformRequest<'a> {
    pub data: &'a Range,
}

/// Response body from the service. Only `status` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct TransformResponse {
    pub status: Option<String>,
    #[serde(default)]
    pub result: serde_json::Value,
    #[serde(default)]
    pub error: serde_json::Value,
}

impl TransformResponse {
    /// Interpret the body: `result` on success, the service's message
    /// otherwise.
    pub fn into_result(self) -> Result<serde_json::Value, RemoteError> {
        let status = self
            .status
            .ok_or_else(|| RemoteError::Parse("Missing status in response".into()))?;

        if status == "success" {
            return Ok(self.result);
        }

        let message = if is_falsy(&self.error) {
            "Unknown error".to_string()
        } else {
            match self.error {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }
        };
        Err(RemoteError::Service(message))
    }
}

/// `null`, `false`, `0` and `""` carry no message.
fn is_falsy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

impl TransformClient {
    /// Create a client for `endpoint`. `None` timeout waits indefinitely.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, RemoteError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("rangefn/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `range` to the service and return its `result` untouched.
    pub fn transform(&self, range: &Range) -> Result<serde_json::Value, RemoteError> {
        let (rows, cols) = range.shape();
        log::debug!("POST {} ({}x{} range)", self.endpoint, rows, cols);

        let response = self.http.post(&self.endpoint)
            .json(&TransformRequest { data: range })
            .send()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            log::debug!("transform service returned HTTP {}", status);
            return Err(RemoteError::Http(status, body));
        }

        let text = response.text()
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        let body: TransformResponse = serde_json::from_str(&text)
            .map_err(|e| RemoteError::Parse(e.to_string()))?;
        log::debug!("transform service response: {}", text);

        body.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn range(v: serde_json::Value) -> Range {
        rangefn_core::normalize(Some(&v)).unwrap()
    }

    fn client_for(server: &MockServer) -> TransformClient {
        TransformClient::new(server.url("/add-one"), Some(Duration::from_secs(5))).unwrap()
    }

    #[test]
    fn test_response_missing_status() {
        let resp: TransformResponse = serde_json::from_value(json!({ "result": [[1]] })).unwrap();
        let err = resp.into_result().unwrap_err();
        assert!(matches!(err, RemoteError::Parse(ref m) if m == "Missing status in response"));
    }

    #[test]
    fn test_response_failure_fallback_message() {
        let resp: TransformResponse = serde_json::from_value(json!({ "status": "failure" })).unwrap();
        let err = resp.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Unknown error");
    }

    #[test]
    fn test_response_falsy_error_uses_fallback_message() {
        for error in [json!(false), json!(0), json!(0.0), json!(""), json!(null)] {
            let resp: TransformResponse =
                serde_json::from_value(json!({ "status": "failure", "error": error })).unwrap();
            let err = resp.into_result().unwrap_err();
            assert_eq!(err.to_string(), "Unknown error", "error field {}", error);
        }
    }

    #[test]
    fn test_response_non_string_error_is_shown_as_json() {
        let resp: TransformResponse =
            serde_json::from_value(json!({ "status": "failure", "error": { "code": 7 } })).unwrap();
        assert_eq!(resp.into_result().unwrap_err().to_string(), r#"{"code":7}"#);

        let resp: TransformResponse =
            serde_json::from_value(json!({ "status": "failure", "error": 42 })).unwrap();
        assert_eq!(resp.into_result().unwrap_err().to_string(), "42");
    }

    #[test]
    fn test_http_display_omits_blank_body() {
        assert_eq!(RemoteError::Http(500, String::new()).to_string(), "HTTP 500");
        assert_eq!(RemoteError::Http(503, " \n".into()).to_string(), "HTTP 503");
        assert_eq!(RemoteError::Http(502, "bad gateway\n".into()).to_string(), "HTTP 502: bad gateway");
    }

    #[test]
    fn test_response_success_missing_result_is_null() {
        let resp: TransformResponse = serde_json::from_value(json!({ "status": "success" })).unwrap();
        assert_eq!(resp.into_result().unwrap(), serde_json::Value::Null);
    }

    #[test]
    fn test_remote_error_into_function_error() {
        let err: FunctionError = RemoteError::Http(500, "boom".into()).into();
        assert_eq!(err, FunctionError::Http(500, "boom".into()));
        let err: FunctionError = RemoteError::Service("bad data".into()).into();
        assert_eq!(err.to_string(), "bad data");
    }

    // ── httpmock ────────────────────────────────────────────────────

    #[test]
    fn test_transform_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/add-one")
                .header("content-type", "application/json")
                .json_body(json!({ "data": [[1, 2]] }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "status": "success", "result": [[2, 3]] }));
        });

        let result = client_for(&server).transform(&range(json!([[1, 2]]))).unwrap();

        mock.assert();
        assert_eq!(result, json!([[2, 3]]));
    }

    #[test]
    fn test_transform_http_error_keeps_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/add-one");
            then.status(500).body("upstream exploded");
        });

        let err = client_for(&server).transform(&range(json!([[1]]))).unwrap_err();
        assert!(matches!(err, RemoteError::Http(500, ref body) if body == "upstream exploded"));
    }

    #[test]
    fn test_transform_service_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/add-one");
            then.status(200)
                .json_body(json!({ "status": "failure", "error": "Data must be numeric" }));
        });

        let err = client_for(&server).transform(&range(json!([["a"]]))).unwrap_err();
        assert!(matches!(err, RemoteError::Service(ref m) if m == "Data must be numeric"));
    }

    #[test]
    fn test_transform_malformed_json() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/add-one");
            then.status(200).body("<html>not json</html>");
        });

        let err = client_for(&server).transform(&range(json!([[1]]))).unwrap_err();
        assert!(matches!(err, RemoteError::Parse(_)));
    }

    #[test]
    fn test_transform_timeout_is_network_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/add-one");
            then.status(200)
                .delay(Duration::from_millis(800))
                .json_body(json!({ "status": "success", "result": [[1]] }));
        });

        let client = TransformClient::new(server.url("/add-one"), Some(Duration::from_millis(100))).unwrap();
        let err = client.transform(&range(json!([[1]]))).unwrap_err();
        assert!(matches!(err, RemoteError::Network(_)));
    }

    #[test]
    fn test_transform_connection_refused() {
        // Port 1 is never listening in test environments
        let client = TransformClient::new("http://127.0.0.1:1/add-one", Some(Duration::from_secs(2))).unwrap();
        let err = client.transform(&range(json!([[1]]))).unwrap_err();
        assert!(matches!(err, RemoteError::Network(_)));
    }
}
