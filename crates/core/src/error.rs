/// Everything that can go wrong inside a custom function.
///
/// The `Display` form is exactly the text the host shows after the
/// `"Error: "` prefix.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FunctionError {
    /// Input is absent, not array-shaped, ragged, or holds nested values
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    /// A scalar argument has the wrong type
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Transport failure (connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(String),
    /// Non-success HTTP status, with the response body if any
    #[error("{}", http_message(*.0, .1))]
    Http(u16, String),
    /// The remote service answered with a status other than "success"
    #[error("{0}")]
    Service(String),
    /// Malformed response body
    #[error("Parse error: {0}")]
    Parse(String),
    /// A function implementation panicked
    #[error("Internal error: {0}")]
    Internal(String),
}

/// `HTTP <status>: <body>`, or just `HTTP <status>` when the body is blank.
pub fn http_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, body)
    }
}

impl FunctionError {
    pub fn invalid_range(reason: impl Into<String>) -> Self {
        FunctionError::InvalidRange(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_display_with_and_without_body() {
        assert_eq!(FunctionError::Http(500, String::new()).to_string(), "HTTP 500");
        assert_eq!(FunctionError::Http(502, "  ".into()).to_string(), "HTTP 502");
        assert_eq!(
            FunctionError::Http(404, "not found\n".into()).to_string(),
            "HTTP 404: not found"
        );
    }

    #[test]
    fn test_service_display_is_bare_message() {
        assert_eq!(FunctionError::Service("quota exceeded".into()).to_string(), "quota exceeded");
    }

    #[test]
    fn test_invalid_range_display() {
        assert_eq!(
            FunctionError::invalid_range("range is empty").to_string(),
            "Invalid range: range is empty"
        );
    }
}
