//! Map request-path failures onto the Anthropic error envelope.

use super::anthropic_types::ErrorResponse;
use thiserror::Error;

const BAD_REQUEST: u16 = 400;
const BAD_GATEWAY: u16 = 502;
const GATEWAY_TIMEOUT: u16 = 504;

/// Everything that can go wrong between receiving a body and answering it.
/// None of these are retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayFailure {
    /// The inbound body is not JSON, or not shaped like a Messages request.
    #[error("Invalid JSON: {detail}")]
    InvalidRequest { detail: String },

    /// The backend answered with a non-success status.
    #[error("Backend error: {status} - {body}")]
    BackendStatus { status: u16, body: String },

    /// The backend could not be reached or its reply could not be read.
    #[error("Connection error: {detail}")]
    Transport { detail: String, timed_out: bool },
}

impl GatewayFailure {
    pub fn invalid_request(detail: impl ToString) -> Self {
        Self::InvalidRequest {
            detail: detail.to_string(),
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport {
            detail: detail.into(),
            timed_out: false,
        }
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::Transport {
            detail: detail.into(),
            timed_out: true,
        }
    }

    /// HTTP status to answer with. Backend 4xx/5xx codes are passed on so
    /// callers see e.g. an unknown-model 404 as such.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest { .. } => BAD_REQUEST,
            Self::BackendStatus { status, .. } if (400..=599).contains(status) => *status,
            Self::BackendStatus { .. } => BAD_GATEWAY,
            Self::Transport { timed_out: true, .. } => GATEWAY_TIMEOUT,
            Self::Transport { .. } => BAD_GATEWAY,
        }
    }

    pub fn to_response(&self) -> (ErrorResponse, u16) {
        let err = match self {
            Self::InvalidRequest { .. } => ErrorResponse::invalid_request(self.to_string()),
            Self::BackendStatus { .. } | Self::Transport { .. } => {
                ErrorResponse::api_error(self.to_string())
            }
        };
        (err, self.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_json_is_400() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let (err, status) = GatewayFailure::invalid_request(&parse_err).to_response();

        assert_eq!(status, 400);
        assert_eq!(err.error_type, "error");
        assert_eq!(err.error.error_type, "invalid_request_error");
        assert!(err.error.message.starts_with("Invalid JSON: "));
        assert!(err.error.message.contains("line 1"));
    }

    #[test]
    fn test_backend_status_keeps_code_and_body() {
        let failure = GatewayFailure::BackendStatus {
            status: 500,
            body: "oops".to_string(),
        };
        let (err, status) = failure.to_response();

        assert_eq!(status, 500);
        assert_eq!(err.error.error_type, "api_error");
        assert!(err.error.message.contains("500"));
        assert!(err.error.message.contains("oops"));
    }

    #[test]
    fn test_backend_body_is_verbatim() {
        let body = r#"{"error":{"message":"model \"x\" not found"}}"#;
        let failure = GatewayFailure::BackendStatus {
            status: 404,
            body: body.to_string(),
        };
        let (err, status) = failure.to_response();

        assert_eq!(status, 404);
        assert_eq!(err.error.message, format!("Backend error: 404 - {body}"));
    }

    #[test]
    fn test_non_error_backend_status_becomes_bad_gateway() {
        let failure = GatewayFailure::BackendStatus {
            status: 304,
            body: String::new(),
        };
        assert_eq!(failure.status_code(), 502);
    }

    #[test]
    fn test_transport_failures() {
        let (err, status) = GatewayFailure::transport("connection refused").to_response();
        assert_eq!(status, 502);
        assert_eq!(err.error.error_type, "api_error");
        assert_eq!(err.error.message, "Connection error: connection refused");

        let (err, status) = GatewayFailure::timeout("operation timed out").to_response();
        assert_eq!(status, 504);
        assert!(err.error.message.contains("timed out"));
    }
}
