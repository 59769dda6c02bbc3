//! Error types for Ads API operations

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Structured error returned by the Graph API.
///
/// Built from the `error` object of a non-200 JSON body, or synthesized for
/// batch items the server reported as code 500.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: i64,
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: i64, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            error_type: error_type.into(),
            message: message.into(),
        }
    }

    /// Placeholder for batch items whose body could not be trusted.
    pub fn unknown() -> Self {
        Self::new(1, "UnknownError", "An unknown error occurred")
    }

    /// Extract the `error` object from a decoded response body.
    ///
    /// Missing `code`/`type`/`message` members fall back to `0`/`""` so a
    /// partially filled error object still surfaces as an API error.
    pub fn from_body(body: &Value) -> Option<Self> {
        let error = body.get("error")?.as_object()?;
        Some(Self {
            code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
            error_type: error
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.error_type, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Master error type for all Ads API operations.
#[derive(Debug, Error)]
pub enum AdsError {
    #[error("Ads API error {0}")]
    Api(#[from] ApiError),

    #[error("HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Precondition failed: {reason}")]
    Precondition { reason: String },

    #[error("Invalid response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("File uploads cannot be sent inside a batch request ({path})")]
    FilesInBatch { path: String },

    #[error("Config error: {0}")]
    Config(String),
}

impl AdsError {
    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::Precondition {
            reason: reason.into(),
        }
    }

    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }

    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport(Box::new(err))
    }

    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api(_))
    }

    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for Ads API operations.
pub type AdsResult<T> = Result<T, AdsError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::new(100, "OAuthException", "bad token");
        assert_eq!(err.to_string(), "100 (OAuthException): bad token");
    }

    #[test]
    fn test_api_error_unknown_sentinel() {
        let err = ApiError::unknown();
        assert_eq!(err.code, 1);
        assert_eq!(err.error_type, "UnknownError");
        assert_eq!(err.message, "An unknown error occurred");
    }

    #[test]
    fn test_api_error_from_body() {
        let body = json!({"error": {"code": 190, "type": "OAuthException", "message": "expired"}});
        let err = ApiError::from_body(&body).unwrap();
        assert_eq!(err, ApiError::new(190, "OAuthException", "expired"));
    }

    #[test]
    fn test_api_error_from_body_without_error_object() {
        assert!(ApiError::from_body(&json!({"data": []})).is_none());
        assert!(ApiError::from_body(&json!({"error": "nope"})).is_none());
        assert!(ApiError::from_body(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_api_error_serializes_type_field() {
        let value = serde_json::to_value(ApiError::unknown()).unwrap();
        assert_eq!(value["type"], "UnknownError");
        assert_eq!(value["code"], 1);
    }

    #[test]
    fn test_ads_error_display_http_status() {
        let err = AdsError::HttpStatus {
            status: 502,
            url: "https://graph.facebook.com/me".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("graph.facebook.com/me"));
    }

    #[test]
    fn test_ads_error_api_accessors() {
        let err = AdsError::from(ApiError::new(17, "UserRequestLimitReached", "slow down"));
        assert!(err.is_api());
        assert_eq!(err.api_error().map(|e| e.code), Some(17));

        let precondition = AdsError::precondition("missing budget");
        assert!(!precondition.is_api());
        assert!(precondition.api_error().is_none());
        assert!(precondition.to_string().contains("missing budget"));
    }

    #[test]
    fn test_ads_error_transport_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = AdsError::transport(io);
        assert!(matches!(err, AdsError::Transport(_)));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("timed out"));
    }
}
