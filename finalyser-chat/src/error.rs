//! Chat failures and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub const RATE_LIMITED_MESSAGE: &str = "Rate limits exceeded, please try again later.";
pub const BILLING_MESSAGE: &str = "Payment required, please add funds to your AI workspace.";
pub const UPSTREAM_MESSAGE: &str = "AI gateway error";

#[derive(Debug, Error)]
pub enum ChatError {
    /// Upstream answered 429. Never retried automatically.
    #[error("{}", RATE_LIMITED_MESSAGE)]
    RateLimited,

    /// Upstream answered 402
    #[error("{}", BILLING_MESSAGE)]
    Billing,

    /// Any other non-success upstream status
    #[error("{} ({status}): {body}", UPSTREAM_MESSAGE)]
    Upstream { status: u16, body: String },

    /// The named credential is missing from the environment
    #[error("{0} is not configured")]
    NotConfigured(String),

    /// Request body could not be decoded
    #[error("invalid request body: {0}")]
    InvalidRequest(String),

    /// Network failure before any response arrived
    #[error("upstream request failed: {0}")]
    Transport(String),

    /// Malformed data or a transport error after streaming began
    #[error("stream error: {0}")]
    Stream(String),
}

impl ChatError {
    pub fn status(&self) -> StatusCode {
        match self {
            ChatError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ChatError::Billing => StatusCode::PAYMENT_REQUIRED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text placed in the `{error}` body returned to browsers
    pub fn public_message(&self) -> String {
        match self {
            ChatError::Upstream { .. } => UPSTREAM_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Build from a non-success status and its body text
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            429 => ChatError::RateLimited,
            402 => ChatError::Billing,
            _ => ChatError::Upstream { status, body },
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Transport(err.to_string())
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.public_message() });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(ChatError::from_status(429, String::new()), ChatError::RateLimited));
        assert!(matches!(ChatError::from_status(402, String::new()), ChatError::Billing));
        assert!(matches!(
            ChatError::from_status(503, "down".into()),
            ChatError::Upstream { status: 503, .. }
        ));
    }

    #[test]
    fn test_http_mapping() {
        assert_eq!(ChatError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(ChatError::Billing.status(), StatusCode::PAYMENT_REQUIRED);
        let upstream = ChatError::Upstream { status: 418, body: "teapot".into() };
        assert_eq!(upstream.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upstream.public_message(), "AI gateway error");
        assert_eq!(
            ChatError::NotConfigured("FINALYSER_API_KEY".into()).public_message(),
            "FINALYSER_API_KEY is not configured"
        );
    }
}
