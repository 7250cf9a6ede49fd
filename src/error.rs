//! The single error kind surfaced by both API clients.
//!
//! Every failure (transport, non-2xx status, undecodable body) ends up as a
//! `NatureRemoError` carrying a human-readable message. Callers that need to
//! branch on the cause only have the message text to go on.

use http::StatusCode;
use serde::Deserialize;

use crate::models::remo::DecodeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatureRemoError {
    message: String,
}

/// Error body returned by the cloud API alongside a non-2xx status.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    message: String,
}

impl NatureRemoError {
    pub fn new(message: impl Into<String>) -> Self {
        NatureRemoError {
            message: message.into(),
        }
    }

    /// Connection refused, DNS failure, timeout and friends.
    pub fn from_transport(err: ureq::Error) -> Self {
        NatureRemoError::new(err.to_string())
    }

    /// Builds the message for a failed cloud API response.
    ///
    /// Uses the structured `{"code", "message"}` body when it decodes,
    /// otherwise falls back to `"{status} {reason}"`.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(err) => NatureRemoError::new(format!(
                "HTTP Status Code: {}, Nature Remo Code: {}, Message: {}",
                status.as_u16(),
                err.code,
                err.message
            )),
            Err(_) => NatureRemoError::from_status(status),
        }
    }

    /// `"{status} {reason}"`, used by the local API which has no error body contract.
    pub fn from_status(status: StatusCode) -> Self {
        NatureRemoError::new(format!(
            "{} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl core::fmt::Display for NatureRemoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for NatureRemoError {}

impl From<ureq::Error> for NatureRemoError {
    fn from(value: ureq::Error) -> Self {
        NatureRemoError::from_transport(value)
    }
}

impl From<serde_json::Error> for NatureRemoError {
    fn from(value: serde_json::Error) -> Self {
        NatureRemoError::new(format!("json error: {}", value))
    }
}

impl From<DecodeError> for NatureRemoError {
    fn from(value: DecodeError) -> Self {
        NatureRemoError::new(format!("decode error at `{}`: {}", value.path(), value.inner()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_body_message() {
        let err = NatureRemoError::from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"code":401001,"message":"Unauthorized"}"#,
        );
        assert_eq!(
            err.to_string(),
            "HTTP Status Code: 401, Nature Remo Code: 401001, Message: Unauthorized"
        );
    }

    #[test]
    fn undecodable_body_falls_back_to_status_line() {
        let err = NatureRemoError::from_response(StatusCode::BAD_GATEWAY, "<html>upstream down</html>");
        assert_eq!(err.to_string(), "502 Bad Gateway");

        let err = NatureRemoError::from_response(StatusCode::NOT_FOUND, "");
        assert_eq!(err.message(), "404 Not Found");
    }

    #[test]
    fn body_missing_code_falls_back() {
        let err = NatureRemoError::from_response(StatusCode::BAD_REQUEST, r#"{"message":"nope"}"#);
        assert_eq!(err.to_string(), "400 Bad Request");
    }
}
