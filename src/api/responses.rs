//! Shared API response types
//!
//! Every endpoint answers with the same `{ "data": ..., "error": ... }`
//! envelope. A successful call carries `data` and a null `error`; a
//! failed call carries a null `data` and the error message. A lookup
//! that found nothing carries both as null with a 200 status.

use serde::{Deserialize, Serialize};

/// Response envelope used by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Payload, null on error or empty lookup
    pub data: Option<T>,
    /// Error message, null on success
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response with a payload
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Successful response with no payload (lookup found nothing)
    pub fn null() -> Self {
        Self {
            data: None,
            error: None,
        }
    }

    /// Failed response carrying an error message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope() {
        let json = serde_json::to_value(ApiResponse::ok(42)).unwrap();
        assert_eq!(json, serde_json::json!({ "data": 42, "error": null }));
    }

    #[test]
    fn test_null_envelope() {
        let json = serde_json::to_value(ApiResponse::<i64>::null()).unwrap();
        assert_eq!(json, serde_json::json!({ "data": null, "error": null }));
    }

    #[test]
    fn test_error_envelope() {
        let json = serde_json::to_value(ApiResponse::<i64>::error("boom")).unwrap();
        assert_eq!(json, serde_json::json!({ "data": null, "error": "boom" }));
    }
}
