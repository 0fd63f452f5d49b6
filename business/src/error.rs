//! Error envelope returned by the backend and the client-side error type
//! commands store in their action caches.

use serde::Deserialize;

/// One field-level validation failure inside an [`ApiErrorBody`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Error envelope every backend endpoint uses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub status: u16,
    pub error: String,
    pub message: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub field_errors: Option<Vec<FieldError>>,
}

/// Failure of one logical API call, as seen by pages.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The server answered with an error envelope (or at least a non-2xx
    /// status). Field errors are kept so forms can render them inline.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        field_errors: Vec<FieldError>,
    },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Failed to parse server response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build an [`ApiError`] from a non-2xx response, parsing the envelope
    /// when possible and falling back to a status-based message.
    pub fn from_response(response: &ehttp::Response) -> Self {
        match serde_json::from_slice::<ApiErrorBody>(&response.bytes) {
            Ok(body) => Self::Api {
                status: response.status,
                message: body.message,
                field_errors: body.field_errors.unwrap_or_default(),
            },
            Err(_) => Self::Api {
                status: response.status,
                message: format!("Server error (status {})", response.status),
                field_errors: Vec::new(),
            },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Api { field_errors, .. } => field_errors,
            _ => &[],
        }
    }

    /// Message for the named form field, if the server reported one.
    pub fn field_message(&self, field: &str) -> Option<&str> {
        self.field_errors()
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// Extracts an error message from a response body, falling back to a default.
pub fn extract_error_message(response_bytes: &[u8], default: &str) -> String {
    serde_json::from_slice::<ApiErrorBody>(response_bytes)
        .map(|body| body.message)
        .unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_deserialization() {
        let json = r#"{
            "status": 400,
            "error": "Bad Request",
            "message": "Validation failed",
            "path": "/api/tasks",
            "timestamp": "2026-01-05T12:00:00",
            "fieldErrors": [{"field": "title", "message": "Title is required"}]
        }"#;
        let body: ApiErrorBody = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(body.status, 400);
        assert_eq!(body.message, "Validation failed");
        let field_errors = body.field_errors.expect("Should have field errors");
        assert_eq!(field_errors.len(), 1);
        assert_eq!(field_errors[0].field, "title");
    }

    #[test]
    fn test_envelope_without_field_errors() {
        let json = r#"{"status": 404, "error": "Not Found", "message": "Task not found"}"#;
        let body: ApiErrorBody = serde_json::from_str(json).expect("Should deserialize");
        assert!(body.field_errors.is_none());
        assert!(body.path.is_none());
    }

    #[test]
    fn test_from_response_parses_envelope() {
        let response = crate::fetch_service::scripted_response(
            400,
            br#"{"status":400,"error":"Bad Request","message":"Validation failed","fieldErrors":[{"field":"title","message":"Title is required"}]}"#,
        );
        let error = ApiError::from_response(&response);
        assert_eq!(error.to_string(), "Validation failed");
        assert_eq!(error.status(), Some(400));
        assert_eq!(error.field_message("title"), Some("Title is required"));
        assert_eq!(error.field_message("description"), None);
    }

    #[test]
    fn test_from_response_falls_back_on_garbage_body() {
        let response =
            crate::fetch_service::scripted_response(502, b"<html>upstream error</html>");
        let error = ApiError::from_response(&response);
        assert_eq!(error.to_string(), "Server error (status 502)");
        assert!(error.field_errors().is_empty());
    }

    #[test]
    fn test_extract_error_message_fallback() {
        assert_eq!(
            extract_error_message(b"not json", "Something went wrong"),
            "Something went wrong"
        );
        assert_eq!(
            extract_error_message(
                br#"{"status":401,"error":"Unauthorized","message":"Bad credentials"}"#,
                "Something went wrong"
            ),
            "Bad credentials"
        );
    }
}
