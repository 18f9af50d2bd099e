use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error ({status}): {body}")]
    ServerError { status: u16, body: String },

    #[error("Request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Keys the backend uses for human-readable error text, in lookup order
const DETAIL_KEYS: [&str; 4] = ["detail", "error", "msg", "non_field_errors"];

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized(truncated),
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            code @ 500..=599 => ApiError::ServerError {
                status: code,
                body: truncated,
            },
            code => ApiError::Rejected {
                status: code,
                body: truncated,
            },
        }
    }

    pub fn storage(err: anyhow::Error) -> Self {
        ApiError::Storage(format!("{:#}", err))
    }

    /// HTTP status that produced this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::AccessDenied(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::RateLimited => Some(429),
            ApiError::ServerError { status, .. } | ApiError::Rejected { status, .. } => {
                Some(*status)
            }
            ApiError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Raw (possibly truncated) response body carried by the error.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized(body)
            | ApiError::AccessDenied(body)
            | ApiError::NotFound(body)
            | ApiError::ServerError { body, .. }
            | ApiError::Rejected { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Extract the server-provided error text from a JSON error body.
    ///
    /// Django REST Framework reports errors as `{"detail": ...}`, while the
    /// account views use `{"error": ...}` and validation failures arrive as
    /// `{"non_field_errors": [...]}`.
    pub fn detail(&self) -> Option<String> {
        let body = self.body()?;
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        let object = value.as_object()?;

        DETAIL_KEYS.iter().find_map(|key| match object.get(*key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => items
                .first()
                .and_then(|v| v.as_str())
                .map(str::to_string),
            _ => None,
        })
    }

    /// Message suitable for showing to a user, falling back to `default`
    /// when the server gave no structured detail.
    pub fn user_message(&self, default: &str) -> String {
        self.detail().unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_maps_variants() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, "{}"),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, ""),
            ApiError::ServerError { status: 502, .. }
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, ""),
            ApiError::Rejected { status: 400, .. }
        ));
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(600);
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, &long);
        let body = err.body().unwrap();
        assert!(body.starts_with(&"x".repeat(500)));
        assert!(body.contains("600 total bytes"));
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let long = "é".repeat(400);
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, &long);
        assert!(err.body().unwrap().contains("800 total bytes"));
    }

    #[test]
    fn test_detail_extraction() {
        let err = ApiError::from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"detail": "Given token not valid for any token type"}"#,
        );
        assert_eq!(
            err.detail().as_deref(),
            Some("Given token not valid for any token type")
        );

        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"error": "Invalid token."}"#);
        assert_eq!(err.detail().as_deref(), Some("Invalid token."));

        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"non_field_errors": ["User not found."]}"#,
        );
        assert_eq!(err.detail().as_deref(), Some("User not found."));
    }

    #[test]
    fn test_user_message_fallback() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.user_message("Login failed"), "Login failed");

        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"password": ["Too short."]}"#);
        assert_eq!(err.user_message("Registration failed"), "Registration failed");
    }

    #[test]
    fn test_status() {
        assert_eq!(ApiError::from_status(StatusCode::UNAUTHORIZED, "").status(), Some(401));
        assert_eq!(ApiError::from_status(StatusCode::CONFLICT, "").status(), Some(409));
        assert_eq!(ApiError::Storage("x".into()).status(), None);
    }
}
