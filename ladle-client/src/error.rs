use ladle_core::{CoreError, ErrorResponse, LOGIN_PATH};

/// Everything a client call can fail with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// No response: connection refused, DNS, timeout
    #[error("network error: {0}")]
    Network(String),

    /// 401. The session token has already been evicted.
    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("a recipe named \"{0}\" already exists")]
    DuplicateTitle(String),

    #[error("{0}")]
    SelfModification(String),

    #[error("{0}")]
    Validation(String),

    #[error("not logged in")]
    NotLoggedIn,
}

impl ApiError {
    /// Map a non-success status and its body to an error. The server's
    /// `{"error": ...}` message is used when present.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorResponse>(body)
            .map(|e| e.error)
            .unwrap_or_else(|_| {
                let text = String::from_utf8_lossy(body).trim().to_string();
                if text.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    text
                }
            });

        match status {
            400 | 409 | 413 | 422 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            _ => ApiError::Server { status, message },
        }
    }

    /// HTTP status behind the error, if there was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::BadRequest(_) => Some(400),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Where the UI should go after this error, if anywhere.
    pub fn redirect(&self) -> Option<&'static str> {
        match self {
            ApiError::Unauthorized(_) | ApiError::NotLoggedIn => Some(LOGIN_PATH),
            _ => None,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::DuplicateTitle(title) => ApiError::DuplicateTitle(title),
            other => ApiError::Validation(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_uses_error_body() {
        let err = ApiError::from_status(400, br#"{"error":"Title cannot be empty"}"#);
        assert_eq!(err, ApiError::BadRequest("Title cannot be empty".to_string()));
    }

    #[test]
    fn test_from_status_without_body() {
        assert_eq!(
            ApiError::from_status(502, b""),
            ApiError::Server {
                status: 502,
                message: "HTTP 502".to_string()
            }
        );
        assert_eq!(
            ApiError::from_status(404, b"gone"),
            ApiError::NotFound("gone".to_string())
        );
    }

    #[test]
    fn test_only_auth_errors_redirect() {
        assert_eq!(ApiError::Unauthorized(String::new()).redirect(), Some("/login"));
        assert_eq!(ApiError::NotLoggedIn.redirect(), Some("/login"));
        assert_eq!(ApiError::Forbidden(String::new()).redirect(), None);
        assert_eq!(ApiError::Network(String::new()).redirect(), None);
    }

    #[test]
    fn test_core_duplicate_maps_to_duplicate_title() {
        let err: ApiError = CoreError::DuplicateTitle("Soup".to_string()).into();
        assert_eq!(err, ApiError::DuplicateTitle("Soup".to_string()));
        let err: ApiError = CoreError::InvalidRating(9).into();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
