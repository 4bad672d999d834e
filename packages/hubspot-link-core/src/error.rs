//! Error type shared by the integration and items clients.

use thiserror::Error;

/// Result alias for integration operations
pub type Result<T> = std::result::Result<T, IntegrationError>;

/// Maximum length for response bodies carried in errors
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Failures surfaced by the HubSpot integration client
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// The request never produced a response (connection refused, DNS, TLS, ...)
    #[error("Request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status
    #[error("Server returned {status} for {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body was not the JSON we expected
    #[error("Invalid response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The navigator could not open the authorization URL
    #[error("Failed to open authorization URL: {0}")]
    Navigation(String),

    /// No usable access token
    #[error("Not authenticated - no access token available")]
    NotAuthenticated,
}

impl IntegrationError {
    pub(crate) fn request(endpoint: &str, source: reqwest::Error) -> Self {
        IntegrationError::Request {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    pub(crate) fn decode(endpoint: &str, source: reqwest::Error) -> Self {
        IntegrationError::Decode {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    pub(crate) fn status(endpoint: &str, status: reqwest::StatusCode, body: &str) -> Self {
        IntegrationError::Status {
            endpoint: endpoint.to_string(),
            status,
            body: truncate_body(body),
        }
    }

    /// HTTP status of the failed response, if the backend answered at all
    pub fn status_code(&self) -> Option<reqwest::StatusCode> {
        match self {
            IntegrationError::Status { status, .. } => Some(*status),
            IntegrationError::Request { source, .. } | IntegrationError::Decode { source, .. } => {
                source.status()
            }
            _ => None,
        }
    }
}

/// Cut a response body down to a loggable size without splitting a character
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_short() {
        assert_eq!(truncate_body("No credentials found"), "No credentials found");
    }

    #[test]
    fn test_truncate_body_long() {
        let body = "x".repeat(1200);
        let truncated = truncate_body(&body);
        assert!(truncated.starts_with(&"x".repeat(500)));
        assert!(truncated.ends_with("(truncated, 1200 total bytes)"));
    }

    #[test]
    fn test_truncate_body_multibyte_boundary() {
        // 499 ASCII bytes followed by a 2-byte char straddling the limit
        let body = format!("{}é{}", "a".repeat(499), "b".repeat(100));
        let truncated = truncate_body(&body);
        assert!(truncated.starts_with(&"a".repeat(499)));
        assert!(!truncated.contains('é'));
    }

    #[test]
    fn test_status_error_message() {
        let err = IntegrationError::status(
            "/get_hubspot_credentials",
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"detail":"No credentials found"}"#,
        );
        assert_eq!(err.status_code(), Some(reqwest::StatusCode::BAD_REQUEST));
        assert!(err.to_string().contains("400 Bad Request"));
        assert!(err.to_string().contains("No credentials found"));
    }
}
