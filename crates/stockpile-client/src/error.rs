//! Client error types.
//!
//! Every failure the API client can produce falls into one of the variants
//! below. Only the first-occurrence `401` is recovered internally (see
//! [`crate::http`]); everything else surfaces to the caller unchanged.

use crate::session::StorageError;

/// Errors produced by the Stockpile API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (connect error, timeout,
    /// DNS failure).
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The server rejected the credentials with `401 Unauthorized` and the
    /// retry flow did not apply (auth endpoint, or already retried).
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description extracted from the response body, if any.
        message: String,
    },

    /// The token refresh endpoint rejected the refresh token or failed.
    /// The session has been cleared by the time this error is returned.
    #[error("Token refresh failed: {message}")]
    RefreshFailed {
        /// Description of the refresh failure.
        message: String,
    },

    /// Registration was rejected because the email address is already in use.
    #[error("Email address already in use")]
    EmailTaken,

    /// The server rejected the request with a non-401 4xx status.
    #[error("Validation error (HTTP {status}): {message}")]
    Validation {
        /// The HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
        /// Names of the offending fields, when the body is a field-error
        /// map. The field keys are stable even when the backend localizes
        /// the message text.
        fields: Vec<String>,
    },

    /// The server failed with a 5xx status.
    #[error("Server error (HTTP {status}): {message}")]
    Server {
        /// The HTTP status code.
        status: u16,
        /// Raw response body.
        message: String,
    },

    /// Session persistence failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The response body could not be parsed as the expected JSON shape.
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },
}

impl ApiError {
    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `RefreshFailed` error.
    #[must_use]
    pub fn refresh_failed(message: impl Into<String>) -> Self {
        Self::RefreshFailed {
            message: message.into(),
        }
    }

    /// Creates a new `Validation` error without field details.
    #[must_use]
    pub fn validation(status: u16, message: impl Into<String>) -> Self {
        Self::Validation {
            status,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Creates a new `Server` error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Creates a new `Decode` error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Validation { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this error means the user is no longer logged in.
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::RefreshFailed { .. })
    }

    /// Returns `true` if the request never reached the server.
    #[must_use]
    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::unauthorized("token expired");
        assert_eq!(err.to_string(), "Unauthorized: token expired");

        let err = ApiError::refresh_failed("HTTP 401");
        assert_eq!(err.to_string(), "Token refresh failed: HTTP 401");

        let err = ApiError::validation(409, "category with this name already exists");
        assert_eq!(
            err.to_string(),
            "Validation error (HTTP 409): category with this name already exists"
        );

        let err = ApiError::EmailTaken;
        assert_eq!(err.to_string(), "Email address already in use");
    }

    #[test]
    fn test_error_status() {
        assert_eq!(ApiError::unauthorized("x").status(), Some(401));
        assert_eq!(ApiError::validation(409, "x").status(), Some(409));
        assert_eq!(ApiError::server(503, "x").status(), Some(503));
        assert_eq!(ApiError::EmailTaken.status(), None);
        assert_eq!(ApiError::refresh_failed("x").status(), None);
    }

    #[test]
    fn test_error_predicates() {
        assert!(ApiError::unauthorized("x").is_auth_error());
        assert!(ApiError::refresh_failed("x").is_auth_error());
        assert!(!ApiError::validation(400, "x").is_auth_error());
        assert!(!ApiError::server(500, "x").is_network_error());
    }
}
