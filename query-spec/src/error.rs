//! Error types and HTTP response conversion
//!
//! Page, page size and sort values never fail a request; they resolve to
//! defaults instead. The errors below cover the remaining edges: loading
//! configuration, decoding a raw query string, endpoint filter allow-lists,
//! and response envelope keys.

#[cfg(feature = "axum")]
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// A client filter is not in the endpoint's allow-list
    #[error("Filter '{field}' is not allowed (allowed: {})", allowed.join(", "))]
    FilterNotAllowed {
        /// The rejected filter name
        field: String,
        /// The names the endpoint accepts
        allowed: Vec<String>,
    },

    /// The raw query string could not be decoded
    #[error("Invalid query string: {0}")]
    InvalidQueryString(String),

    /// The response envelope key is empty or collides with `meta`
    #[error("Invalid entity key: '{0}'")]
    InvalidEntityKey(String),
}

impl Error {
    /// Stable machine-readable code for the error
    ///
    /// # Example
    ///
    /// ```rust
    /// use query_spec::Error;
    ///
    /// let error = Error::InvalidEntityKey("meta".to_string());
    /// assert_eq!(error.code(), "INVALID_ENTITY_KEY");
    /// ```
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::FilterNotAllowed { .. } => "FILTER_NOT_ALLOWED",
            Self::InvalidQueryString(_) => "INVALID_QUERY_STRING",
            Self::InvalidEntityKey(_) => "INVALID_ENTITY_KEY",
        }
    }

    /// Whether the error was caused by the client's request
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::FilterNotAllowed { .. } | Self::InvalidQueryString(_)
        )
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Error code
    pub code: String,

    /// HTTP status code
    pub status: u16,
}

#[cfg(feature = "axum")]
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(code = self.code(), "{}", self);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}
