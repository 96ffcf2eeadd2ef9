//! Error types for the Robinhood API client.
//!
//! Failures fall into four groups: transport errors (anything the server
//! answered with a non-success status, or that never reached it), validation
//! errors raised before a request is sent, usage errors such as cancelling an
//! order that carries no cancellation link, and domain lookup errors for
//! unknown symbols. Nothing is retried.

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for Robinhood operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Robinhood API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a status was received (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned a non-success status
    #[error("API error: status={status}, message={message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Human-readable error message
        message: String,
        /// Raw response body for debugging
        body: Value,
    },

    /// Invalid input provided to a function (rejected before any request)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The order object exposes neither a `cancel` nor a `cancel_url` link
    #[error("Order has neither a 'cancel' nor a 'cancel_url' link")]
    MissingCancelUrl,

    /// Invalid symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// The operation is not available for this kind of instrument
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// The operation needs credentials that the session does not hold
    #[error("Not authenticated")]
    NotAuthenticated,

    /// A successful response did not contain what was expected
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Reading or writing a session file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` if this is an authentication-related error.
    ///
    /// Expired or revoked tokens are not refreshed by this crate; they come
    /// back from the server as a 401.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::NotAuthenticated => true,
            Error::Api { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// Returns `true` if the request was refused before reaching the network.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::MissingCancelUrl | Error::Unsupported(_)
        )
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, bad request, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 400 && *status < 500,
            Error::InvalidInput(_) | Error::InvalidSymbol(_) | Error::MissingCancelUrl => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Create an API error from a response.
    ///
    /// Robinhood reports problems as `{"detail": "..."}`, `{"error": "..."}`
    /// or a field-keyed map such as `{"non_field_errors": ["..."]}`.
    pub(crate) fn from_api_response(status: u16, body: Value) -> Self {
        let message = body
            .get("detail")
            .or_else(|| body.get("error_description"))
            .or_else(|| body.get("error"))
            .and_then(|m| m.as_str())
            .map(String::from)
            .or_else(|| {
                body.get("non_field_errors")
                    .and_then(|e| e.as_array())
                    .and_then(|e| e.first())
                    .and_then(|m| m.as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| "Unknown API error".to_string());

        Error::Api {
            status,
            message,
            body,
        }
    }
}
