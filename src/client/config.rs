//! Client configuration options.

use std::time::Duration;

use super::endpoints::Endpoints;
use crate::models::CryptoPairs;

/// OAuth client id used by the web application.
pub const DEFAULT_CLIENT_ID: &str = "c82SH0WZOsabOXGP2sxqcj34FxkvfnWRZBKlBjFS";

/// API version sent in `X-Robinhood-API-Version`.
pub const DEFAULT_API_VERSION: &str = "1.265.0";

/// Configuration for the Robinhood client.
///
/// # Example
///
/// ```
/// use robinhood_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(30))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Value of the `X-Robinhood-API-Version` header
    pub api_version: String,
    /// OAuth client id for login and token revocation
    pub client_id: String,
    /// Where requests are sent
    pub endpoints: Endpoints,
    /// Known crypto pairs
    pub crypto_pairs: CryptoPairs,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            user_agent: format!("robinhood-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            api_version: DEFAULT_API_VERSION.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            endpoints: Endpoints::default(),
            crypto_pairs: CryptoPairs::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the API version header.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the OAuth client id.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Send requests to other endpoints.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Replace the crypto pair directory.
    pub fn with_crypto_pairs(mut self, pairs: CryptoPairs) -> Self {
        self.crypto_pairs = pairs;
        self
    }
}
