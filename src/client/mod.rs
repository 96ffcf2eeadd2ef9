//! HTTP client and facade for the Robinhood API.
//!
//! [`Trader`] is the entry point. [`ClientConfig`] tunes the transport and
//! [`Endpoints`] decides where requests go.
//!
//! # Example
//!
//! ```no_run
//! use robinhood_rs::{ClientConfig, Trader};
//! use robinhood_rs::client::Endpoints;
//!
//! # fn example() -> robinhood_rs::Result<()> {
//! let config = ClientConfig::default()
//!     .with_endpoints(Endpoints::new("http://localhost:8080", "http://localhost:8080/nummus")?);
//! let trader = Trader::with_config(config)?;
//! # Ok(())
//! # }
//! ```

mod config;
mod endpoints;
mod http;
mod trader;

pub use config::{ClientConfig, DEFAULT_API_VERSION, DEFAULT_CLIENT_ID};
pub use endpoints::{Endpoints, DEFAULT_API_BASE, DEFAULT_CRYPTO_BASE};
pub use trader::{OrderTicket, Trader};
pub(crate) use http::{ClientInner, Paginated};
