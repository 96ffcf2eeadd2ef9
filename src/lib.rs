//! # robinhood-rs
//!
//! An async Rust client for Robinhood's private brokerage API.
//!
//! It covers login with optional MFA, market data, account data, and order
//! placement and cancellation for both equities and crypto pairs.
//!
//! ## Features
//!
//! - **Authentication**: password login as a two-step state machine, logout,
//!   and session persistence to a file
//! - **Market Data**: quotes (equity or crypto, picked per symbol),
//!   historical bars, fundamentals, instrument lookup
//! - **Account Data**: accounts, portfolio, positions, dividends
//! - **Orders**: market, limit, stop and trailing-stop orders, validated
//!   before anything is sent
//! - **Type Safety**: `Decimal` prices, typed order views, typed errors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use robinhood_rs::{LoginOutcome, Trader};
//! use robinhood_rs::models::PriceQuote;
//!
//! #[tokio::main]
//! async fn main() -> robinhood_rs::Result<()> {
//!     let trader = Trader::new()?;
//!
//!     match trader.login("username", "password").await? {
//!         LoginOutcome::Authenticated => {}
//!         LoginOutcome::ChallengeRequired(challenge) => {
//!             trader.complete_login(challenge, "123456").await?;
//!         }
//!         LoginOutcome::Rejected => return Ok(()),
//!     }
//!
//!     let quote = trader.quote("BTC").await?;
//!     println!("{}: bid={} ask={}", quote.symbol(), quote.bid(), quote.ask());
//!
//!     trader.save_session("robinhood-session.json").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Order Placement
//!
//! ```rust,no_run
//! use robinhood_rs::Trader;
//! use robinhood_rs::models::{OrderOptions, OrderView};
//! use rust_decimal_macros::dec;
//!
//! #[tokio::main]
//! async fn main() -> robinhood_rs::Result<()> {
//!     let trader = Trader::load_session("robinhood-session.json").await?;
//!
//!     // Sell 10 shares with a $5 trailing stop
//!     let ticket = trader
//!         .sell("AAPL", dec!(10), OrderOptions::default().with_trailing_stop_amount(dec!(5)))
//!         .await?;
//!     println!("Order placed: {} ({:?})", ticket.id(), ticket.state());
//!
//!     ticket.cancel().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use error::{Error, Result};
pub use models::{DeviceToken, OrderId, Symbol};
pub use client::{ClientConfig, OrderTicket, Trader};
pub use auth::{LoginOutcome, MfaChallenge, Session};

/// Prelude module for convenient imports.
///
/// ```rust
/// use robinhood_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        // Primitives
        DeviceToken, OrderId, Symbol,
        // Enums
        Bounds, Interval, OrderState, OrderType, Side, Span, TimeInForce, Trigger,
        // Market data
        CryptoQuote, Fundamentals, Historicals, Instrument, MarketQuote, PriceQuote, Quote,
        // Account models
        Account, CryptoAccount, Dividend, Portfolio, Position,
        // Orders
        Cancellable, CryptoOrder, Order, OrderLookup, OrderOptions, OrderRequest, OrderView,
        PlacedOrder,
    };
    pub use crate::client::{ClientConfig, OrderTicket, Trader};
    pub use crate::auth::{LoginOutcome, MfaChallenge, Session};
}
