//! Data models for the Robinhood API.
//!
//! Models are organized by domain:
//!
//! - [`primitives`] - Newtypes like `Symbol`, `OrderId`, `DeviceToken`
//! - [`enums`] - Side, order type, trigger, time-in-force, bar intervals
//! - [`pairs`] - Crypto pair directory and symbol classification
//! - [`market_data`] - Quotes, historicals, fundamentals, instruments
//! - [`account`] - Accounts, portfolio, positions, dividends
//! - [`order`] - Equity and crypto order views
//! - [`trading`] - Order construction and payloads

pub mod primitives;
pub mod enums;
pub mod pairs;
pub mod market_data;
pub mod account;
pub mod order;
pub mod trading;

// Re-export commonly used types
pub use primitives::*;
pub use enums::*;
pub use pairs::*;
pub use market_data::*;
pub use account::*;
pub use order::*;
pub use trading::*;
