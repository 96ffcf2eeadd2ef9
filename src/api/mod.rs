//! Service modules for Robinhood endpoints.
//!
//! Each service covers one concern and is driven through
//! [`Trader`](crate::Trader).

mod accounts;
mod market_data;
mod orders;

pub(crate) use accounts::AccountsService;
pub(crate) use market_data::MarketDataService;
pub(crate) use orders::OrdersService;
