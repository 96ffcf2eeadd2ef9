//! Enumeration types for the Robinhood API.
//!
//! This module contains the enum types used throughout the API: order
//! sides and types, triggers, time-in-force, order states and the
//! parameters of historical quote requests.

use serde::{Deserialize, Serialize};

/// Side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy
    Buy,
    /// Sell
    Sell,
}

impl Side {
    /// Returns `true` if this is a buy.
    pub fn is_buy(&self) -> bool {
        matches!(self, Side::Buy)
    }

    /// Returns `true` if this is a sell.
    pub fn is_sell(&self) -> bool {
        !self.is_buy()
    }
}

/// How the order is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Execute at the current market price (the provider still expects a
    /// collar price)
    Market,
    /// Execute at the given price or better
    Limit,
}

/// When the order becomes active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Active as soon as it is accepted
    Immediate,
    /// Active once the stop price is reached
    Stop,
}

/// How long an order remains working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Good for day - cancelled at the end of the trading day
    Gfd,
    /// Good till cancelled
    Gtc,
    /// Immediate or cancel (only seen on orders placed elsewhere)
    Ioc,
    /// At the opening (only seen on orders placed elsewhere)
    Opg,
}

impl TimeInForce {
    /// The wire value of this time-in-force.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gfd => "gfd",
            TimeInForce::Gtc => "gtc",
            TimeInForce::Ioc => "ioc",
            TimeInForce::Opg => "opg",
        }
    }
}

/// Current state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    /// Waiting to be sent to the market
    Queued,
    /// Received but not yet acknowledged
    Unconfirmed,
    /// Acknowledged and working
    Confirmed,
    /// Crypto order accepted and waiting to fill
    Pending,
    /// Some quantity has executed
    PartiallyFilled,
    /// Completely filled
    Filled,
    /// Cancelled
    #[serde(alias = "cancelled")]
    Canceled,
    /// Rejected by the broker
    Rejected,
    /// Failed
    Failed,
    /// Unknown state (forward-compatibility)
    #[serde(other)]
    Unknown,
}

impl OrderState {
    /// Returns `true` if the order can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderState::Filled | OrderState::Canceled | OrderState::Rejected | OrderState::Failed
        )
    }

    /// Returns `true` if the order is still working.
    pub fn is_working(&self) -> bool {
        matches!(
            self,
            OrderState::Queued
                | OrderState::Unconfirmed
                | OrderState::Confirmed
                | OrderState::Pending
                | OrderState::PartiallyFilled
        )
    }
}

/// Bar width of a historical quote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// Five-minute bars
    #[serde(rename = "5minute")]
    FiveMinute,
    /// Ten-minute bars
    #[serde(rename = "10minute")]
    TenMinute,
    /// Daily bars
    #[serde(rename = "day")]
    Day,
    /// Weekly bars
    #[serde(rename = "week")]
    Week,
}

impl Interval {
    /// The wire value of this interval.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::FiveMinute => "5minute",
            Interval::TenMinute => "10minute",
            Interval::Day => "day",
            Interval::Week => "week",
        }
    }

    /// Whether the provider documents this interval/span combination.
    ///
    /// Intraday bars go with a day or week span, daily bars with a year,
    /// and weekly bars with any span. Other combinations are still sent;
    /// the provider decides whether to reject them.
    pub fn supports_span(&self, span: Span) -> bool {
        match self {
            Interval::FiveMinute | Interval::TenMinute => {
                matches!(span, Span::Day | Span::Week)
            }
            Interval::Day => matches!(span, Span::Year),
            Interval::Week => true,
        }
    }
}

/// Time range covered by a historical quote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Span {
    /// The current or most recent trading day
    #[serde(rename = "day")]
    Day,
    /// One week
    #[serde(rename = "week")]
    Week,
    /// One month
    #[serde(rename = "month")]
    Month,
    /// Three months
    #[serde(rename = "3month")]
    ThreeMonth,
    /// One year
    #[serde(rename = "year")]
    Year,
    /// Five years
    #[serde(rename = "5year")]
    FiveYear,
}

impl Span {
    /// The wire value of this span.
    pub fn as_str(&self) -> &'static str {
        match self {
            Span::Day => "day",
            Span::Week => "week",
            Span::Month => "month",
            Span::ThreeMonth => "3month",
            Span::Year => "year",
            Span::FiveYear => "5year",
        }
    }
}

/// Trading session bounds of a historical quote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Bounds {
    /// Regular trading hours
    #[default]
    Regular,
    /// Include the immediate (extended) session
    Immediate,
}

impl Bounds {
    /// The wire value of these bounds.
    pub fn as_str(&self) -> &'static str {
        match self {
            Bounds::Regular => "regular",
            Bounds::Immediate => "immediate",
        }
    }
}
