//! Account, portfolio, position and dividend models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A brokerage account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Resource URL, referenced by equity orders
    pub url: String,
    /// Account number
    pub account_number: String,
    /// `cash` or `margin`
    #[serde(default, rename = "type")]
    pub account_type: Option<String>,
    /// Settled cash
    #[serde(default)]
    pub cash: Option<Decimal>,
    /// Buying power
    #[serde(default)]
    pub buying_power: Option<Decimal>,
    /// Cash available for withdrawal
    #[serde(default)]
    pub cash_available_for_withdrawal: Option<Decimal>,
    /// Cash held for open orders
    #[serde(default)]
    pub cash_held_for_orders: Option<Decimal>,
    /// Unsettled funds
    #[serde(default)]
    pub unsettled_funds: Option<Decimal>,
    /// Resource URL of the portfolio
    #[serde(default)]
    pub portfolio: Option<String>,
    /// Resource URL of the positions list
    #[serde(default)]
    pub positions: Option<String>,
    /// Whether the account is deactivated
    #[serde(default)]
    pub deactivated: bool,
    /// When the account was opened
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The crypto trading account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoAccount {
    /// Crypto account identifier
    pub id: String,
    /// Account status (`active`, ...)
    #[serde(default)]
    pub status: Option<String>,
    /// Owning user
    #[serde(default)]
    pub user_id: Option<String>,
    /// Buying power for crypto
    #[serde(default)]
    pub buying_power: Option<Decimal>,
    /// When the account was opened
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the account was last updated
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Portfolio valuation. The provider supports one portfolio per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    /// Resource URL
    #[serde(default)]
    pub url: Option<String>,
    /// Resource URL of the owning account
    #[serde(default)]
    pub account: Option<String>,
    /// Account identifier used by crypto order submission
    #[serde(default)]
    pub account_id: Option<String>,
    /// Total equity
    #[serde(default)]
    pub equity: Option<Decimal>,
    /// Equity including extended-hours prices
    #[serde(default)]
    pub extended_hours_equity: Option<Decimal>,
    /// Market value of holdings
    #[serde(default)]
    pub market_value: Option<Decimal>,
    /// Equity at the previous close
    #[serde(default)]
    pub equity_previous_close: Option<Decimal>,
    /// Withdrawable amount
    #[serde(default)]
    pub withdrawable_amount: Option<Decimal>,
    /// Portfolio start date
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

/// An equity position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Resource URL
    #[serde(default)]
    pub url: Option<String>,
    /// Resource URL of the held instrument
    pub instrument: String,
    /// Resource URL of the owning account
    #[serde(default)]
    pub account: Option<String>,
    /// Shares held
    pub quantity: Decimal,
    /// Average cost per share
    #[serde(default)]
    pub average_buy_price: Option<Decimal>,
    /// Shares reserved by open sell orders
    #[serde(default)]
    pub shares_held_for_sells: Option<Decimal>,
    /// Shares bought today
    #[serde(default)]
    pub intraday_quantity: Option<Decimal>,
    /// When the position was opened
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the position last changed
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Position {
    /// Returns `true` if shares are currently held.
    pub fn is_open(&self) -> bool {
        self.quantity > Decimal::ZERO
    }

    /// Cost basis of the position.
    pub fn cost_basis(&self) -> Option<Decimal> {
        self.average_buy_price.map(|p| p * self.quantity)
    }
}

/// A dividend payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dividend {
    /// Dividend identifier
    pub id: String,
    /// Resource URL of the paying instrument
    #[serde(default)]
    pub instrument: Option<String>,
    /// Resource URL of the receiving account
    #[serde(default)]
    pub account: Option<String>,
    /// Amount paid
    pub amount: Decimal,
    /// Rate per share
    #[serde(default)]
    pub rate: Option<Decimal>,
    /// Shares the dividend was paid on
    #[serde(default)]
    pub position: Option<Decimal>,
    /// Tax withheld
    #[serde(default)]
    pub withholding: Option<Decimal>,
    /// `pending`, `paid`, `reinvested`, ...
    #[serde(default)]
    pub state: Option<String>,
    /// Record date
    #[serde(default)]
    pub record_date: Option<NaiveDate>,
    /// Payable date
    #[serde(default)]
    pub payable_date: Option<NaiveDate>,
    /// When the payment was made
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}
