//! Order models: read-only views of equity and crypto orders.
//!
//! Orders are immutable snapshots. To see a newer state, fetch the order
//! again by id. Equity and crypto orders carry different account and
//! instrument fields; both implement [`OrderView`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::*;
use super::primitives::OrderId;
use crate::{Error, Result};

/// Anything that can be passed to `Trader::cancel`.
pub trait Cancellable {
    /// The link that cancels this order, if it can still be cancelled.
    fn cancel_url(&self) -> Option<&str>;
}

/// Anything that identifies an order for `Trader::order` and
/// `Trader::crypto_order`.
pub trait OrderLookup {
    /// The order identifier.
    fn order_id(&self) -> Result<OrderId>;
}

/// The read-only surface shared by equity and crypto orders.
pub trait OrderView: Cancellable {
    /// Order identifier.
    fn id(&self) -> &str;
    /// Current state.
    fn state(&self) -> OrderState;
    /// Buy or sell.
    fn side(&self) -> Side;
    /// Market or limit.
    fn order_type(&self) -> OrderType;
    /// Immediate or stop.
    fn trigger(&self) -> Trigger;
    /// Time in force.
    fn time_in_force(&self) -> TimeInForce;
    /// Ordered quantity.
    fn quantity(&self) -> Decimal;
    /// Limit or collar price.
    fn price(&self) -> Option<Decimal>;
    /// Quantity executed so far.
    fn cumulative_quantity(&self) -> Decimal;
    /// Average fill price.
    fn average_price(&self) -> Option<Decimal>;
    /// Fills, oldest first.
    fn executions(&self) -> &[Execution];

    /// Returns `true` if nothing more can happen to this order.
    fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    /// Returns `true` if the order is completely filled.
    fn is_filled(&self) -> bool {
        matches!(self.state(), OrderState::Filled)
    }
}

/// A single fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    /// Execution identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Fill price
    #[serde(alias = "effective_price")]
    pub price: Decimal,
    /// Filled quantity
    pub quantity: Decimal,
    /// When the fill happened
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Settlement date (equities)
    #[serde(default)]
    pub settlement_date: Option<NaiveDate>,
}

impl Execution {
    /// Notional value of this fill.
    pub fn value(&self) -> Decimal {
        self.price * self.quantity
    }
}

/// An equity order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    account: Option<String>,
    #[serde(default)]
    instrument: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
    side: Side,
    #[serde(rename = "type")]
    order_type: OrderType,
    trigger: Trigger,
    time_in_force: TimeInForce,
    quantity: Decimal,
    #[serde(default)]
    price: Option<Decimal>,
    #[serde(default)]
    stop_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state: Option<OrderState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<OrderState>,
    #[serde(default)]
    cancel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cancel_url: Option<String>,
    #[serde(default)]
    cumulative_quantity: Decimal,
    #[serde(default)]
    average_price: Option<Decimal>,
    #[serde(default)]
    fees: Option<Decimal>,
    #[serde(default)]
    extended_hours: bool,
    #[serde(default)]
    reject_reason: Option<String>,
    #[serde(default)]
    executions: Vec<Execution>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Resource URL of the order.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Resource URL of the owning account.
    pub fn account_url(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// Resource URL of the traded instrument.
    pub fn instrument_url(&self) -> Option<&str> {
        self.instrument.as_deref()
    }

    /// Trading symbol, when the provider includes it.
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// Stop price for stop and trailing-stop orders.
    pub fn stop_price(&self) -> Option<Decimal> {
        self.stop_price
    }

    /// Fees charged.
    pub fn fees(&self) -> Option<Decimal> {
        self.fees
    }

    /// Whether the order may execute outside regular hours.
    pub fn extended_hours(&self) -> bool {
        self.extended_hours
    }

    /// Why the order was rejected, if it was.
    pub fn reject_reason(&self) -> Option<&str> {
        self.reject_reason.as_deref()
    }

    /// When the order was created.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// When the order was last updated.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Cancellable for Order {
    fn cancel_url(&self) -> Option<&str> {
        self.cancel.as_deref().or(self.cancel_url.as_deref())
    }
}

impl OrderView for Order {
    fn id(&self) -> &str {
        &self.id
    }

    fn state(&self) -> OrderState {
        self.state.or(self.status).unwrap_or(OrderState::Unknown)
    }

    fn side(&self) -> Side {
        self.side
    }

    fn order_type(&self) -> OrderType {
        self.order_type
    }

    fn trigger(&self) -> Trigger {
        self.trigger
    }

    fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    fn quantity(&self) -> Decimal {
        self.quantity
    }

    fn price(&self) -> Option<Decimal> {
        self.price
    }

    fn cumulative_quantity(&self) -> Decimal {
        self.cumulative_quantity
    }

    fn average_price(&self) -> Option<Decimal> {
        self.average_price
    }

    fn executions(&self) -> &[Execution] {
        &self.executions
    }
}

/// A crypto order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoOrder {
    id: String,
    #[serde(default)]
    account_id: Option<String>,
    #[serde(default)]
    currency_pair_id: Option<String>,
    #[serde(default)]
    ref_id: Option<String>,
    side: Side,
    #[serde(rename = "type")]
    order_type: OrderType,
    #[serde(default = "immediate")]
    trigger: Trigger,
    time_in_force: TimeInForce,
    quantity: Decimal,
    #[serde(default)]
    price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state: Option<OrderState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<OrderState>,
    #[serde(default)]
    cancel_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cancel: Option<String>,
    #[serde(default)]
    cumulative_quantity: Decimal,
    #[serde(default)]
    average_price: Option<Decimal>,
    #[serde(default)]
    rounded_executed_notional: Option<Decimal>,
    #[serde(default)]
    executions: Vec<Execution>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    last_transaction_at: Option<DateTime<Utc>>,
}

fn immediate() -> Trigger {
    Trigger::Immediate
}

impl CryptoOrder {
    /// Crypto account the order belongs to.
    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    /// Provider identifier of the traded pair.
    pub fn currency_pair_id(&self) -> Option<&str> {
        self.currency_pair_id.as_deref()
    }

    /// Client reference id sent with the submission.
    pub fn ref_id(&self) -> Option<&str> {
        self.ref_id.as_deref()
    }

    /// Executed notional, rounded to cents.
    pub fn executed_notional(&self) -> Option<Decimal> {
        self.rounded_executed_notional
    }

    /// When the order was created.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// When the order was last updated.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// When the order last executed.
    pub fn last_transaction_at(&self) -> Option<DateTime<Utc>> {
        self.last_transaction_at
    }
}

impl Cancellable for CryptoOrder {
    fn cancel_url(&self) -> Option<&str> {
        self.cancel_url.as_deref().or(self.cancel.as_deref())
    }
}

impl OrderView for CryptoOrder {
    fn id(&self) -> &str {
        &self.id
    }

    fn state(&self) -> OrderState {
        self.state.or(self.status).unwrap_or(OrderState::Unknown)
    }

    fn side(&self) -> Side {
        self.side
    }

    fn order_type(&self) -> OrderType {
        self.order_type
    }

    fn trigger(&self) -> Trigger {
        self.trigger
    }

    fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    fn quantity(&self) -> Decimal {
        self.quantity
    }

    fn price(&self) -> Option<Decimal> {
        self.price
    }

    fn cumulative_quantity(&self) -> Decimal {
        self.cumulative_quantity
    }

    fn average_price(&self) -> Option<Decimal> {
        self.average_price
    }

    fn executions(&self) -> &[Execution] {
        &self.executions
    }
}

/// An order as returned by placement: equity or crypto.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacedOrder {
    /// Equity order
    Equity(Order),
    /// Crypto order
    Crypto(CryptoOrder),
}

impl PlacedOrder {
    /// Returns `true` if this is a crypto order.
    pub fn is_crypto(&self) -> bool {
        matches!(self, PlacedOrder::Crypto(_))
    }

    /// The equity order, if this is one.
    pub fn as_equity(&self) -> Option<&Order> {
        match self {
            PlacedOrder::Equity(o) => Some(o),
            PlacedOrder::Crypto(_) => None,
        }
    }

    /// The crypto order, if this is one.
    pub fn as_crypto(&self) -> Option<&CryptoOrder> {
        match self {
            PlacedOrder::Crypto(o) => Some(o),
            PlacedOrder::Equity(_) => None,
        }
    }

    fn inner(&self) -> &dyn OrderView {
        match self {
            PlacedOrder::Equity(o) => o,
            PlacedOrder::Crypto(o) => o,
        }
    }
}

impl Cancellable for PlacedOrder {
    fn cancel_url(&self) -> Option<&str> {
        self.inner().cancel_url()
    }
}

impl OrderView for PlacedOrder {
    fn id(&self) -> &str {
        self.inner().id()
    }

    fn state(&self) -> OrderState {
        self.inner().state()
    }

    fn side(&self) -> Side {
        self.inner().side()
    }

    fn order_type(&self) -> OrderType {
        self.inner().order_type()
    }

    fn trigger(&self) -> Trigger {
        self.inner().trigger()
    }

    fn time_in_force(&self) -> TimeInForce {
        self.inner().time_in_force()
    }

    fn quantity(&self) -> Decimal {
        self.inner().quantity()
    }

    fn price(&self) -> Option<Decimal> {
        self.inner().price()
    }

    fn cumulative_quantity(&self) -> Decimal {
        self.inner().cumulative_quantity()
    }

    fn average_price(&self) -> Option<Decimal> {
        self.inner().average_price()
    }

    fn executions(&self) -> &[Execution] {
        self.inner().executions()
    }
}

// Raw order-like JSON, e.g. a response kept from an earlier call.

impl Cancellable for Value {
    fn cancel_url(&self) -> Option<&str> {
        self.get("cancel")
            .and_then(Value::as_str)
            .or_else(|| self.get("cancel_url").and_then(Value::as_str))
    }
}

impl OrderLookup for Value {
    fn order_id(&self) -> Result<OrderId> {
        self.get("id")
            .and_then(Value::as_str)
            .map(OrderId::from)
            .ok_or_else(|| Error::InvalidInput("order object has no 'id' field".to_string()))
    }
}

impl OrderLookup for str {
    fn order_id(&self) -> Result<OrderId> {
        if self.trim().is_empty() {
            return Err(Error::InvalidInput("order id is empty".to_string()));
        }
        Ok(OrderId::from(self))
    }
}

impl OrderLookup for String {
    fn order_id(&self) -> Result<OrderId> {
        self.as_str().order_id()
    }
}

impl OrderLookup for OrderId {
    fn order_id(&self) -> Result<OrderId> {
        Ok(self.clone())
    }
}

impl OrderLookup for Order {
    fn order_id(&self) -> Result<OrderId> {
        Ok(OrderId::new(&self.id))
    }
}

impl OrderLookup for CryptoOrder {
    fn order_id(&self) -> Result<OrderId> {
        Ok(OrderId::new(&self.id))
    }
}

impl OrderLookup for PlacedOrder {
    fn order_id(&self) -> Result<OrderId> {
        Ok(OrderId::new(self.id()))
    }
}
