//! Order construction: trading parameters in, provider payloads out.
//!
//! Placing an order goes through three steps:
//!
//! 1. [`OrderRequest::plan`] validates the parameters against the market the
//!    symbol trades on and classifies the order (type, trigger,
//!    time-in-force). Every validation error is raised here, before any
//!    request is sent.
//! 2. The caller fetches what the plan asks for (instrument, account, and a
//!    quote when [`OrderPlan::needs_quote`] says so).
//! 3. [`OrderPlan::equity_payload`] or [`OrderPlan::crypto_payload`] builds
//!    the body. Unset fields are left out of the serialized JSON.
//!
//! ```
//! use robinhood_rs::models::{CryptoPairs, OrderOptions, OrderRequest};
//! use rust_decimal_macros::dec;
//!
//! let pairs = CryptoPairs::default();
//! let request = OrderRequest::sell("AAPL", dec!(10))
//!     .with_options(OrderOptions::default().with_trailing_stop_amount(dec!(5)));
//!
//! let plan = request.plan(&pairs.classify("AAPL")).unwrap();
//! assert!(plan.needs_quote());
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use super::enums::{OrderType, Side, TimeInForce, Trigger};
use super::market_data::Instrument;
use super::pairs::{CryptoPair, Market};
use super::primitives::Symbol;
use crate::{Error, Result};

/// Optional trading parameters shared by `buy`, `sell` and `place_order`.
///
/// At most one of `stop_price`, `trailing_stop_amount` and
/// `trailing_stop_percent` may be set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderOptions {
    /// Limit price; `None` places a market order
    pub price: Option<Decimal>,
    /// Fixed stop price
    pub stop_price: Option<Decimal>,
    /// Trailing stop distance in dollars
    pub trailing_stop_amount: Option<Decimal>,
    /// Trailing stop distance in whole percent
    pub trailing_stop_percent: Option<Decimal>,
    /// Time in force; defaults per market
    pub time_in_force: Option<TimeInForce>,
    /// Allow execution outside regular hours (equities only)
    pub extended_hours: Option<bool>,
}

impl OrderOptions {
    /// Options for a limit order at `price`.
    pub fn limit(price: Decimal) -> Self {
        Self::default().with_price(price)
    }

    /// Set the limit price.
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Set a fixed stop price.
    pub fn with_stop_price(mut self, stop_price: Decimal) -> Self {
        self.stop_price = Some(stop_price);
        self
    }

    /// Set a trailing stop by dollar amount.
    pub fn with_trailing_stop_amount(mut self, amount: Decimal) -> Self {
        self.trailing_stop_amount = Some(amount);
        self
    }

    /// Set a trailing stop by percent.
    pub fn with_trailing_stop_percent(mut self, percent: impl Into<Decimal>) -> Self {
        self.trailing_stop_percent = Some(percent.into());
        self
    }

    /// Set the time in force.
    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = Some(tif);
        self
    }

    /// Allow or forbid extended-hours execution.
    pub fn with_extended_hours(mut self, extended_hours: bool) -> Self {
        self.extended_hours = Some(extended_hours);
        self
    }

    fn is_trailing(&self) -> bool {
        self.trailing_stop_amount.is_some() || self.trailing_stop_percent.is_some()
    }

    fn has_stop(&self) -> bool {
        self.stop_price.is_some() || self.is_trailing()
    }
}

/// Everything needed to place one order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    /// Symbol to trade
    pub symbol: Symbol,
    /// Shares or coins
    pub quantity: Decimal,
    /// Buy or sell
    pub side: Side,
    /// Price and stop parameters
    pub options: OrderOptions,
}

/// The stop condition of an order, once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopTrigger {
    /// Fixed stop price
    Price(Decimal),
    /// Trail the market by a dollar amount
    TrailingAmount(Decimal),
    /// Trail the market by a whole percent
    TrailingPercent(u32),
}

impl StopTrigger {
    /// Returns `true` for trailing stops.
    pub fn is_trailing(&self) -> bool {
        !matches!(self, StopTrigger::Price(_))
    }
}

impl OrderRequest {
    /// A request with default options.
    pub fn new(symbol: impl Into<Symbol>, quantity: Decimal, side: Side) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            side,
            options: OrderOptions::default(),
        }
    }

    /// A market buy.
    pub fn buy(symbol: impl Into<Symbol>, quantity: Decimal) -> Self {
        Self::new(symbol, quantity, Side::Buy)
    }

    /// A market sell.
    pub fn sell(symbol: impl Into<Symbol>, quantity: Decimal) -> Self {
        Self::new(symbol, quantity, Side::Sell)
    }

    /// Replace the options.
    pub fn with_options(mut self, options: OrderOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate the request for `market` and classify it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the quantity or a price is not
    /// positive, if more than one stop parameter is set, if a trailing
    /// percent is not a whole number, if the time-in-force is not accepted
    /// for the market, or if a crypto order carries stop or
    /// extended-hours parameters.
    pub fn plan(&self, market: &Market) -> Result<OrderPlan> {
        let opts = &self.options;

        if self.quantity <= Decimal::ZERO {
            return Err(Error::InvalidInput(format!(
                "quantity must be positive, got {}",
                self.quantity
            )));
        }
        for (name, value) in [
            ("price", opts.price),
            ("stop_price", opts.stop_price),
            ("trailing_stop_amount", opts.trailing_stop_amount),
            ("trailing_stop_percent", opts.trailing_stop_percent),
        ] {
            if matches!(value, Some(v) if v <= Decimal::ZERO) {
                return Err(Error::InvalidInput(format!("{} must be positive", name)));
            }
        }

        let stop_args = [
            opts.stop_price.is_some(),
            opts.trailing_stop_amount.is_some(),
            opts.trailing_stop_percent.is_some(),
        ];
        if stop_args.iter().filter(|set| **set).count() > 1 {
            return Err(Error::InvalidInput(
                "stop_price, trailing_stop_amount and trailing_stop_percent are mutually exclusive"
                    .to_string(),
            ));
        }

        let time_in_force = match market {
            Market::Crypto(_) => {
                if opts.extended_hours.is_some() {
                    return Err(Error::InvalidInput(
                        "extended_hours is not supported for crypto orders".to_string(),
                    ));
                }
                if opts.has_stop() {
                    return Err(Error::InvalidInput(
                        "stop_price, trailing_stop_amount and trailing_stop_percent are not supported for crypto orders"
                            .to_string(),
                    ));
                }
                match opts.time_in_force.unwrap_or(TimeInForce::Gtc) {
                    TimeInForce::Gtc => TimeInForce::Gtc,
                    other => {
                        return Err(Error::InvalidInput(format!(
                            "crypto orders only accept time_in_force 'gtc', got '{}'",
                            other.as_str()
                        )))
                    }
                }
            }
            Market::Equity(_) => match opts.time_in_force.unwrap_or(TimeInForce::Gfd) {
                tif @ (TimeInForce::Gfd | TimeInForce::Gtc) => tif,
                other => {
                    return Err(Error::InvalidInput(format!(
                        "time_in_force must be 'gfd' or 'gtc', got '{}'",
                        other.as_str()
                    )))
                }
            },
        };

        let stop = if let Some(price) = opts.stop_price {
            Some(StopTrigger::Price(price))
        } else if let Some(amount) = opts.trailing_stop_amount {
            Some(StopTrigger::TrailingAmount(amount))
        } else if let Some(percent) = opts.trailing_stop_percent {
            let whole = percent
                .fract()
                .is_zero()
                .then(|| percent.to_u32())
                .flatten()
                .ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "trailing_stop_percent must be a whole number, got {}",
                        percent
                    ))
                })?;
            Some(StopTrigger::TrailingPercent(whole))
        } else {
            None
        };

        Ok(OrderPlan {
            market: market.clone(),
            quantity: self.quantity,
            side: self.side,
            price: opts.price,
            order_type: if opts.price.is_some() {
                OrderType::Limit
            } else {
                OrderType::Market
            },
            trigger: if stop.is_some() {
                Trigger::Stop
            } else {
                Trigger::Immediate
            },
            time_in_force,
            stop,
            extended_hours: opts.extended_hours.unwrap_or(false),
        })
    }
}

/// A validated order, ready to be turned into a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPlan {
    market: Market,
    quantity: Decimal,
    side: Side,
    price: Option<Decimal>,
    order_type: OrderType,
    trigger: Trigger,
    time_in_force: TimeInForce,
    stop: Option<StopTrigger>,
    extended_hours: bool,
}

impl OrderPlan {
    /// Where the order will be sent.
    pub fn market(&self) -> &Market {
        &self.market
    }

    /// Buy or sell.
    pub fn side(&self) -> Side {
        self.side
    }

    /// `limit` when a price was given, otherwise `market`.
    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// `stop` when any stop parameter was given, otherwise `immediate`.
    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    /// Effective time in force.
    pub fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    /// The validated stop condition.
    pub fn stop(&self) -> Option<StopTrigger> {
        self.stop
    }

    fn is_trailing(&self) -> bool {
        self.stop.is_some_and(|s| s.is_trailing())
    }

    /// Whether the current ask price is needed to build the payload.
    ///
    /// Orders without a price use the ask as their price, except sell-side
    /// trailing stops which are sent without one. Trailing stops also need
    /// the ask to compute their stop price.
    pub fn needs_quote(&self) -> bool {
        match self.market {
            Market::Crypto(_) => self.price.is_none(),
            Market::Equity(_) => self.price.is_none() || self.is_trailing(),
        }
    }

    /// Build the equity order body.
    ///
    /// `ask` must be provided when [`needs_quote`](Self::needs_quote) is true.
    pub fn equity_payload(
        &self,
        account_url: &str,
        instrument: &Instrument,
        ask: Option<Decimal>,
    ) -> Result<EquityOrderPayload> {
        if self.market.is_crypto() {
            return Err(Error::InvalidInput(format!(
                "{} is a crypto pair, not an equity",
                instrument.symbol
            )));
        }
        let ask = self.require_ask(ask)?;

        let price = match self.price {
            Some(price) => Some(price),
            None if self.is_trailing() && self.side.is_sell() => None,
            None => ask.map(round_price),
        };

        let (stop_price, trailing_peg) = match (self.stop, ask) {
            (Some(StopTrigger::Price(p)), _) => (Some(p), None),
            (Some(trailing), Some(ask)) => (
                Some(round_price(trailing_stop_price(ask, self.side, trailing)?)),
                TrailingPeg::from_trigger(trailing),
            ),
            (Some(_), None) | (None, _) => (None, None),
        };

        let instrument_url = urlencoding::decode(&instrument.url)
            .map_err(|e| Error::InvalidInput(format!("instrument url is not UTF-8: {}", e)))?
            .into_owned();

        Ok(EquityOrderPayload {
            account: account_url.to_string(),
            instrument: instrument_url,
            symbol: instrument.symbol.clone(),
            quantity: self.quantity,
            side: self.side,
            order_type: self.order_type,
            trigger: self.trigger,
            time_in_force: self.time_in_force,
            price,
            stop_price,
            extended_hours: self.extended_hours,
            trailing_peg,
        })
    }

    /// Build the crypto order body.
    ///
    /// `ask` must be provided when [`needs_quote`](Self::needs_quote) is true.
    /// `ref_id` distinguishes retried submissions of the same order.
    pub fn crypto_payload(
        &self,
        account_id: &str,
        ask: Option<Decimal>,
        ref_id: uuid::Uuid,
    ) -> Result<CryptoOrderPayload> {
        let pair: &CryptoPair = match &self.market {
            Market::Crypto(pair) => pair,
            Market::Equity(symbol) => {
                return Err(Error::InvalidInput(format!(
                    "{} is an equity, not a crypto pair",
                    symbol
                )))
            }
        };
        let ask = self.require_ask(ask)?;
        let price = self.price.or(ask).ok_or_else(|| {
            Error::InvalidInput("a price or the current ask is required".to_string())
        })?;

        Ok(CryptoOrderPayload {
            order_type: self.order_type,
            side: self.side,
            quantity: self.quantity,
            account_id: account_id.to_string(),
            currency_pair_id: pair.id.clone(),
            price: format_price(price),
            ref_id: ref_id.simple().to_string(),
            time_in_force: self.time_in_force,
            trigger: self.trigger,
        })
    }

    fn require_ask(&self, ask: Option<Decimal>) -> Result<Option<Decimal>> {
        if self.needs_quote() && ask.is_none() {
            return Err(Error::InvalidInput(
                "the current ask price is required for this order".to_string(),
            ));
        }
        Ok(ask)
    }
}

/// Stop price for a trigger given the current ask, before rounding.
///
/// - fixed price: the price itself
/// - trailing amount: `ask - amount` for sells, `ask + amount` for buys
/// - trailing percent: `ask * (1 + percent/100)` for buys and
///   `ask * percent/100` for sells
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the result does not fit in a `Decimal`.
pub fn trailing_stop_price(ask: Decimal, side: Side, trigger: StopTrigger) -> Result<Decimal> {
    let stop = match trigger {
        StopTrigger::Price(price) => Some(price),
        StopTrigger::TrailingAmount(amount) => match side {
            Side::Sell => ask.checked_sub(amount),
            Side::Buy => ask.checked_add(amount),
        },
        StopTrigger::TrailingPercent(percent) => {
            let mut ratio = Decimal::from(percent) / Decimal::ONE_HUNDRED;
            if side.is_buy() {
                ratio += Decimal::ONE;
            }
            ask.checked_mul(ratio)
        }
    };

    stop.ok_or_else(|| {
        Error::InvalidInput(format!(
            "stop price for {:?} at ask {} is out of range",
            trigger, ask
        ))
    })
}

/// Round to cents, keeping two decimal places (`100` becomes `100.00`).
pub fn round_price(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    rounded
}

/// Format a price with exactly two decimal places.
pub fn format_price(value: Decimal) -> String {
    round_price(value).to_string()
}

/// Trailing-stop descriptor attached to equity orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TrailingPeg {
    /// Trail by a dollar amount
    Price {
        /// Trailing distance
        price: PegAmount,
    },
    /// Trail by a whole percent
    Percentage {
        /// Trailing distance in percent
        percentage: u32,
    },
}

impl TrailingPeg {
    fn from_trigger(trigger: StopTrigger) -> Option<Self> {
        match trigger {
            StopTrigger::Price(_) => None,
            StopTrigger::TrailingAmount(amount) => Some(TrailingPeg::Price {
                price: PegAmount {
                    amount,
                    currency_code: "USD".to_string(),
                },
            }),
            StopTrigger::TrailingPercent(percentage) => {
                Some(TrailingPeg::Percentage { percentage })
            }
        }
    }
}

/// A money amount inside a [`TrailingPeg`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PegAmount {
    /// Amount
    pub amount: Decimal,
    /// ISO currency code
    pub currency_code: String,
}

/// Body of an equity order submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityOrderPayload {
    /// Resource URL of the account
    pub account: String,
    /// Resource URL of the instrument
    pub instrument: String,
    /// Trading symbol
    pub symbol: String,
    /// Shares
    pub quantity: Decimal,
    /// Buy or sell
    pub side: Side,
    /// Market or limit
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Immediate or stop
    pub trigger: Trigger,
    /// Time in force
    pub time_in_force: TimeInForce,
    /// Limit or collar price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Stop price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    /// Extended-hours execution
    pub extended_hours: bool,
    /// Trailing-stop descriptor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_peg: Option<TrailingPeg>,
}

/// Body of a crypto order submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CryptoOrderPayload {
    /// Market or limit
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Buy or sell
    pub side: Side,
    /// Coins
    pub quantity: Decimal,
    /// Crypto account identifier
    pub account_id: String,
    /// Provider pair identifier
    pub currency_pair_id: String,
    /// Price with exactly two decimals
    pub price: String,
    /// Client reference id
    pub ref_id: String,
    /// Always `gtc`
    pub time_in_force: TimeInForce,
    /// Always `immediate`
    pub trigger: Trigger,
}
