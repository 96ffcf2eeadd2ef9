//! Market data models: quotes, historical bars and fundamentals.
//!
//! Quotes are read-only views built once from a response and exposed
//! through accessors. Equities and crypto pairs come back in different
//! shapes; both implement [`PriceQuote`] so callers can treat them alike.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The read-only surface shared by equity and crypto quotes.
pub trait PriceQuote {
    /// Trading symbol as the provider reports it (`AAPL`, `BTCUSD`).
    fn symbol(&self) -> &str;
    /// Best bid price.
    fn bid(&self) -> Decimal;
    /// Best ask price.
    fn ask(&self) -> Decimal;
    /// Last price: the last trade for equities, the mark for crypto pairs.
    fn last(&self) -> Option<Decimal>;

    /// Bid-ask spread.
    fn spread(&self) -> Decimal {
        self.ask() - self.bid()
    }
}

/// Quote for an equity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    symbol: String,
    bid_price: Decimal,
    ask_price: Decimal,
    #[serde(default)]
    last_trade_price: Option<Decimal>,
    #[serde(default)]
    last_extended_hours_trade_price: Option<Decimal>,
    #[serde(default)]
    previous_close: Option<Decimal>,
    #[serde(default)]
    bid_size: Option<i64>,
    #[serde(default)]
    ask_size: Option<i64>,
    #[serde(default)]
    trading_halted: bool,
    #[serde(default)]
    instrument: Option<String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl Quote {
    /// Last trade in the extended-hours session, if any.
    pub fn last_extended_hours(&self) -> Option<Decimal> {
        self.last_extended_hours_trade_price
    }

    /// Previous session's close.
    pub fn previous_close(&self) -> Option<Decimal> {
        self.previous_close
    }

    /// Size at the best bid.
    pub fn bid_size(&self) -> Option<i64> {
        self.bid_size
    }

    /// Size at the best ask.
    pub fn ask_size(&self) -> Option<i64> {
        self.ask_size
    }

    /// Whether trading is halted.
    pub fn is_halted(&self) -> bool {
        self.trading_halted
    }

    /// Resource URL of the quoted instrument.
    pub fn instrument_url(&self) -> Option<&str> {
        self.instrument.as_deref()
    }

    /// When the quote was last updated.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl PriceQuote for Quote {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn bid(&self) -> Decimal {
        self.bid_price
    }

    fn ask(&self) -> Decimal {
        self.ask_price
    }

    fn last(&self) -> Option<Decimal> {
        self.last_trade_price
    }
}

/// Quote for a crypto pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoQuote {
    symbol: String,
    #[serde(default)]
    id: Option<String>,
    bid_price: Decimal,
    ask_price: Decimal,
    #[serde(default)]
    mark_price: Option<Decimal>,
    #[serde(default)]
    high_price: Option<Decimal>,
    #[serde(default)]
    low_price: Option<Decimal>,
    #[serde(default)]
    open_price: Option<Decimal>,
    #[serde(default)]
    volume: Option<Decimal>,
}

impl CryptoQuote {
    /// Provider identifier of the quoted pair.
    pub fn pair_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Mark (mid) price.
    pub fn mark(&self) -> Option<Decimal> {
        self.mark_price
    }

    /// 24h high.
    pub fn high(&self) -> Option<Decimal> {
        self.high_price
    }

    /// 24h low.
    pub fn low(&self) -> Option<Decimal> {
        self.low_price
    }

    /// 24h open.
    pub fn open(&self) -> Option<Decimal> {
        self.open_price
    }

    /// 24h volume.
    pub fn volume(&self) -> Option<Decimal> {
        self.volume
    }
}

impl PriceQuote for CryptoQuote {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn bid(&self) -> Decimal {
        self.bid_price
    }

    fn ask(&self) -> Decimal {
        self.ask_price
    }

    fn last(&self) -> Option<Decimal> {
        self.mark_price
    }
}

/// A quote for whichever market the symbol resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketQuote {
    /// Equity quote
    Equity(Quote),
    /// Crypto pair quote
    Crypto(CryptoQuote),
}

impl MarketQuote {
    /// Returns `true` if the symbol resolved to a crypto pair.
    pub fn is_crypto(&self) -> bool {
        matches!(self, MarketQuote::Crypto(_))
    }

    /// The equity quote, if this is one.
    pub fn as_equity(&self) -> Option<&Quote> {
        match self {
            MarketQuote::Equity(q) => Some(q),
            MarketQuote::Crypto(_) => None,
        }
    }

    /// The crypto quote, if this is one.
    pub fn as_crypto(&self) -> Option<&CryptoQuote> {
        match self {
            MarketQuote::Crypto(q) => Some(q),
            MarketQuote::Equity(_) => None,
        }
    }

    fn inner(&self) -> &dyn PriceQuote {
        match self {
            MarketQuote::Equity(q) => q,
            MarketQuote::Crypto(q) => q,
        }
    }
}

impl PriceQuote for MarketQuote {
    fn symbol(&self) -> &str {
        self.inner().symbol()
    }

    fn bid(&self) -> Decimal {
        self.inner().bid()
    }

    fn ask(&self) -> Decimal {
        self.inner().ask()
    }

    fn last(&self) -> Option<Decimal> {
        self.inner().last()
    }
}

/// Historical bars for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Historicals {
    /// Trading symbol
    pub symbol: String,
    /// Bar width, as echoed by the provider
    #[serde(default)]
    pub interval: Option<String>,
    /// Time range, as echoed by the provider
    #[serde(default)]
    pub span: Option<String>,
    /// Session bounds, as echoed by the provider
    #[serde(default)]
    pub bounds: Option<String>,
    /// Close of the previous session
    #[serde(default)]
    pub previous_close_price: Option<Decimal>,
    /// The bars, oldest first
    #[serde(default)]
    pub historicals: Vec<HistoricalBar>,
}

/// One OHLCV bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalBar {
    /// Start of the bar
    pub begins_at: DateTime<Utc>,
    /// Open
    pub open_price: Decimal,
    /// Close
    pub close_price: Decimal,
    /// High
    pub high_price: Decimal,
    /// Low
    pub low_price: Decimal,
    /// Volume
    #[serde(default)]
    pub volume: i64,
    /// Trading session (`reg`, `pre`, `post`)
    #[serde(default)]
    pub session: Option<String>,
    /// Whether the bar was filled in by the provider
    #[serde(default)]
    pub interpolated: bool,
}

/// Company fundamentals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fundamentals {
    /// Session open
    #[serde(default)]
    pub open: Option<Decimal>,
    /// Session high
    #[serde(default)]
    pub high: Option<Decimal>,
    /// Session low
    #[serde(default)]
    pub low: Option<Decimal>,
    /// Session volume
    #[serde(default)]
    pub volume: Option<Decimal>,
    /// Average daily volume
    #[serde(default)]
    pub average_volume: Option<Decimal>,
    /// 52-week high
    #[serde(default)]
    pub high_52_weeks: Option<Decimal>,
    /// 52-week low
    #[serde(default)]
    pub low_52_weeks: Option<Decimal>,
    /// Market capitalization
    #[serde(default)]
    pub market_cap: Option<Decimal>,
    /// Dividend yield
    #[serde(default)]
    pub dividend_yield: Option<Decimal>,
    /// Price/earnings ratio
    #[serde(default)]
    pub pe_ratio: Option<Decimal>,
    /// Shares outstanding
    #[serde(default)]
    pub shares_outstanding: Option<Decimal>,
    /// Company description
    #[serde(default)]
    pub description: Option<String>,
    /// Chief executive
    #[serde(default)]
    pub ceo: Option<String>,
    /// Sector
    #[serde(default)]
    pub sector: Option<String>,
    /// Industry
    #[serde(default)]
    pub industry: Option<String>,
    /// Number of employees
    #[serde(default)]
    pub num_employees: Option<i64>,
    /// Year the company was founded
    #[serde(default)]
    pub year_founded: Option<i32>,
    /// Resource URL of the instrument
    #[serde(default)]
    pub instrument: Option<String>,
}

/// A tradable instrument as returned by the instruments lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    /// Provider-assigned identifier
    pub id: String,
    /// Resource URL, used to reference the instrument in orders
    pub url: String,
    /// Trading symbol
    pub symbol: String,
    /// Full name
    #[serde(default)]
    pub name: Option<String>,
    /// Short name
    #[serde(default)]
    pub simple_name: Option<String>,
    /// Whether the instrument can be traded
    #[serde(default)]
    pub tradeable: bool,
    /// Instrument kind (`stock`, `etp`, `adr`, ...)
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Listing country
    #[serde(default)]
    pub country: Option<String>,
    /// Date the instrument was listed
    #[serde(default)]
    pub list_date: Option<NaiveDate>,
}
