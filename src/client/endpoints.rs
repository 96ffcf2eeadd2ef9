//! Resource URLs for the brokerage and crypto APIs.

use url::Url;

use crate::Result;

/// Default base of the brokerage API.
pub const DEFAULT_API_BASE: &str = "https://api.robinhood.com/";

/// Default base of the crypto trading API.
pub const DEFAULT_CRYPTO_BASE: &str = "https://nummus.robinhood.com/";

/// Maps logical resources to URLs.
///
/// Both bases can be replaced, which is how tests point the client at a
/// local mock server.
///
/// ```
/// use robinhood_rs::client::Endpoints;
///
/// let endpoints = Endpoints::new("http://127.0.0.1:8080", "http://127.0.0.1:8080/nummus").unwrap();
/// assert_eq!(
///     endpoints.orders().unwrap().as_str(),
///     "http://127.0.0.1:8080/orders/"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api: String,
    crypto: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api: DEFAULT_API_BASE.to_string(),
            crypto: DEFAULT_CRYPTO_BASE.to_string(),
        }
    }
}

impl Endpoints {
    /// Endpoints rooted at the given bases.
    ///
    /// A missing trailing slash is added so relative paths resolve below
    /// the base instead of replacing its last segment.
    pub fn new(api_base: &str, crypto_base: &str) -> Result<Self> {
        Ok(Self {
            api: parse_base(api_base)?,
            crypto: parse_base(crypto_base)?,
        })
    }

    /// Base of the brokerage API.
    pub fn api_base(&self) -> &str {
        &self.api
    }

    /// Base of the crypto API.
    pub fn crypto_base(&self) -> &str {
        &self.crypto
    }

    fn api(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&self.api)?.join(path)?)
    }

    fn crypto(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&self.crypto)?.join(path)?)
    }

    /// OAuth token exchange.
    pub fn login(&self) -> Result<Url> {
        self.api("oauth2/token/")
    }

    /// OAuth token revocation.
    pub fn logout(&self) -> Result<Url> {
        self.api("oauth2/revoke_token/")
    }

    /// Fundamentals of one symbol.
    pub fn fundamentals(&self, symbol: &str) -> Result<Url> {
        self.api(&format!("fundamentals/{}/", symbol))
    }

    /// Instrument search.
    pub fn instruments(&self) -> Result<Url> {
        self.api("instruments/")
    }

    /// Equity quotes.
    pub fn quotes(&self) -> Result<Url> {
        self.api("quotes/")
    }

    /// Historical equity bars.
    pub fn historicals(&self) -> Result<Url> {
        self.api("quotes/historicals/")
    }

    /// Crypto pair quote.
    pub fn crypto_quote(&self, pair_id: &str) -> Result<Url> {
        self.api(&format!("marketdata/forex/quotes/{}/", pair_id))
    }

    /// Brokerage accounts.
    pub fn accounts(&self) -> Result<Url> {
        self.api("accounts/")
    }

    /// Portfolios.
    pub fn portfolios(&self) -> Result<Url> {
        self.api("portfolios/")
    }

    /// Equity positions.
    pub fn positions(&self) -> Result<Url> {
        self.api("positions/")
    }

    /// Dividends.
    pub fn dividends(&self) -> Result<Url> {
        self.api("dividends/")
    }

    /// Equity orders.
    pub fn orders(&self) -> Result<Url> {
        self.api("orders/")
    }

    /// One equity order.
    pub fn order(&self, id: &str) -> Result<Url> {
        self.api(&format!("orders/{}/", id))
    }

    /// Crypto accounts.
    pub fn crypto_accounts(&self) -> Result<Url> {
        self.crypto("accounts/")
    }

    /// Crypto orders.
    pub fn crypto_orders(&self) -> Result<Url> {
        self.crypto("orders/")
    }

    /// One crypto order.
    pub fn crypto_order(&self, id: &str) -> Result<Url> {
        self.crypto(&format!("orders/{}/", id))
    }
}

fn parse_base(base: &str) -> Result<String> {
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    };
    Url::parse(&base)?;
    Ok(base)
}
