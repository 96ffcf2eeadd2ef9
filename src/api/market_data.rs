//! Market data service: quotes, historicals, fundamentals, instruments.

use std::sync::Arc;

use crate::client::{ClientInner, Paginated};
use crate::models::{
    Bounds, CryptoPair, CryptoQuote, Fundamentals, Historicals, Instrument, Interval, Market,
    MarketQuote, Quote, Span, Symbol,
};
use crate::{Error, Result};

pub(crate) struct MarketDataService {
    inner: Arc<ClientInner>,
}

impl MarketDataService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn classify(&self, symbol: impl AsRef<str>) -> Market {
        self.inner.config.crypto_pairs.classify(symbol)
    }

    pub(crate) async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        let symbol = Symbol::new(symbol);
        self.inner
            .get(self.inner.config.endpoints.fundamentals(symbol.as_str())?)
            .await
    }

    /// Resolve a symbol to its instrument; an empty lookup is an invalid symbol.
    pub(crate) async fn instrument(&self, symbol: &str) -> Result<Instrument> {
        let symbol = Symbol::new(symbol);
        let page: Paginated<Instrument> = self
            .inner
            .get_with_query(
                self.inner.config.endpoints.instruments()?,
                &[("symbol", symbol.as_str())],
            )
            .await?;

        page.results
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidSymbol(symbol.to_string()))
    }

    /// Quote from whichever venue the symbol trades on.
    pub(crate) async fn quote(&self, symbol: &str) -> Result<MarketQuote> {
        match self.classify(symbol) {
            Market::Crypto(pair) => self.crypto_quote(&pair).await.map(MarketQuote::Crypto),
            Market::Equity(symbol) => self.equity_quote(&symbol).await.map(MarketQuote::Equity),
        }
    }

    pub(crate) async fn crypto_quote(&self, pair: &CryptoPair) -> Result<CryptoQuote> {
        self.inner
            .get(self.inner.config.endpoints.crypto_quote(&pair.id)?)
            .await
    }

    /// Unknown symbols come back as `{"results": [null]}`.
    pub(crate) async fn equity_quote(&self, symbol: &Symbol) -> Result<Quote> {
        let page: Paginated<Option<Quote>> = self
            .inner
            .get_with_query(
                self.inner.config.endpoints.quotes()?,
                &[("symbols", symbol.as_str())],
            )
            .await?;

        page.results
            .into_iter()
            .next()
            .flatten()
            .ok_or_else(|| Error::InvalidSymbol(symbol.to_string()))
    }

    pub(crate) async fn historical_quotes(
        &self,
        symbols: &[&str],
        interval: Interval,
        span: Span,
        bounds: Bounds,
    ) -> Result<Vec<Historicals>> {
        if symbols.is_empty() {
            return Err(Error::InvalidInput("no symbols given".to_string()));
        }

        let mut joined = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            match self.classify(symbol) {
                Market::Crypto(pair) => {
                    return Err(Error::Unsupported(format!(
                        "historical quotes are not available for crypto pair {}",
                        pair.symbol
                    )))
                }
                Market::Equity(symbol) => joined.push(symbol.to_string()),
            }
        }

        if !interval.supports_span(span) {
            tracing::warn!(
                interval = interval.as_str(),
                span = span.as_str(),
                "interval/span combination may be rejected by the provider"
            );
        }

        let page: Paginated<Historicals> = self
            .inner
            .get_with_query(
                self.inner.config.endpoints.historicals()?,
                &[
                    ("symbols", joined.join(",").as_str()),
                    ("interval", interval.as_str()),
                    ("span", span.as_str()),
                    ("bounds", bounds.as_str()),
                ],
            )
            .await?;
        Ok(page.results)
    }
}
