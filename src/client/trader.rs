//! The public facade.

use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::SecretString;

use super::config::ClientConfig;
use super::http::ClientInner;
use crate::api::{AccountsService, MarketDataService, OrdersService};
use crate::auth::{self, LoginOutcome, MfaChallenge, Session};
use crate::models::{
    Account, Bounds, Cancellable, CryptoAccount, CryptoOrder, DeviceToken, Dividend,
    Fundamentals, Historicals, Instrument, Interval, MarketQuote, Order, OrderLookup,
    OrderOptions, OrderRequest, PlacedOrder, Portfolio, Position, Side, Span, Symbol,
};
use crate::Result;

/// Client for the Robinhood API.
///
/// Every method awaits one request, except order placement which first
/// awaits the lookups its payload needs. Nothing is retried.
///
/// # Example
///
/// ```no_run
/// use robinhood_rs::{LoginOutcome, Trader};
/// use robinhood_rs::models::{OrderOptions, PriceQuote};
/// use rust_decimal_macros::dec;
///
/// # async fn example() -> robinhood_rs::Result<()> {
/// let trader = Trader::new()?;
/// if let LoginOutcome::Authenticated = trader.login("username", "password").await? {
///     let quote = trader.quote("AAPL").await?;
///     println!("ask: {}", quote.ask());
///
///     let ticket = trader
///         .buy("AAPL", dec!(1), OrderOptions::limit(dec!(100)))
///         .await?;
///     ticket.cancel().await?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct Trader {
    pub(crate) inner: Arc<ClientInner>,
}

impl Trader {
    /// Create an unauthenticated client with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create an unauthenticated client.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let session = Session::new(&config);
        Self::with_session(session, config)
    }

    /// Create a client around an existing session.
    pub fn with_session(session: Session, config: ClientConfig) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(ClientInner::new(session, config)?),
        })
    }

    /// Get a reference to the session.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    fn market_data(&self) -> MarketDataService {
        MarketDataService::new(self.inner.clone())
    }

    fn accounts(&self) -> AccountsService {
        AccountsService::new(self.inner.clone())
    }

    fn orders_service(&self) -> OrdersService {
        OrdersService::new(self.inner.clone())
    }

    // Authentication

    /// Log in with a username and password.
    ///
    /// A fresh device token is generated for the attempt. When the server
    /// asks for a verification code the returned challenge carries it, so
    /// [`complete_login`](Self::complete_login) continues the same flow.
    ///
    /// # Errors
    ///
    /// A non-success status is an error. Credentials the server answers
    /// without tokens come back as [`LoginOutcome::Rejected`].
    pub async fn login(
        &self,
        username: impl AsRef<str>,
        password: impl Into<String>,
    ) -> Result<LoginOutcome> {
        self.login_with_device(username, password, DeviceToken::generate())
            .await
    }

    /// Log in reusing a known device token.
    pub async fn login_with_device(
        &self,
        username: impl AsRef<str>,
        password: impl Into<String>,
        device_token: DeviceToken,
    ) -> Result<LoginOutcome> {
        auth::password_grant(
            &self.inner,
            username.as_ref(),
            SecretString::from(password.into()),
            device_token,
            None,
        )
        .await
    }

    /// Answer a login challenge with the verification code.
    ///
    /// A wrong code may yield another challenge for the same device token.
    pub async fn complete_login(
        &self,
        challenge: MfaChallenge,
        code: impl AsRef<str>,
    ) -> Result<LoginOutcome> {
        auth::answer_challenge(&self.inner, challenge, code.as_ref()).await
    }

    /// Returns `true` once a login has succeeded.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.session.is_authenticated().await
    }

    /// Revoke the refresh token and clear the local credentials.
    ///
    /// The credentials are cleared even if revocation fails; the failure is
    /// still returned.
    pub async fn logout(&self) -> Result<()> {
        auth::revoke(&self.inner).await
    }

    /// Save the session (tokens and headers) to `path`.
    pub async fn save_session(&self, path: impl AsRef<Path>) -> Result<()> {
        self.inner.session.save(path).await
    }

    /// Restore a client from a file written by [`save_session`](Self::save_session).
    pub async fn load_session(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_session_with_config(path, ClientConfig::default()).await
    }

    /// Restore a client with a custom configuration.
    pub async fn load_session_with_config(
        path: impl AsRef<Path>,
        config: ClientConfig,
    ) -> Result<Self> {
        let session = Session::load(path).await?;
        Self::with_session(session, config)
    }

    // Market data

    /// Company fundamentals.
    pub async fn fundamentals(&self, symbol: impl AsRef<str>) -> Result<Fundamentals> {
        self.market_data().fundamentals(symbol.as_ref()).await
    }

    /// Look up an instrument.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSymbol`](crate::Error::InvalidSymbol) when nothing
    /// matches.
    pub async fn instrument(&self, symbol: impl AsRef<str>) -> Result<Instrument> {
        self.market_data().instrument(symbol.as_ref()).await
    }

    /// Quote a symbol. Symbols with a known `<SYMBOL>USD` pair are quoted
    /// from the crypto market data, everything else as an equity.
    pub async fn quote(&self, symbol: impl AsRef<str>) -> Result<MarketQuote> {
        self.market_data().quote(symbol.as_ref()).await
    }

    /// Historical bars for one or more equities.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`](crate::Error::Unsupported) if any symbol is a
    /// crypto pair.
    pub async fn historical_quotes(
        &self,
        symbols: &[&str],
        interval: Interval,
        span: Span,
        bounds: Bounds,
    ) -> Result<Vec<Historicals>> {
        self.market_data()
            .historical_quotes(symbols, interval, span, bounds)
            .await
    }

    // Account data

    /// The brokerage account.
    pub async fn account(&self) -> Result<Account> {
        self.accounts().account().await
    }

    /// The crypto account.
    pub async fn crypto_account(&self) -> Result<CryptoAccount> {
        self.accounts().crypto_account().await
    }

    /// The portfolio.
    pub async fn portfolio(&self) -> Result<Portfolio> {
        self.accounts().portfolio().await
    }

    /// Equity positions.
    pub async fn positions(&self) -> Result<Vec<Position>> {
        self.accounts().positions().await
    }

    /// Dividends paid or pending.
    pub async fn dividends(&self) -> Result<Vec<Dividend>> {
        self.accounts().dividends().await
    }

    // Orders

    /// Equity orders, most recent first.
    pub async fn orders(&self) -> Result<Vec<Order>> {
        self.orders_service().list().await
    }

    /// One equity order by id, or by a previously fetched order.
    pub async fn order<L: OrderLookup + ?Sized>(&self, order: &L) -> Result<Order> {
        self.orders_service().get(order).await
    }

    /// Crypto orders.
    pub async fn crypto_orders(&self) -> Result<Vec<CryptoOrder>> {
        self.orders_service().list_crypto().await
    }

    /// One crypto order by id, or by a previously fetched order.
    pub async fn crypto_order<L: OrderLookup + ?Sized>(&self, order: &L) -> Result<CryptoOrder> {
        self.orders_service().get_crypto(order).await
    }

    /// Place a buy order.
    pub async fn buy(
        &self,
        symbol: impl Into<Symbol>,
        quantity: Decimal,
        options: OrderOptions,
    ) -> Result<OrderTicket> {
        self.place_order(OrderRequest::new(symbol, quantity, Side::Buy).with_options(options))
            .await
    }

    /// Place a sell order.
    pub async fn sell(
        &self,
        symbol: impl Into<Symbol>,
        quantity: Decimal,
        options: OrderOptions,
    ) -> Result<OrderTicket> {
        self.place_order(OrderRequest::new(symbol, quantity, Side::Sell).with_options(options))
            .await
    }

    /// Place an order on the venue the symbol trades on.
    ///
    /// # Errors
    ///
    /// Invalid parameters fail with
    /// [`Error::InvalidInput`](crate::Error::InvalidInput) before any
    /// request is sent.
    pub async fn place_order(&self, request: OrderRequest) -> Result<OrderTicket> {
        let order = self.orders_service().place(&request).await?;
        Ok(OrderTicket {
            order,
            trader: self.clone(),
        })
    }

    /// Cancel an order through its cancellation link.
    ///
    /// # Errors
    ///
    /// [`Error::MissingCancelUrl`](crate::Error::MissingCancelUrl), without
    /// sending a request, if the order carries no link.
    pub async fn cancel<C: Cancellable + ?Sized>(&self, order: &C) -> Result<()> {
        self.orders_service().cancel(order).await
    }
}

impl Clone for Trader {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for Trader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trader")
            .field("config", &self.inner.config)
            .field("session", &self.inner.session)
            .finish()
    }
}

/// A placed order bound to the client that placed it.
///
/// Dereferences to the [`PlacedOrder`] snapshot.
#[derive(Debug, Clone)]
pub struct OrderTicket {
    order: PlacedOrder,
    trader: Trader,
}

impl OrderTicket {
    /// The order as the venue returned it.
    pub fn order(&self) -> &PlacedOrder {
        &self.order
    }

    /// Take the order snapshot.
    pub fn into_order(self) -> PlacedOrder {
        self.order
    }

    /// Cancel this order.
    pub async fn cancel(&self) -> Result<()> {
        self.trader.cancel(&self.order).await
    }

    /// Fetch the current state of this order.
    pub async fn refresh(&self) -> Result<OrderTicket> {
        let order = self.trader.orders_service().refresh(&self.order).await?;
        Ok(OrderTicket {
            order,
            trader: self.trader.clone(),
        })
    }
}

impl Deref for OrderTicket {
    type Target = PlacedOrder;

    fn deref(&self) -> &PlacedOrder {
        &self.order
    }
}
