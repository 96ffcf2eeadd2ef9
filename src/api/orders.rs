//! Orders service: listing, lookup, placement and cancellation.

use std::sync::Arc;

use url::Url;

use super::accounts::AccountsService;
use super::market_data::MarketDataService;
use crate::client::{ClientInner, Paginated};
use crate::models::{
    Cancellable, CryptoOrder, Market, Order, OrderLookup, OrderRequest, OrderView, PlacedOrder,
    PriceQuote,
};
use crate::{Error, Result};

pub(crate) struct OrdersService {
    inner: Arc<ClientInner>,
}

impl OrdersService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    fn market_data(&self) -> MarketDataService {
        MarketDataService::new(self.inner.clone())
    }

    fn accounts(&self) -> AccountsService {
        AccountsService::new(self.inner.clone())
    }

    pub(crate) async fn list(&self) -> Result<Vec<Order>> {
        let page: Paginated<Order> = self
            .inner
            .get(self.inner.config.endpoints.orders()?)
            .await?;
        Ok(page.results)
    }

    pub(crate) async fn get<L: OrderLookup + ?Sized>(&self, order: &L) -> Result<Order> {
        let id = order.order_id()?;
        self.inner
            .get(self.inner.config.endpoints.order(id.as_str())?)
            .await
    }

    pub(crate) async fn list_crypto(&self) -> Result<Vec<CryptoOrder>> {
        let page: Paginated<CryptoOrder> = self
            .inner
            .get(self.inner.config.endpoints.crypto_orders()?)
            .await?;
        Ok(page.results)
    }

    pub(crate) async fn get_crypto<L: OrderLookup + ?Sized>(&self, order: &L) -> Result<CryptoOrder> {
        let id = order.order_id()?;
        self.inner
            .get(self.inner.config.endpoints.crypto_order(id.as_str())?)
            .await
    }

    /// Re-fetch a placed order from the venue it was placed on.
    pub(crate) async fn refresh(&self, order: &PlacedOrder) -> Result<PlacedOrder> {
        match order {
            PlacedOrder::Equity(o) => self.get(o).await.map(PlacedOrder::Equity),
            PlacedOrder::Crypto(o) => self.get_crypto(o).await.map(PlacedOrder::Crypto),
        }
    }

    /// Validate, resolve what the payload needs, then submit.
    ///
    /// Validation runs before any request. Equity orders look up the
    /// instrument, the ask when needed and the account; crypto orders look
    /// up the ask when needed and the portfolio's account id.
    pub(crate) async fn place(&self, request: &OrderRequest) -> Result<PlacedOrder> {
        let market = self.inner.config.crypto_pairs.classify(&request.symbol);
        let plan = request.plan(&market)?;

        let placed = match plan.market() {
            Market::Equity(symbol) => {
                let market_data = self.market_data();
                let instrument = market_data.instrument(symbol.as_str()).await?;
                let ask = if plan.needs_quote() {
                    Some(market_data.equity_quote(symbol).await?.ask())
                } else {
                    None
                };
                let account = self.accounts().account().await?;

                let payload = plan.equity_payload(&account.url, &instrument, ask)?;
                let order: Order = self
                    .inner
                    .post_json(self.inner.config.endpoints.orders()?, &payload)
                    .await?;
                PlacedOrder::Equity(order)
            }
            Market::Crypto(pair) => {
                let ask = if plan.needs_quote() {
                    Some(self.market_data().crypto_quote(pair).await?.ask())
                } else {
                    None
                };
                let account_id = self
                    .accounts()
                    .portfolio()
                    .await?
                    .account_id
                    .ok_or_else(|| {
                        Error::UnexpectedResponse("portfolio has no account_id".to_string())
                    })?;

                let payload = plan.crypto_payload(&account_id, ask, uuid::Uuid::new_v4())?;
                let order: CryptoOrder = self
                    .inner
                    .post_json(self.inner.config.endpoints.crypto_orders()?, &payload)
                    .await?;
                PlacedOrder::Crypto(order)
            }
        };

        tracing::info!(
            id = placed.id(),
            symbol = %request.symbol,
            side = ?request.side,
            crypto = placed.is_crypto(),
            "order placed"
        );
        Ok(placed)
    }

    /// POST to the order's cancellation link; the response body is ignored.
    pub(crate) async fn cancel<C: Cancellable + ?Sized>(&self, order: &C) -> Result<()> {
        let url = order.cancel_url().ok_or(Error::MissingCancelUrl)?;
        let url = Url::parse(url)?;
        self.inner.post_empty(url).await?;
        tracing::info!("order cancel requested");
        Ok(())
    }
}
