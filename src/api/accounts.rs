//! Accounts service: brokerage and crypto accounts, portfolio, holdings.

use std::sync::Arc;

use crate::client::{ClientInner, Paginated};
use crate::models::{Account, CryptoAccount, Dividend, Portfolio, Position};
use crate::Result;

pub(crate) struct AccountsService {
    inner: Arc<ClientInner>,
}

impl AccountsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// The first (and normally only) brokerage account.
    pub(crate) async fn account(&self) -> Result<Account> {
        let page: Paginated<Account> = self
            .inner
            .get(self.inner.config.endpoints.accounts()?)
            .await?;
        page.into_first("account")
    }

    pub(crate) async fn crypto_account(&self) -> Result<CryptoAccount> {
        let page: Paginated<CryptoAccount> = self
            .inner
            .get(self.inner.config.endpoints.crypto_accounts()?)
            .await?;
        page.into_first("crypto account")
    }

    /// The provider supports one portfolio per user.
    pub(crate) async fn portfolio(&self) -> Result<Portfolio> {
        let page: Paginated<Portfolio> = self
            .inner
            .get(self.inner.config.endpoints.portfolios()?)
            .await?;
        page.into_first("portfolio")
    }

    pub(crate) async fn positions(&self) -> Result<Vec<Position>> {
        let page: Paginated<Position> = self
            .inner
            .get(self.inner.config.endpoints.positions()?)
            .await?;
        Ok(page.results)
    }

    pub(crate) async fn dividends(&self) -> Result<Vec<Dividend>> {
        let page: Paginated<Dividend> = self
            .inner
            .get(self.inner.config.endpoints.dividends()?)
            .await?;
        Ok(page.results)
    }
}
