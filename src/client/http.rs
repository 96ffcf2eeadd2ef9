//! HTTP plumbing shared by every service.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::config::ClientConfig;
use crate::auth::Session;
use crate::{Error, Result};

/// Headers layered over the session defaults for API writes (not login).
const API_WRITE_HEADERS: [(&str, &str); 5] = [
    ("content-type", "application/json"),
    ("accept", "*/*"),
    ("sec-fetch-site", "same-site"),
    ("sec-fetch-mode", "cors"),
    ("accept-language", "en-US,en;q=0.9"),
];

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) session: Session,
    pub(crate) config: ClientConfig,
}

impl ClientInner {
    pub(crate) fn new(session: Session, config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            http,
            session,
            config,
        })
    }

    /// Session defaults plus `Authorization`, then `overrides` on top.
    async fn build_headers(&self, overrides: &[(&'static str, &'static str)]) -> Result<HeaderMap> {
        let mut headers = self.session.request_headers().await?;
        for (name, value) in overrides {
            headers.insert(*name, HeaderValue::from_static(*value));
        }
        Ok(headers)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(method = "GET", %url, "request");
        let headers = self.build_headers(&[]).await?;
        let response = self.http.get(url).headers(headers).send().await?;
        handle_response(response).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        url: Url,
        query: &Q,
    ) -> Result<T> {
        tracing::debug!(method = "GET", %url, "request");
        let headers = self.build_headers(&[]).await?;
        let response = self
            .http
            .get(url)
            .headers(headers)
            .query(query)
            .send()
            .await?;
        handle_response(response).await
    }

    /// POST a JSON body with the API write headers.
    pub(crate) async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T> {
        tracing::debug!(method = "POST", %url, "request");
        let headers = self.build_headers(&API_WRITE_HEADERS).await?;
        let response = self
            .http
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await?;
        handle_response(response).await
    }

    /// POST a form body with the session's default headers.
    pub(crate) async fn post_form<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T> {
        tracing::debug!(method = "POST", %url, "request");
        let mut headers = self.build_headers(&[]).await?;
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded; charset=utf-8"),
        );
        let response = self
            .http
            .post(url)
            .headers(headers)
            .form(body)
            .send()
            .await?;
        handle_response(response).await
    }

    /// POST a form body, checking only the status.
    pub(crate) async fn post_form_empty<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<()> {
        tracing::debug!(method = "POST", %url, "request");
        let mut headers = self.build_headers(&[]).await?;
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded; charset=utf-8"),
        );
        let response = self
            .http
            .post(url)
            .headers(headers)
            .form(body)
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }

    /// POST without a body, checking only the status.
    pub(crate) async fn post_empty(&self, url: Url) -> Result<()> {
        tracing::debug!(method = "POST", %url, "request");
        let headers = self.build_headers(&API_WRITE_HEADERS).await?;
        let response = self.http.post(url).headers(headers).send().await?;
        check_status(response).await.map(|_| ())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: Value = response.json().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), "request failed");
    Err(Error::from_api_response(status.as_u16(), body))
}

/// Raise on a non-success status, then decode the body.
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// A list response. Only the first page is read; the `next` link is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct Paginated<T> {
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// The first result, or an error naming what was expected.
    pub(crate) fn into_first(self, what: &str) -> Result<T> {
        self.results
            .into_iter()
            .next()
            .ok_or_else(|| Error::UnexpectedResponse(format!("no {} in response", what)))
    }
}
