//! Session state: OAuth tokens and the default request headers.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::client::ClientConfig;
use crate::{Error, Result};

/// Authentication state shared by every request a `Trader` sends.
///
/// The session holds the access and refresh tokens and the headers sent
/// with every request. Requests never modify it: content-type and other
/// per-request headers are layered on top when a request is built.
///
/// # Thread Safety
///
/// `Session` is cheap to clone and can be shared across tasks. Token
/// updates take a write lock.
#[derive(Clone)]
pub struct Session {
    inner: Arc<RwLock<SessionInner>>,
}

struct SessionInner {
    access_token: Option<SecretString>,
    refresh_token: Option<SecretString>,
    headers: BTreeMap<String, String>,
}

impl Session {
    /// An unauthenticated session with the default headers for `config`.
    pub fn new(config: &ClientConfig) -> Self {
        let headers = [
            ("Accept", "*/*"),
            (
                "Accept-Language",
                "en;q=1, fr;q=0.9, de;q=0.8, ja;q=0.7, nl;q=0.6, it;q=0.5",
            ),
            (
                "Content-Type",
                "application/x-www-form-urlencoded; charset=utf-8",
            ),
            ("X-Robinhood-API-Version", config.api_version.as_str()),
            ("User-Agent", config.user_agent.as_str()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self::from_parts(None, None, headers)
    }

    fn from_parts(
        access_token: Option<SecretString>,
        refresh_token: Option<SecretString>,
        headers: BTreeMap<String, String>,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionInner {
                access_token,
                refresh_token,
                headers,
            })),
        }
    }

    /// Returns `true` once a login has stored an access token.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.access_token.is_some()
    }

    /// The `Authorization` header value, if logged in.
    pub async fn authorization(&self) -> Option<SecretString> {
        self.inner
            .read()
            .await
            .access_token
            .as_ref()
            .map(|t| SecretString::from(format!("Bearer {}", t.expose_secret())))
    }

    /// The current access token.
    pub async fn access_token(&self) -> Option<SecretString> {
        self.inner.read().await.access_token.clone()
    }

    /// The current refresh token.
    pub async fn refresh_token(&self) -> Option<SecretString> {
        self.inner.read().await.refresh_token.clone()
    }

    /// The default headers, without `Authorization`.
    pub async fn default_headers(&self) -> BTreeMap<String, String> {
        self.inner.read().await.headers.clone()
    }

    pub(crate) async fn set_tokens(&self, access_token: String, refresh_token: String) {
        let mut inner = self.inner.write().await;
        inner.access_token = Some(SecretString::from(access_token));
        inner.refresh_token = Some(SecretString::from(refresh_token));
    }

    pub(crate) async fn clear_tokens(&self) {
        let mut inner = self.inner.write().await;
        inner.access_token = None;
        inner.refresh_token = None;
    }

    /// Default headers plus `Authorization`, as sent with every request.
    pub(crate) async fn request_headers(&self) -> Result<HeaderMap> {
        let inner = self.inner.read().await;
        let mut headers = HeaderMap::with_capacity(inner.headers.len() + 1);

        for (name, value) in &inner.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::InvalidInput(format!("Invalid header name: {}", name)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| Error::InvalidInput(format!("Invalid value for header {}", name)))?;
            headers.insert(name, value);
        }

        if let Some(token) = &inner.access_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Write the tokens and headers to `path` as JSON.
    ///
    /// The file holds live credentials; keep it private.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let snapshot = {
            let inner = self.inner.read().await;
            SessionSnapshot {
                access_token: inner
                    .access_token
                    .as_ref()
                    .map(|t| t.expose_secret().to_string()),
                refresh_token: inner
                    .refresh_token
                    .as_ref()
                    .map(|t| t.expose_secret().to_string()),
                headers: inner.headers.clone(),
            }
        };

        let json = serde_json::to_vec_pretty(&snapshot)?;
        tokio::fs::write(path.as_ref(), json).await?;
        tracing::debug!(path = %path.as_ref().display(), "session saved");
        Ok(())
    }

    /// Restore a session written by [`save`](Self::save).
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        let snapshot: SessionSnapshot = serde_json::from_slice(&bytes)?;
        tracing::debug!(path = %path.as_ref().display(), "session loaded");

        Ok(Self::from_parts(
            snapshot.access_token.map(SecretString::from),
            snapshot.refresh_token.map(SecretString::from),
            snapshot.headers,
        ))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
struct SessionSnapshot {
    access_token: Option<String>,
    refresh_token: Option<String>,
    headers: BTreeMap<String, String>,
}
