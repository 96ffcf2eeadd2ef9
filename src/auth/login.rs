//! Password login with an optional MFA step, and token revocation.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ClientInner;
use crate::models::DeviceToken;
use crate::{Error, Result};

/// Token lifetime requested at login, in seconds.
const TOKEN_EXPIRES_IN: u32 = 603_995;

/// Result of a login attempt.
#[derive(Debug)]
pub enum LoginOutcome {
    /// Tokens were issued and the session is authenticated
    Authenticated,
    /// The server wants a verification code; pass the challenge and the
    /// code to `Trader::complete_login`
    ChallengeRequired(MfaChallenge),
    /// The server answered without tokens or a challenge
    Rejected,
}

impl LoginOutcome {
    /// Returns `true` if the session is now authenticated.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, LoginOutcome::Authenticated)
    }

    /// The pending challenge, if any.
    pub fn challenge(&self) -> Option<&MfaChallenge> {
        match self {
            LoginOutcome::ChallengeRequired(challenge) => Some(challenge),
            _ => None,
        }
    }
}

/// A login waiting for its verification code.
///
/// Holds the credentials and the device token of the first request so the
/// follow-up continues the same flow.
pub struct MfaChallenge {
    username: String,
    password: SecretString,
    device_token: DeviceToken,
    mfa_type: Option<String>,
}

impl MfaChallenge {
    /// Username the challenge was issued for.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Device token shared by both login requests.
    pub fn device_token(&self) -> &DeviceToken {
        &self.device_token
    }

    /// How the code was delivered (`sms`, `app`), if the server said.
    pub fn mfa_type(&self) -> Option<&str> {
        self.mfa_type.as_deref()
    }
}

impl std::fmt::Debug for MfaChallenge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MfaChallenge")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("device_token", &self.device_token)
            .field("mfa_type", &self.mfa_type)
            .finish()
    }
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    username: &'a str,
    password: &'a str,
    grant_type: &'static str,
    device_token: &'a str,
    token_type: &'static str,
    expires_in: u32,
    scope: &'static str,
    client_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    challenge_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mfa_code: Option<&'a str>,
}

#[derive(Serialize)]
struct RevokeToken<'a> {
    client_id: &'a str,
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    mfa_required: Option<Value>,
    #[serde(default)]
    mfa_type: Option<String>,
}

/// Send the password grant; `mfa_code` is set on the follow-up request.
pub(crate) async fn password_grant(
    inner: &ClientInner,
    username: &str,
    password: SecretString,
    device_token: DeviceToken,
    mfa_code: Option<&str>,
) -> Result<LoginOutcome> {
    let form = PasswordGrant {
        username,
        password: password.expose_secret(),
        grant_type: "password",
        device_token: device_token.as_str(),
        token_type: "Bearer",
        expires_in: TOKEN_EXPIRES_IN,
        scope: "internal",
        client_id: &inner.config.client_id,
        challenge_type: if mfa_code.is_some() { None } else { Some("sms") },
        mfa_code,
    };

    let response: TokenResponse = inner
        .post_form(inner.config.endpoints.login()?, &form)
        .await?;

    if response.mfa_required.is_some_and(|v| !v.is_null()) {
        tracing::info!(username, "login requires a verification code");
        return Ok(LoginOutcome::ChallengeRequired(MfaChallenge {
            username: username.to_string(),
            password,
            device_token,
            mfa_type: response.mfa_type,
        }));
    }

    match (response.access_token, response.refresh_token) {
        (Some(access), Some(refresh)) => {
            inner.session.set_tokens(access, refresh).await;
            tracing::info!(username, "logged in");
            Ok(LoginOutcome::Authenticated)
        }
        _ => {
            tracing::warn!(username, "login rejected: no tokens in response");
            Ok(LoginOutcome::Rejected)
        }
    }
}

/// Continue a challenged login with the code the user received.
pub(crate) async fn answer_challenge(
    inner: &ClientInner,
    challenge: MfaChallenge,
    code: &str,
) -> Result<LoginOutcome> {
    if code.trim().is_empty() {
        return Err(Error::InvalidInput("verification code is empty".to_string()));
    }
    let MfaChallenge {
        username,
        password,
        device_token,
        ..
    } = challenge;
    password_grant(inner, &username, password, device_token, Some(code.trim())).await
}

/// Revoke the refresh token and forget both tokens.
///
/// Local tokens are cleared even when the revocation request fails.
pub(crate) async fn revoke(inner: &ClientInner) -> Result<()> {
    let refresh_token = inner
        .session
        .refresh_token()
        .await
        .ok_or(Error::NotAuthenticated)?;

    let form = RevokeToken {
        client_id: &inner.config.client_id,
        token: refresh_token.expose_secret(),
    };
    let result = match inner.config.endpoints.logout() {
        Ok(url) => inner.post_form_empty(url, &form).await,
        Err(e) => Err(e),
    };

    inner.session.clear_tokens().await;
    tracing::info!("logged out");
    result
}
