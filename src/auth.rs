//! OAuth2 token-refresh middleware
//!
//! Exchanges the configured refresh token for short-lived access tokens and
//! caches the result, so an outbound API request only pays for a token
//! endpoint round trip when no cached token is usable.

use crate::{
    config::ZohoConfig,
    errors::{Result, ZohoError},
    utils::mask_sensitive_data,
};
use chrono::{DateTime, Duration, Utc};
use reqwest::{header, Client, RequestBuilder};
use serde::Deserialize;
use std::sync::{Mutex, PoisonError};

// Refresh this many seconds before the token's own expiry. Zoho issues
// 3600-second tokens, so a cached token is reused for at most five minutes.
const REFRESH_MARGIN_SECS: i64 = 3300;

/// Access token returned by the Zoho accounts token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    /// The bearer credential attached to API requests
    pub access_token: String,
    /// Scopes granted to the token
    #[serde(default)]
    pub scope: String,
    /// API domain the token is valid for
    #[serde(default)]
    pub api_domain: String,
    /// Token type, "Bearer" in practice
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

// The token endpoint reports failures such as a revoked refresh token as an
// "error" field, sometimes with HTTP 200.
#[derive(Deserialize)]
struct TokenEndpointResponse {
    access_token: Option<String>,
    #[serde(default)]
    scope: String,
    #[serde(default)]
    api_domain: String,
    #[serde(default)]
    token_type: String,
    expires_in: Option<i64>,
    error: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: AccessToken,
    fetched_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        if self.token.access_token.is_empty() {
            return false;
        }

        let usable_secs = self.token.expires_in - REFRESH_MARGIN_SECS;
        if usable_secs <= 0 {
            return false;
        }

        now.signed_duration_since(self.fetched_at) <= Duration::seconds(usable_secs)
    }
}

/// Caching token provider invoked before each outbound API request.
///
/// The lock guards only the cached slot and is never held across an await;
/// concurrent callers that both find the cache stale will both hit the token
/// endpoint, and the last response wins.
pub struct TokenCache {
    client_id: String,
    client_secret: String,
    refresh_token: String,
    token_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// Create a token cache from the SDK configuration
    pub fn new(config: &ZohoConfig) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            refresh_token: config.refresh_token.clone(),
            token_url: config.token_url(),
            cached: Mutex::new(None),
        }
    }

    /// Attach an `Authorization` header with a valid bearer token
    pub async fn authorize(&self, http: &Client, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.bearer_token(http).await?;

        Ok(request.header(
            header::AUTHORIZATION,
            format!("Zoho-oauthtoken {}", token),
        ))
    }

    /// Return a valid bearer token, refreshing through the token endpoint
    /// when the cached one is missing, empty, or too close to expiry
    pub async fn bearer_token(&self, http: &Client) -> Result<String> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        self.refresh(http).await
    }

    fn cached_token(&self) -> Option<String> {
        let guard = self.cached.lock().unwrap_or_else(PoisonError::into_inner);

        guard
            .as_ref()
            .filter(|cached| cached.is_valid(Utc::now()))
            .map(|cached| cached.token.access_token.clone())
    }

    fn store(&self, token: AccessToken) {
        let mut guard = self.cached.lock().unwrap_or_else(PoisonError::into_inner);

        *guard = Some(CachedToken {
            token,
            fetched_at: Utc::now(),
        });
    }

    async fn refresh(&self, http: &Client) -> Result<String> {
        let response = http
            .post(&self.token_url)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ZohoError::from_response(status, &body));
        }

        let token_response: TokenEndpointResponse = response.json().await?;

        if let Some(error) = token_response.error {
            return Err(ZohoError::token_error(format!(
                "token endpoint returned \"{}\"",
                error
            )));
        }

        let access_token = token_response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ZohoError::token_error("token endpoint returned no access token"))?;

        let token = AccessToken {
            access_token: access_token.clone(),
            scope: token_response.scope,
            api_domain: token_response.api_domain,
            token_type: token_response.token_type,
            expires_in: token_response.expires_in.unwrap_or(0),
        };

        log::debug!(
            "refreshed access token {} (expires_in={}s)",
            mask_sensitive_data(&token.access_token, 4),
            token.expires_in
        );

        self.store(token);

        Ok(access_token)
    }
}
