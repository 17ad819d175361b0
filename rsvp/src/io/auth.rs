//! Service-account access tokens for the spreadsheet API.
//!
//! Uses the OAuth2 JWT bearer grant: a self-signed RS256 assertion is
//! exchanged for a short-lived access token, which is cached until shortly
//! before it expires.

use std::fmt;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::io::store::StoreError;

/// Scope granting read/write access to spreadsheets.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
/// OAuth2 token endpoint.
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens are refreshed this long before their reported expiry.
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

fn assertion_claims(client_email: &str, token_url: &str, now: i64) -> AssertionClaims {
    AssertionClaims {
        iss: client_email.to_string(),
        scope: SHEETS_SCOPE.to_string(),
        aud: token_url.to_string(),
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CachedToken {
    value: String,
    expires_at: i64,
}

impl CachedToken {
    fn is_fresh(&self, now: i64) -> bool {
        now + REFRESH_MARGIN_SECS < self.expires_at
    }
}

/// Token source for a service account.
pub struct ServiceAccount {
    client_email: String,
    key: EncodingKey,
    token_url: String,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

impl ServiceAccount {
    /// Build a token source from a PEM-encoded RSA private key.
    pub fn new(
        client_email: impl Into<String>,
        private_key_pem: &str,
        http: reqwest::Client,
    ) -> Result<Self, StoreError> {
        let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|err| StoreError::Auth(format!("invalid private key: {err}")))?;
        Ok(Self {
            client_email: client_email.into(),
            key,
            token_url: TOKEN_URL.to_string(),
            http,
            cached: Mutex::new(None),
        })
    }

    /// Return a valid access token, exchanging a fresh assertion if needed.
    pub async fn access_token(&self) -> Result<String, StoreError> {
        let mut cached = self.cached.lock().await;
        let now = chrono::Utc::now().timestamp();
        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let claims = assertion_claims(&self.client_email, &self.token_url, now);
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|err| StoreError::Auth(format!("sign assertion: {err}")))?;

        debug!(client_email = %self.client_email, "requesting access token");
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Auth(format!("token endpoint returned {status}: {body}")));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| StoreError::Auth(format!("decode token response: {err}")))?;

        let fresh = CachedToken {
            value: token.access_token,
            expires_at: now + token.expires_in,
        };
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }
}
