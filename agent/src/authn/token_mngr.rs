//! Token manager for Fleet API authentication

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::authn::access_token::AccessToken;
use crate::errors::ToggleError;
use crate::http::client::HttpClient;
use crate::secrets::config::{Secrets, REFRESH_TOKEN};
use crate::secrets::store::SecretStore;

/// Result of a refresh-token exchange
#[derive(Debug, Clone)]
pub struct AccessGrant {
    pub access_token: AccessToken,

    /// Replacement refresh token, when the issuer rotated it
    pub refresh_token: Option<SecretString>,
}

/// Token provider trait for testability
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Exchange the refresh credential for an access token
    async fn exchange(
        &self,
        client_id: &str,
        client_secret: &SecretString,
        refresh_token: &SecretString,
    ) -> Result<AccessGrant, ToggleError>;
}

/// OAuth2 refresh-token grant against the token endpoint
pub struct OAuthTokenProvider {
    http_client: HttpClient,
}

impl OAuthTokenProvider {
    /// Create a provider for the given token endpoint URL
    pub fn new(token_url: &str, timeout: Duration) -> Result<Self, ToggleError> {
        Ok(Self {
            http_client: HttpClient::new(token_url, timeout)?,
        })
    }
}

#[async_trait]
impl TokenProvider for OAuthTokenProvider {
    async fn exchange(
        &self,
        client_id: &str,
        client_secret: &SecretString,
        refresh_token: &SecretString,
    ) -> Result<AccessGrant, ToggleError> {
        let response = self
            .http_client
            .refresh_access_token(client_id, client_secret, refresh_token)
            .await?;

        Ok(AccessGrant {
            access_token: AccessToken::from_raw(SecretString::from(response.access_token)),
            refresh_token: response.refresh_token.map(SecretString::from),
        })
    }
}

/// Obtains access tokens and keeps the stored refresh token current
pub struct TokenManager {
    provider: Arc<dyn TokenProvider>,
    store: Arc<dyn SecretStore>,
}

impl TokenManager {
    pub fn new(provider: Arc<dyn TokenProvider>, store: Arc<dyn SecretStore>) -> Self {
        Self { provider, store }
    }

    /// Get a fresh access token for `secrets`
    ///
    /// A rotated refresh token is written back to the store. That write is
    /// best effort: a failure is logged and the access token still returned.
    pub async fn access_token(&self, secrets: &Secrets) -> Result<AccessToken, ToggleError> {
        let grant = self
            .provider
            .exchange(&secrets.client_id, &secrets.client_secret, &secrets.refresh_token)
            .await?;

        match grant.access_token.expires_at() {
            Some(exp) => info!("Access token obtained, expires at: {}", exp),
            None => info!("Access token obtained"),
        }

        if let Some(rotated) = &grant.refresh_token {
            if rotated.expose_secret() != secrets.refresh_token.expose_secret() {
                match self.store.put(REFRESH_TOKEN, rotated).await {
                    Ok(()) => info!("Persisted rotated refresh token"),
                    Err(e) => warn!("Failed to persist rotated refresh token: {}", e),
                }
            }
        }

        Ok(grant.access_token)
    }
}
