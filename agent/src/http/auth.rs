//! OAuth token endpoint

use fleet_api_models::models::TokenResponse;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::errors::ToggleError;
use crate::http::client::HttpClient;

impl HttpClient {
    /// Exchange a refresh token for a fresh access token
    ///
    /// The client must be bound to the token endpoint URL itself.
    pub async fn refresh_access_token(
        &self,
        client_id: &str,
        client_secret: &SecretString,
        refresh_token: &SecretString,
    ) -> Result<TokenResponse, ToggleError> {
        debug!("Refreshing access token for client {}", client_id);

        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", client_id),
            ("client_secret", client_secret.expose_secret()),
            ("refresh_token", refresh_token.expose_secret()),
        ];

        self.post_form("", &form).await.map_err(|e| match e {
            // invalid_grant and friends: retrying with the same credential won't help
            ToggleError::ApiError(msg) => {
                ToggleError::AuthError(format!("Could not refresh token: {}", msg))
            }
            other => other,
        })
    }
}
