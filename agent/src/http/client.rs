//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use crate::errors::ToggleError;

/// HTTP client bound to one base URL
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ToggleError> {
        let base_url = url::Url::parse(base_url)
            .map_err(|e| ToggleError::ConfigError(format!("Invalid base URL {}: {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sentry-toggle/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &SecretString,
    ) -> Result<T, ToggleError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            )
            .send()
            .await?;

        Self::parse("GET", response).await
    }

    /// Make a POST request with a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        token: &SecretString,
        body: &B,
    ) -> Result<T, ToggleError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            )
            .json(body)
            .send()
            .await?;

        Self::parse("POST", response).await
    }

    /// Make an unauthenticated POST request with a form body
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T, ToggleError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {} (form)", url);

        let response = self.client.post(&url).form(form).send().await?;

        Self::parse("POST", response).await
    }

    async fn parse<T: DeserializeOwned>(method: &str, response: Response) -> Result<T, ToggleError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("HTTP {} failed: {} - {}", method, status, body);
            return Err(classify_status(status, &body));
        }

        let body = response.json().await?;
        Ok(body)
    }
}

/// Map a failed HTTP status onto the error taxonomy
///
/// 408 (vehicle unavailable), 429 (rate limited) and 5xx may succeed later;
/// 401/403 mean the credentials are wrong; anything else is a bad request.
pub fn classify_status(status: StatusCode, body: &str) -> ToggleError {
    let message = format!("{}: {}", status, body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => ToggleError::Transient(message),
        s if s.is_server_error() => ToggleError::Transient(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ToggleError::AuthError(message),
        _ => ToggleError::ApiError(message),
    }
}
