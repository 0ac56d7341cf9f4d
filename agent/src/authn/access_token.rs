//! Access token wrapper

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Access token claims we care about
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (account ID)
    #[serde(default)]
    pub sub: Option<String>,

    /// Expiration timestamp
    #[serde(default)]
    pub exp: Option<i64>,

    /// Granted scopes
    #[serde(default)]
    pub scp: Vec<String>,
}

/// A short-lived bearer token
#[derive(Debug, Clone)]
pub struct AccessToken {
    raw: SecretString,

    /// Decoded claims, when the token is a readable JWT
    claims: Option<AccessTokenClaims>,
}

impl AccessToken {
    /// Wrap a raw token string
    /// Note: This does NOT validate the signature, claims are informational only
    pub fn from_raw(raw: SecretString) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let claims = decode::<AccessTokenClaims>(
            raw.expose_secret(),
            &DecodingKey::from_secret(b""),
            &validation,
        )
        .ok()
        .map(|data| data.claims);

        Self { raw, claims }
    }

    pub fn secret(&self) -> &SecretString {
        &self.raw
    }

    pub fn claims(&self) -> Option<&AccessTokenClaims> {
        self.claims.as_ref()
    }

    /// Get expiration time, if the token carries one
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims
            .as_ref()
            .and_then(|c| c.exp)
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}
