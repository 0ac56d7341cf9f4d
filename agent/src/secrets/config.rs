//! Typed view over the secret store

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::ToggleError;
use crate::models::vehicle::{HomeLocation, DEFAULT_HOME_RADIUS_METERS};
use crate::secrets::store::SecretStore;

pub const CLIENT_ID: &str = "client_id";
pub const CLIENT_SECRET: &str = "client_secret";
pub const REFRESH_TOKEN: &str = "refresh_token";
pub const PRIVATE_KEY: &str = "private_key";
pub const VIN: &str = "vin";
pub const HOME_LATITUDE: &str = "home/latitude";
pub const HOME_LONGITUDE: &str = "home/longitude";
pub const HOME_RADIUS: &str = "home/effective_radius";

const REQUIRED: [&str; 7] = [
    CLIENT_ID,
    CLIENT_SECRET,
    REFRESH_TOKEN,
    PRIVATE_KEY,
    VIN,
    HOME_LATITUDE,
    HOME_LONGITUDE,
];

/// Everything one invocation needs from the secret store
#[derive(Debug, Clone)]
pub struct Secrets {
    pub client_id: String,
    pub client_secret: SecretString,
    pub refresh_token: SecretString,
    /// PEM encoded command signing key
    pub private_key: SecretString,
    pub vin: String,
    pub home: HomeLocation,
}

impl Secrets {
    /// Fetch and validate all values, failing on the first problem found
    pub async fn load(store: &dyn SecretStore) -> Result<Self, ToggleError> {
        let mut names = REQUIRED.to_vec();
        names.push(HOME_RADIUS);
        let values = store.get_many(&names).await?;
        Self::from_values(values)
    }

    pub fn from_values(mut values: HashMap<String, SecretString>) -> Result<Self, ToggleError> {
        let mut missing: Vec<&str> = REQUIRED
            .iter()
            .copied()
            .filter(|name| {
                values
                    .get(*name)
                    .map_or(true, |v| v.expose_secret().trim().is_empty())
            })
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            return Err(ToggleError::ConfigError(format!(
                "Missing required secrets: {}",
                missing.join(", ")
            )));
        }

        let private_key = take(&mut values, PRIVATE_KEY);
        if !looks_like_pem_private_key(private_key.expose_secret()) {
            return Err(ToggleError::ConfigError(
                "private_key is not a PEM encoded private key".to_string(),
            ));
        }

        let latitude = parse_float(HOME_LATITUDE, &take(&mut values, HOME_LATITUDE))?;
        let longitude = parse_float(HOME_LONGITUDE, &take(&mut values, HOME_LONGITUDE))?;
        let radius_meters = match values.remove(HOME_RADIUS) {
            Some(v) if !v.expose_secret().trim().is_empty() => parse_float(HOME_RADIUS, &v)?,
            _ => DEFAULT_HOME_RADIUS_METERS,
        };

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ToggleError::ConfigError(format!(
                "Home location ({}, {}) is out of range",
                latitude, longitude
            )));
        }
        if radius_meters <= 0.0 {
            return Err(ToggleError::ConfigError(format!(
                "{} must be positive, got {}",
                HOME_RADIUS, radius_meters
            )));
        }

        Ok(Self {
            client_id: take(&mut values, CLIENT_ID).expose_secret().trim().to_string(),
            client_secret: take(&mut values, CLIENT_SECRET),
            refresh_token: take(&mut values, REFRESH_TOKEN),
            private_key,
            vin: take(&mut values, VIN).expose_secret().trim().to_string(),
            home: HomeLocation {
                latitude,
                longitude,
                radius_meters,
            },
        })
    }
}

fn take(values: &mut HashMap<String, SecretString>, name: &str) -> SecretString {
    values.remove(name).unwrap_or_else(|| SecretString::from(""))
}

fn parse_float(name: &str, value: &SecretString) -> Result<f64, ToggleError> {
    value
        .expose_secret()
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ToggleError::ConfigError(format!("{} is not a number", name)))
}

/// PEM framing check; the key itself is consumed by the signing component
pub fn looks_like_pem_private_key(pem: &str) -> bool {
    let pem = pem.trim();
    pem.starts_with("-----BEGIN ")
        && pem.contains("PRIVATE KEY-----")
        && pem.ends_with("PRIVATE KEY-----")
}
