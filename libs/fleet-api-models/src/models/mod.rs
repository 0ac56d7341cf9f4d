//! API models

use serde::{Deserialize, Serialize};

/// Envelope wrapping every Fleet API response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetResponse<T> {
    pub response: T,
}

/// Vehicle summary returned by `GET /api/1/vehicles/{vin}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Connectivity state: "online", "asleep", "offline", ...
    pub state: String,
    #[serde(default)]
    pub in_service: bool,
}

/// Vehicle data returned by `GET /api/1/vehicles/{vin}/vehicle_data`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleData {
    pub state: String,
    #[serde(default)]
    pub in_service: bool,
    #[serde(default)]
    pub vehicle_state: Option<VehicleState>,
    #[serde(default)]
    pub drive_state: Option<DriveState>,
}

/// `vehicle_state` section of the vehicle data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleState {
    #[serde(default)]
    pub sentry_mode: Option<bool>,
    #[serde(default)]
    pub sentry_mode_available: Option<bool>,
}

/// `drive_state` section of the vehicle data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveState {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// "P", "D", "R", "N" or null while parked and asleep
    #[serde(default)]
    pub shift_state: Option<String>,
}

/// Result of a vehicle command such as `set_sentry_mode`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    pub result: bool,
    #[serde(default)]
    pub reason: String,
}

/// Body of `POST /api/1/vehicles/{vin}/command/set_sentry_mode`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetSentryModeRequest {
    pub on: bool,
}

/// OAuth refresh-token grant response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// OAuth error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}
