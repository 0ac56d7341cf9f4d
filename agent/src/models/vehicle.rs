//! Vehicle models

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ToggleError;

/// Desired Sentry Mode state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetState {
    #[default]
    On,
    Off,
}

impl TargetState {
    /// Parse an optional input value, defaulting to `On` when absent
    pub fn from_input(value: Option<&str>) -> Result<Self, ToggleError> {
        match value {
            None => Ok(TargetState::default()),
            Some(s) => s.parse(),
        }
    }

    /// Whether the feature should end up enabled
    pub fn is_on(&self) -> bool {
        matches!(self, TargetState::On)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetState::On => "on",
            TargetState::Off => "off",
        }
    }
}

impl std::str::FromStr for TargetState {
    type Err = ToggleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "on" => Ok(TargetState::On),
            "off" => Ok(TargetState::Off),
            _ => Err(ToggleError::InputError(format!(
                "invalid target state: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connectivity of the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Offline,
    Waking,
    Online,
    Unknown,
}

impl Connectivity {
    /// Map the Fleet API `state` string
    pub fn from_api(state: &str) -> Self {
        match state {
            "online" => Connectivity::Online,
            "asleep" | "offline" => Connectivity::Offline,
            "waking" => Connectivity::Waking,
            _ => Connectivity::Unknown,
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, Connectivity::Online)
    }
}

/// Drivetrain position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftState {
    Park,
    Other(String),
}

impl ShiftState {
    /// Map the Fleet API `shift_state` value; `None` means not reported
    pub fn from_api(value: Option<&str>) -> Option<Self> {
        match value {
            None | Some("") => None,
            Some("P") => Some(ShiftState::Park),
            Some(other) => Some(ShiftState::Other(other.to_string())),
        }
    }
}

/// Light status returned by each readiness poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleStatus {
    pub connectivity: Connectivity,
    pub in_service: bool,
}

impl VehicleStatus {
    pub fn new(connectivity: Connectivity, in_service: bool) -> Self {
        Self {
            connectivity,
            in_service,
        }
    }
}

/// Point-in-time capture of everything a decision needs
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSnapshot {
    pub connectivity: Connectivity,
    pub in_service: bool,
    pub feature_available: bool,
    pub feature_enabled: bool,
    pub shift_state: Option<ShiftState>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl DeviceSnapshot {
    /// Coordinates when both are reported and finite
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Circular zone the vehicle must be inside before Sentry Mode may be turned off
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomeLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_radius")]
    pub radius_meters: f64,
}

pub const DEFAULT_HOME_RADIUS_METERS: f64 = 10.0;

fn default_radius() -> f64 {
    DEFAULT_HOME_RADIUS_METERS
}
