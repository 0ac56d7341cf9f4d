//! Vehicle API traits
//!
//! The control flow only talks to a vehicle through these traits. The Fleet API
//! adapter lives in `http::fleet`; tests provide in-memory fakes.

use std::path::Path;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::errors::ToggleError;
use crate::models::vehicle::{DeviceSnapshot, VehicleStatus};

/// Outcome reported by the vehicle for a mutating command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub result: bool,
    pub reason: String,
}

/// Operations available on one connected vehicle
#[async_trait]
pub trait VehicleApi: Send + Sync {
    /// Send a wake signal; the reply carries no useful information
    async fn wake(&self) -> Result<(), ToggleError>;

    /// Connectivity and service state, available even while asleep
    async fn status(&self) -> Result<VehicleStatus, ToggleError>;

    /// Full snapshot (location, vehicle and drive state); requires an online vehicle
    async fn snapshot(&self) -> Result<DeviceSnapshot, ToggleError>;

    /// Turn Sentry Mode on or off
    async fn set_sentry_mode(&self, enabled: bool) -> Result<CommandReply, ToggleError>;
}

/// Opens a [`VehicleApi`] session for one vehicle
#[async_trait]
pub trait VehicleConnector: Send + Sync {
    async fn connect(
        &self,
        access_token: &SecretString,
        signing_key: &Path,
        vin: &str,
    ) -> Result<Box<dyn VehicleApi>, ToggleError>;
}
