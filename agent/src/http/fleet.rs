//! Fleet API vehicle adapter
//!
//! Maps the Fleet API's JSON onto typed [`VehicleStatus`] and
//! [`DeviceSnapshot`] values; nothing past this module sees wire shapes.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use fleet_api_models::models::{
    CommandResult, FleetResponse, SetSentryModeRequest, Vehicle, VehicleData,
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ToggleError;
use crate::filesys::file::File;
use crate::http::client::HttpClient;
use crate::models::vehicle::{Connectivity, DeviceSnapshot, ShiftState, VehicleStatus};
use crate::secrets::config::looks_like_pem_private_key;
use crate::vehicle::api::{CommandReply, VehicleApi, VehicleConnector};

const VEHICLE_DATA_ENDPOINTS: &str = "location_data;vehicle_state;drive_state";

/// Fleet API region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Na,
    Eu,
    Cn,
}

impl Region {
    pub fn base_url(&self) -> &'static str {
        match self {
            Region::Na => "https://fleet-api.prd.na.vn.cloud.tesla.com",
            Region::Eu => "https://fleet-api.prd.eu.vn.cloud.tesla.com",
            Region::Cn => "https://fleet-api.prd.cn.vn.cloud.tesla.cn",
        }
    }
}

/// Fleet API connection options
#[derive(Debug, Clone)]
pub struct FleetOptions {
    /// Base URL for reads and wake-ups
    pub base_url: String,

    /// Base URL for signed vehicle commands, typically a local signing proxy
    pub command_base_url: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for FleetOptions {
    fn default() -> Self {
        Self {
            base_url: Region::default().base_url().to_string(),
            command_base_url: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Opens [`FleetClient`] sessions
pub struct FleetConnector {
    options: FleetOptions,
}

impl FleetConnector {
    pub fn new(options: FleetOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl VehicleConnector for FleetConnector {
    async fn connect(
        &self,
        access_token: &SecretString,
        signing_key: &Path,
        vin: &str,
    ) -> Result<Box<dyn VehicleApi>, ToggleError> {
        // Commands are signed by the proxy at `command_base_url`, which is
        // given the same key; here it is only checked before any request.
        let key = File::new(signing_key).read_string().await?;
        if !looks_like_pem_private_key(&key) {
            return Err(ToggleError::ConfigError(format!(
                "Staged signing key {} is not a PEM private key",
                signing_key.display()
            )));
        }

        let reads = HttpClient::new(&self.options.base_url, self.options.timeout)?;
        let commands = match &self.options.command_base_url {
            Some(url) => HttpClient::new(url, self.options.timeout)?,
            None => HttpClient::new(&self.options.base_url, self.options.timeout)?,
        };
        info!(
            "Connected to Fleet API at {} (commands via {})",
            reads.base_url(),
            commands.base_url()
        );

        Ok(Box::new(FleetClient {
            reads,
            commands,
            access_token: access_token.clone(),
            vin: vin.to_string(),
        }))
    }
}

/// One vehicle reached through the Fleet API
pub struct FleetClient {
    reads: HttpClient,
    commands: HttpClient,
    access_token: SecretString,
    vin: String,
}

#[async_trait]
impl VehicleApi for FleetClient {
    async fn wake(&self) -> Result<(), ToggleError> {
        let path = format!("/api/1/vehicles/{}/wake_up", self.vin);
        let _: serde_json::Value = self
            .reads
            .post(&path, &self.access_token, &serde_json::json!({}))
            .await?;
        Ok(())
    }

    async fn status(&self) -> Result<VehicleStatus, ToggleError> {
        let path = format!("/api/1/vehicles/{}", self.vin);
        let body: FleetResponse<Vehicle> = self.reads.get(&path, &self.access_token).await?;
        Ok(status_from_vehicle(&body.response))
    }

    async fn snapshot(&self) -> Result<DeviceSnapshot, ToggleError> {
        let path = format!(
            "/api/1/vehicles/{}/vehicle_data?endpoints={}",
            self.vin, VEHICLE_DATA_ENDPOINTS
        );
        let body: FleetResponse<VehicleData> = self.reads.get(&path, &self.access_token).await?;
        snapshot_from_data(body.response)
    }

    async fn set_sentry_mode(&self, enabled: bool) -> Result<CommandReply, ToggleError> {
        let path = format!("/api/1/vehicles/{}/command/set_sentry_mode", self.vin);
        let body: FleetResponse<CommandResult> = self
            .commands
            .post(&path, &self.access_token, &SetSentryModeRequest { on: enabled })
            .await?;
        debug!("set_sentry_mode response: {:?}", body.response);
        Ok(CommandReply {
            result: body.response.result,
            reason: body.response.reason,
        })
    }
}

/// Map the vehicle summary onto the readiness status
pub fn status_from_vehicle(vehicle: &Vehicle) -> VehicleStatus {
    VehicleStatus::new(Connectivity::from_api(&vehicle.state), vehicle.in_service)
}

/// Map vehicle data onto a snapshot
///
/// The Sentry Mode fields are required; drive state may be absent, in which
/// case location and shift state are left unknown.
pub fn snapshot_from_data(data: VehicleData) -> Result<DeviceSnapshot, ToggleError> {
    let vehicle_state = data
        .vehicle_state
        .ok_or_else(|| ToggleError::InvalidSnapshot("vehicle_state is missing".to_string()))?;
    let feature_available = vehicle_state.sentry_mode_available.ok_or_else(|| {
        ToggleError::InvalidSnapshot("sentry_mode_available is missing".to_string())
    })?;
    let feature_enabled = vehicle_state
        .sentry_mode
        .ok_or_else(|| ToggleError::InvalidSnapshot("sentry_mode is missing".to_string()))?;

    let (latitude, longitude, shift_state) = match data.drive_state {
        Some(drive) => (
            drive.latitude,
            drive.longitude,
            ShiftState::from_api(drive.shift_state.as_deref()),
        ),
        None => (None, None, None),
    };

    Ok(DeviceSnapshot {
        connectivity: Connectivity::from_api(&data.state),
        in_service: data.in_service,
        feature_available,
        feature_enabled,
        shift_state,
        latitude,
        longitude,
    })
}
