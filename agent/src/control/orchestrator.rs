//! One decide-and-act cycle
//!
//! [`Orchestrator::attempt`] runs the whole sequence once and reports either an
//! evaluated [`Outcome`] or a typed failure; retrying is left to the
//! [`RetryEnvelope`] that [`run_invocation`] wraps around it.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::authn::token_mngr::{TokenManager, TokenProvider};
use crate::clock::Clock;
use crate::control::decision::{decide, Decision, SkipReason};
use crate::control::retry::RetryEnvelope;
use crate::control::wake::{self, ensure_vehicle_online};
use crate::errors::ToggleError;
use crate::filesys::dir::Dir;
use crate::filesys::staged::StagedFile;
use crate::models::invocation::InvocationEvent;
use crate::models::outcome::Outcome;
use crate::models::vehicle::TargetState;
use crate::secrets::config::Secrets;
use crate::secrets::store::SecretStore;
use crate::vehicle::api::VehicleConnector;

/// Sequences credentials, wake-up, decision and command for one vehicle
pub struct Orchestrator {
    secret_store: Arc<dyn SecretStore>,
    token_mngr: TokenManager,
    connector: Arc<dyn VehicleConnector>,
    clock: Arc<dyn Clock>,
    scratch_dir: Dir,
    wake_options: wake::Options,
}

impl Orchestrator {
    pub fn new(
        secret_store: Arc<dyn SecretStore>,
        token_provider: Arc<dyn TokenProvider>,
        connector: Arc<dyn VehicleConnector>,
        clock: Arc<dyn Clock>,
        scratch_dir: Dir,
        wake_options: wake::Options,
    ) -> Self {
        Self {
            token_mngr: TokenManager::new(token_provider, secret_store.clone()),
            secret_store,
            connector,
            clock,
            scratch_dir,
            wake_options,
        }
    }

    /// Run the cycle once for `target`
    pub async fn attempt(&self, target: TargetState) -> Result<Outcome, ToggleError> {
        info!("1. Fetching secrets...");
        let secrets = Secrets::load(self.secret_store.as_ref()).await?;

        let access_token = self.token_mngr.access_token(&secrets).await?;

        // removed when this attempt returns, whatever the path
        let signing_key = StagedFile::stage(&self.scratch_dir, "private_key", &secrets.private_key).await?;
        let vehicle = self
            .connector
            .connect(access_token.secret(), signing_key.path(), &secrets.vin)
            .await?;

        info!("2. Ensuring vehicle is online...");
        let status = vehicle.status().await?;
        if status.in_service {
            warn!("Vehicle is in service mode. Skipping.");
            return Ok(Outcome::skipped(SkipReason::InService.as_str()));
        }
        ensure_vehicle_online(status, vehicle.as_ref(), self.clock.as_ref(), &self.wake_options).await?;

        let snapshot = vehicle.snapshot().await?;
        debug!("Vehicle snapshot: {:?}", snapshot);

        info!("3. Validating vehicle state...");
        match decide(&snapshot, target, &secrets.home) {
            Decision::Skip(reason) => {
                info!("Sentry Mode target {}: {}. No action taken.", target, reason);
                Ok(Outcome::skipped(reason.as_str()))
            }
            Decision::Error(reason) => {
                error!("Cannot evaluate vehicle state: {}", reason);
                Err(ToggleError::InvalidSnapshot(reason))
            }
            Decision::Proceed { desired_enabled } => {
                let upper = target.as_str().to_uppercase();
                info!("4. Setting Sentry Mode to: {}...", upper);

                let reply = vehicle.set_sentry_mode(desired_enabled).await?;
                if !reply.result {
                    error!("Failed to set Sentry Mode: {:?}", reply);
                    let reason = if reply.reason.is_empty() {
                        "vehicle reported failure".to_string()
                    } else {
                        reply.reason
                    };
                    return Err(ToggleError::CommandFailure(reason));
                }

                info!("Sentry Mode set successfully to {}.", upper);
                Ok(Outcome::success(target))
            }
        }
    }
}

/// Handle one invocation end to end
///
/// An invalid target is rejected before any collaborator is touched.
pub async fn run_invocation(
    event: &InvocationEvent,
    orchestrator: &Orchestrator,
    envelope: &RetryEnvelope,
) -> Outcome {
    info!("0. Determine target state...");
    let target = match TargetState::from_input(event.sentry.as_deref()) {
        Ok(target) => target,
        Err(e) => {
            error!("Invalid target Sentry Mode state: {}", e);
            return Outcome::error("invalid target state");
        }
    };
    debug!("Target Sentry State: {}", target);

    envelope.run(|| orchestrator.attempt(target)).await
}
