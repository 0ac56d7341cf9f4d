//! Process-boundary wiring

use std::sync::Arc;

use tracing::{error, info};

use crate::app::options::AppOptions;
use crate::authn::token_mngr::{OAuthTokenProvider, TokenProvider};
use crate::clock::{Clock, SystemClock};
use crate::control::orchestrator::{run_invocation, Orchestrator};
use crate::control::retry::RetryEnvelope;
use crate::errors::ToggleError;
use crate::filesys::dir::Dir;
use crate::filesys::file::File;
use crate::http::fleet::FleetConnector;
use crate::models::invocation::InvocationEvent;
use crate::models::outcome::Outcome;
use crate::secrets::store::{FileSecretStore, SecretStore};
use crate::vehicle::api::VehicleConnector;

/// Run one invocation with production collaborators
pub async fn run(options: AppOptions, event: InvocationEvent) -> Outcome {
    info!("Running sentry toggle with options: {:?}", options);

    let (orchestrator, envelope) = match init(&options) {
        Ok(parts) => parts,
        Err(e) => {
            error!("Failed to initialize: {}", e);
            return Outcome::error(e.to_string());
        }
    };

    run_invocation(&event, &orchestrator, &envelope).await
}

fn init(options: &AppOptions) -> Result<(Orchestrator, RetryEnvelope), ToggleError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let secret_store: Arc<dyn SecretStore> =
        Arc::new(FileSecretStore::new(File::new(&options.secrets_file)));
    let token_provider: Arc<dyn TokenProvider> =
        Arc::new(OAuthTokenProvider::new(&options.token_url, options.token_timeout)?);
    let connector: Arc<dyn VehicleConnector> = Arc::new(FleetConnector::new(options.fleet.clone()));

    let orchestrator = Orchestrator::new(
        secret_store,
        token_provider,
        connector,
        clock.clone(),
        Dir::new(&options.scratch_dir),
        options.wake.clone(),
    );
    let envelope = RetryEnvelope::new(options.retry.clone(), clock);

    Ok((orchestrator, envelope))
}
