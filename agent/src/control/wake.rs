//! Bounded wake-up protocol
//!
//! A single wake signal does not guarantee the vehicle connects within any
//! fixed time (10-60s is typical), so the protocol re-sends the signal a small
//! number of times, polling at a fixed interval within each round.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::clock::Clock;
use crate::errors::ToggleError;
use crate::models::vehicle::VehicleStatus;
use crate::vehicle::api::VehicleApi;

/// Wake protocol options
#[derive(Debug, Clone)]
pub struct Options {
    /// Delay between readiness polls
    pub poll_interval: Duration,

    /// Polling budget of one round, measured from its wake signal
    pub round_timeout: Duration,

    /// Number of wake signals to send before giving up
    pub max_rounds: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            round_timeout: Duration::from_secs(65), // 60 seconds plus a buffer
            max_rounds: 5,
        }
    }
}

/// Drive the vehicle online, returning the first online status observed
///
/// An already online `initial` status is returned untouched, without waking or
/// polling. Fails with [`ToggleError::WakeTimeout`] once every round elapsed.
pub async fn ensure_online<P, PF, W, WF>(
    initial: VehicleStatus,
    mut poll: P,
    mut wake: W,
    clock: &dyn Clock,
    options: &Options,
) -> Result<VehicleStatus, ToggleError>
where
    P: FnMut() -> PF,
    PF: Future<Output = Result<VehicleStatus, ToggleError>>,
    W: FnMut() -> WF,
    WF: Future<Output = Result<(), ToggleError>>,
{
    if initial.connectivity.is_online() {
        debug!("Vehicle is already online.");
        return Ok(initial);
    }

    if options.poll_interval.is_zero() {
        return Err(ToggleError::ConfigError(
            "wake poll interval must be greater than zero".to_string(),
        ));
    }

    for round in 1..=options.max_rounds {
        let round_tag = format!("{}/{}", round, options.max_rounds);
        debug!("Vehicle is not online. Sending wake_up command... ({})", round_tag);
        wake().await?;

        let t_0 = clock.now();
        while clock.elapsed_since(t_0) + options.poll_interval <= options.round_timeout {
            clock.sleep(options.poll_interval).await;
            let status = poll().await?;
            let elapsed = clock.elapsed_since(t_0).as_secs();

            if status.connectivity.is_online() {
                info!("Vehicle is now online after {}s. ({})", elapsed, round_tag);
                return Ok(status);
            }

            debug!(
                "Vehicle ({:?}) is still not online after {}s. Waiting for another {}s... ({})",
                status.connectivity,
                elapsed,
                options.poll_interval.as_secs(),
                round_tag
            );
        }
    }

    error!(
        "Vehicle failed to come online after {} wake_up tries. Aborting.",
        options.max_rounds
    );
    Err(ToggleError::WakeTimeout {
        rounds: options.max_rounds,
    })
}

/// [`ensure_online`] against a connected vehicle
pub async fn ensure_vehicle_online(
    initial: VehicleStatus,
    vehicle: &dyn VehicleApi,
    clock: &dyn Clock,
    options: &Options,
) -> Result<VehicleStatus, ToggleError> {
    ensure_online(
        initial,
        move || vehicle.status(),
        move || vehicle.wake(),
        clock,
        options,
    )
    .await
}
