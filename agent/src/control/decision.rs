//! Decision policy gating the Sentry Mode command
//!
//! [`decide`] is a pure function of the snapshot, the target and the home zone.
//! Checks run in a fixed order and stop at the first that declines: service
//! mode, availability, idempotency, then (only when turning the feature off)
//! park and geofence. Turning Sentry Mode on never looks at the drivetrain or
//! the location.

use std::fmt;

use tracing::debug;

use crate::control::geofence::{distance_meters, is_within};
use crate::models::vehicle::{DeviceSnapshot, HomeLocation, ShiftState, TargetState};

/// Why the command was not issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    InService,
    FeatureNotAvailable,
    AlreadyInDesiredState,
    NotInPark,
    NotAtHome,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::InService => "in service",
            SkipReason::FeatureNotAvailable => "feature not available",
            SkipReason::AlreadyInDesiredState => "already in desired state",
            SkipReason::NotInPark => "not in park",
            SkipReason::NotAtHome => "not at home",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating a snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Issue the command with this desired value
    Proceed { desired_enabled: bool },

    /// Evaluated and chose not to act
    Skip(SkipReason),

    /// The snapshot could not be evaluated
    Error(String),
}

/// Evaluate whether Sentry Mode should be set to `target`
pub fn decide(snapshot: &DeviceSnapshot, target: TargetState, home: &HomeLocation) -> Decision {
    if !snapshot.connectivity.is_online() {
        return Decision::Error("device not online".to_string());
    }

    if snapshot.in_service {
        return Decision::Skip(SkipReason::InService);
    }

    if !snapshot.feature_available {
        return Decision::Skip(SkipReason::FeatureNotAvailable);
    }

    let desired_enabled = target.is_on();
    if snapshot.feature_enabled == desired_enabled {
        return Decision::Skip(SkipReason::AlreadyInDesiredState);
    }

    if target == TargetState::Off {
        if let Some(ShiftState::Other(_)) = &snapshot.shift_state {
            return Decision::Skip(SkipReason::NotInPark);
        }

        let Some((lat, lon)) = snapshot.coordinates() else {
            return Decision::Error("location unavailable".to_string());
        };
        if !home.radius_meters.is_finite() || !home.latitude.is_finite() || !home.longitude.is_finite() {
            return Decision::Error("home location is malformed".to_string());
        }

        let distance = distance_meters(lat, lon, home.latitude, home.longitude);
        debug!("Distance from home: {} meters.", distance as i64);
        if !is_within(distance, home.radius_meters) {
            return Decision::Skip(SkipReason::NotAtHome);
        }
    }

    Decision::Proceed { desired_enabled }
}
