//! Decision policy tests

use sentry_toggle::control::decision::{decide, Decision, SkipReason};
use sentry_toggle::control::geofence::distance_meters;
use sentry_toggle::models::vehicle::{
    Connectivity, HomeLocation, ShiftState, TargetState, DEFAULT_HOME_RADIUS_METERS,
};

use crate::fakes::{parked_snapshot, HOME_LAT, HOME_LON};

fn home() -> HomeLocation {
    HomeLocation {
        latitude: HOME_LAT,
        longitude: HOME_LON,
        radius_meters: DEFAULT_HOME_RADIUS_METERS,
    }
}

#[test]
fn test_off_at_home_proceeds() {
    let snapshot = parked_snapshot(5.0, true);
    assert_eq!(
        decide(&snapshot, TargetState::Off, &home()),
        Decision::Proceed { desired_enabled: false }
    );
}

#[test]
fn test_off_away_from_home_skips() {
    let snapshot = parked_snapshot(50.0, true);
    assert_eq!(
        decide(&snapshot, TargetState::Off, &home()),
        Decision::Skip(SkipReason::NotAtHome)
    );
}

#[test]
fn test_boundary_is_outside() {
    let (lat, lon) = parked_snapshot(10.0, true).coordinates().unwrap();
    let radius = distance_meters(lat, lon, HOME_LAT, HOME_LON);
    let home = HomeLocation {
        radius_meters: radius,
        ..home()
    };

    assert_eq!(
        decide(&parked_snapshot(10.0, true), TargetState::Off, &home),
        Decision::Skip(SkipReason::NotAtHome)
    );
}

#[test]
fn test_on_ignores_shift_and_location() {
    let mut snapshot = parked_snapshot(5_000.0, false);
    snapshot.shift_state = Some(ShiftState::Other("D".to_string()));
    snapshot.latitude = None;

    assert_eq!(
        decide(&snapshot, TargetState::On, &home()),
        Decision::Proceed { desired_enabled: true }
    );
}

#[test]
fn test_already_in_desired_state() {
    assert_eq!(
        decide(&parked_snapshot(0.0, true), TargetState::On, &home()),
        Decision::Skip(SkipReason::AlreadyInDesiredState)
    );
    assert_eq!(
        decide(&parked_snapshot(0.0, false), TargetState::Off, &home()),
        Decision::Skip(SkipReason::AlreadyInDesiredState)
    );
}

#[test]
fn test_checks_run_in_order() {
    // service wins over every later check
    let mut snapshot = parked_snapshot(500.0, true);
    snapshot.in_service = true;
    snapshot.feature_available = false;
    assert_eq!(
        decide(&snapshot, TargetState::Off, &home()),
        Decision::Skip(SkipReason::InService)
    );

    snapshot.in_service = false;
    assert_eq!(
        decide(&snapshot, TargetState::Off, &home()),
        Decision::Skip(SkipReason::FeatureNotAvailable)
    );

    // park is checked before the geofence
    snapshot.feature_available = true;
    snapshot.shift_state = Some(ShiftState::Other("R".to_string()));
    assert_eq!(
        decide(&snapshot, TargetState::Off, &home()),
        Decision::Skip(SkipReason::NotInPark)
    );
}

#[test]
fn test_missing_shift_state_does_not_block() {
    let mut snapshot = parked_snapshot(2.0, true);
    snapshot.shift_state = None;
    assert_eq!(
        decide(&snapshot, TargetState::Off, &home()),
        Decision::Proceed { desired_enabled: false }
    );
}

#[test]
fn test_unevaluable_snapshots() {
    let mut snapshot = parked_snapshot(2.0, true);
    snapshot.longitude = None;
    assert!(matches!(
        decide(&snapshot, TargetState::Off, &home()),
        Decision::Error(_)
    ));

    let mut snapshot = parked_snapshot(2.0, true);
    snapshot.connectivity = Connectivity::Offline;
    assert!(matches!(
        decide(&snapshot, TargetState::On, &home()),
        Decision::Error(_)
    ));
}
