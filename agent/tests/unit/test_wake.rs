//! Wake-up protocol tests

use std::time::Duration;

use sentry_toggle::clock::MockClock;
use sentry_toggle::control::wake::{ensure_vehicle_online, Options};
use sentry_toggle::errors::ToggleError;
use sentry_toggle::models::vehicle::Connectivity;
use tokio_test::{assert_err, assert_ok};

use crate::fakes::{parked_snapshot, status, Calls, FakeVehicle, Script};

#[tokio::test]
async fn test_online_vehicle_is_left_alone() {
    let script = Script::online(parked_snapshot(0.0, false));
    let vehicle = FakeVehicle::new(script.clone());
    let clock = MockClock::default();

    let result = assert_ok!(
        ensure_vehicle_online(
            status(Connectivity::Online),
            &vehicle,
            &clock,
            &Options::default(),
        )
        .await
    );

    assert!(result.connectivity.is_online());
    assert_eq!(script.calls.total(), 0);
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn test_wakes_on_second_round() {
    // 13 asleep polls exhaust round one, then two more before connecting
    let mut statuses = vec![status(Connectivity::Offline); 15];
    statuses.push(status(Connectivity::Online));
    let script = Script::new(statuses, parked_snapshot(0.0, false));
    let vehicle = FakeVehicle::new(script.clone());
    let clock = MockClock::default();

    ensure_vehicle_online(
        status(Connectivity::Offline),
        &vehicle,
        &clock,
        &Options::default(),
    )
    .await
    .unwrap();

    assert_eq!(Calls::get(&script.calls.wake), 2);
    assert_eq!(Calls::get(&script.calls.status), 16);
    assert_eq!(clock.total_slept(), Duration::from_secs(80));
}

#[tokio::test]
async fn test_gives_up_after_five_rounds() {
    let script = Script::new(vec![status(Connectivity::Offline)], parked_snapshot(0.0, false));
    let vehicle = FakeVehicle::new(script.clone());
    let clock = MockClock::default();

    let err = assert_err!(
        ensure_vehicle_online(
            status(Connectivity::Offline),
            &vehicle,
            &clock,
            &Options::default(),
        )
        .await
    );

    assert!(matches!(err, ToggleError::WakeTimeout { rounds: 5 }));
    assert!(err.is_retryable());
    assert_eq!(Calls::get(&script.calls.wake), 5);
    assert_eq!(Calls::get(&script.calls.status), 65);
    assert_eq!(clock.total_slept(), Duration::from_secs(325));
    assert!(clock.sleeps().iter().all(|d| *d == Duration::from_secs(5)));
}

#[tokio::test]
async fn test_waking_state_counts_as_not_online() {
    let script = Script::new(
        vec![status(Connectivity::Waking), status(Connectivity::Online)],
        parked_snapshot(0.0, false),
    );
    let vehicle = FakeVehicle::new(script.clone());
    let clock = MockClock::default();

    let result = ensure_vehicle_online(
        status(Connectivity::Unknown),
        &vehicle,
        &clock,
        &Options::default(),
    )
    .await
    .unwrap();

    assert_eq!(result.connectivity, Connectivity::Online);
    assert_eq!(Calls::get(&script.calls.wake), 1);
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(5); 2]);
}
