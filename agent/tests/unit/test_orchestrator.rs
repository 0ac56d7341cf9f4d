//! End-to-end invocation tests against in-memory collaborators

use std::sync::Arc;
use std::time::Duration;

use sentry_toggle::clock::MockClock;
use sentry_toggle::control::orchestrator::{run_invocation, Orchestrator};
use sentry_toggle::control::retry::{self, RetryEnvelope};
use sentry_toggle::control::wake;
use sentry_toggle::filesys::dir::Dir;
use sentry_toggle::models::invocation::InvocationEvent;
use sentry_toggle::models::outcome::{Outcome, OutcomeStatus};
use sentry_toggle::models::vehicle::{Connectivity, ShiftState, TargetState, VehicleStatus};
use sentry_toggle::secrets::config::{REFRESH_TOKEN, VIN};
use sentry_toggle::secrets::store::MemorySecretStore;
use tempfile::TempDir;

use crate::fakes::{
    parked_snapshot, secret_store, status, Calls, FakeConnector, FakeTokenProvider, Script, PEM,
};

struct Harness {
    script: Arc<Script>,
    store: Arc<MemorySecretStore>,
    tokens: Arc<FakeTokenProvider>,
    clock: Arc<MockClock>,
    scratch: TempDir,
    orchestrator: Orchestrator,
    envelope: RetryEnvelope,
}

impl Harness {
    fn new(script: Arc<Script>) -> Self {
        Self::with(script, secret_store(), FakeTokenProvider::default())
    }

    fn with(script: Arc<Script>, store: MemorySecretStore, tokens: FakeTokenProvider) -> Self {
        let store = Arc::new(store);
        let tokens = Arc::new(tokens);
        let clock = Arc::new(MockClock::default());
        let scratch = tempfile::tempdir().unwrap();

        let orchestrator = Orchestrator::new(
            store.clone(),
            tokens.clone(),
            Arc::new(FakeConnector::new(script.clone())),
            clock.clone(),
            Dir::new(scratch.path().join("tmp")),
            wake::Options::default(),
        );
        let envelope = RetryEnvelope::new(retry::Options::default(), clock.clone());

        Self {
            script,
            store,
            tokens,
            clock,
            scratch,
            orchestrator,
            envelope,
        }
    }

    async fn invoke(&self, sentry: Option<&str>) -> Outcome {
        let event = sentry.map(InvocationEvent::new).unwrap_or_default();
        run_invocation(&event, &self.orchestrator, &self.envelope).await
    }

    fn staged_files_left(&self) -> usize {
        match std::fs::read_dir(self.scratch.path().join("tmp")) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }
}

#[tokio::test]
async fn test_turns_off_at_home() {
    let h = Harness::new(Script::online(parked_snapshot(5.0, true)));

    let outcome = h.invoke(Some("off")).await;

    assert_eq!(outcome, Outcome::success(TargetState::Off));
    assert_eq!(outcome.detail, "off");
    assert_eq!(h.script.commands(), vec![false]);
    assert_eq!(Calls::get(&h.script.calls.wake), 0);
}

#[tokio::test]
async fn test_skips_off_away_from_home() {
    let h = Harness::new(Script::online(parked_snapshot(50.0, true)));

    let outcome = h.invoke(Some("off")).await;

    assert_eq!(outcome, Outcome::skipped("not at home"));
    assert_eq!(Calls::get(&h.script.calls.command), 0);
}

#[tokio::test]
async fn test_skips_when_already_on() {
    let h = Harness::new(Script::online(parked_snapshot(5_000.0, true)));

    let outcome = h.invoke(Some("on")).await;

    assert_eq!(outcome, Outcome::skipped("already in desired state"));
    assert_eq!(Calls::get(&h.script.calls.command), 0);
}

#[tokio::test]
async fn test_missing_target_defaults_to_on() {
    let mut snapshot = parked_snapshot(5_000.0, false);
    snapshot.shift_state = Some(ShiftState::Other("D".to_string()));
    let h = Harness::new(Script::online(snapshot));

    let outcome = h.invoke(None).await;

    assert_eq!(outcome, Outcome::success(TargetState::On));
    assert_eq!(h.script.commands(), vec![true]);
}

#[tokio::test]
async fn test_invalid_target_touches_nothing() {
    let h = Harness::new(Script::online(parked_snapshot(5.0, true)));

    let outcome = h.invoke(Some("sideways")).await;

    assert_eq!(outcome, Outcome::error("invalid target state"));
    assert_eq!(h.script.calls.total(), 0);
    assert_eq!(h.tokens.exchanges.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert!(!h.scratch.path().join("tmp").exists());
    assert!(h.clock.sleeps().is_empty());
}

#[tokio::test]
async fn test_in_service_skips_before_waking() {
    let script = Script::new(
        vec![VehicleStatus::new(Connectivity::Offline, true)],
        parked_snapshot(5.0, true),
    );
    let h = Harness::new(script);

    let outcome = h.invoke(Some("off")).await;

    assert_eq!(outcome, Outcome::skipped("in service"));
    assert_eq!(Calls::get(&h.script.calls.wake), 0);
    assert_eq!(Calls::get(&h.script.calls.snapshot), 0);
}

#[tokio::test]
async fn test_wakes_then_acts() {
    let script = Script::new(
        vec![
            status(Connectivity::Offline),
            status(Connectivity::Offline),
            status(Connectivity::Online),
        ],
        parked_snapshot(5.0, true),
    );
    let h = Harness::new(script);

    let outcome = h.invoke(Some("off")).await;

    assert_eq!(outcome.status, OutcomeStatus::Success);
    assert_eq!(Calls::get(&h.script.calls.wake), 1);
    assert_eq!(h.clock.total_slept(), Duration::from_secs(10));
}

#[tokio::test]
async fn test_unreachable_vehicle_exhausts_retries() {
    let script = Script::new(vec![status(Connectivity::Offline)], parked_snapshot(5.0, true));
    let h = Harness::new(script);

    let outcome = h.invoke(Some("off")).await;

    assert_eq!(outcome.status, OutcomeStatus::Error);
    assert!(outcome.detail.contains("failed to come online"));
    assert_eq!(Calls::get(&h.script.calls.connect), 5);
    assert_eq!(Calls::get(&h.script.calls.wake), 25);
    assert_eq!(Calls::get(&h.script.calls.command), 0);
    // five wake budgets plus 1+2+4+8+16 of backoff
    assert_eq!(h.clock.total_slept(), Duration::from_secs(5 * 325 + 31));
    assert_eq!(h.staged_files_left(), 0);
}

#[tokio::test]
async fn test_rejected_command_is_retried() {
    let script = Script::online(parked_snapshot(5.0, true));
    script.queue_reply(false, "vehicle busy");
    let h = Harness::new(script);

    let outcome = h.invoke(Some("off")).await;

    assert_eq!(outcome, Outcome::success(TargetState::Off));
    assert_eq!(h.script.commands(), vec![false, false]);
    assert_eq!(h.clock.sleeps(), vec![Duration::from_secs(1)]);
}

#[tokio::test]
async fn test_persistently_rejected_command_gives_up() {
    let script = Script::online(parked_snapshot(5.0, true));
    for _ in 0..5 {
        script.queue_reply(false, "busy");
    }
    let h = Harness::new(script);

    let outcome = h.invoke(Some("off")).await;

    // one command per attempt, never more
    assert_eq!(outcome, Outcome::error("Command failed: busy"));
    assert_eq!(h.script.commands(), vec![false; 5]);
    assert_eq!(
        h.clock.sleeps(),
        [1, 2, 4, 8, 16].map(Duration::from_secs).to_vec()
    );
}

#[tokio::test]
async fn test_missing_secrets_fail_without_retry() {
    let store = secret_store();
    let mut values = vec![];
    for name in ["client_id", "client_secret", "refresh_token", "private_key"] {
        values.push((name, store.value(name).unwrap()));
    }
    let h = Harness::with(
        Script::online(parked_snapshot(5.0, true)),
        MemorySecretStore::new(values),
        FakeTokenProvider::default(),
    );

    let outcome = h.invoke(Some("off")).await;

    assert_eq!(outcome.status, OutcomeStatus::Error);
    assert!(outcome.detail.contains(VIN));
    assert_eq!(h.script.calls.total(), 0);
    assert!(h.clock.sleeps().is_empty());
}

#[tokio::test]
async fn test_signing_key_is_staged_then_removed() {
    let h = Harness::new(Script::online(parked_snapshot(5.0, true)));

    h.invoke(Some("off")).await;

    let keys = h.script.signing_keys();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].1, PEM);
    assert!(keys[0].0.starts_with(h.scratch.path()));
    assert!(!keys[0].0.exists());
    assert_eq!(h.staged_files_left(), 0);
}

#[tokio::test]
async fn test_rotated_refresh_token_is_persisted() {
    let h = Harness::with(
        Script::online(parked_snapshot(5.0, true)),
        secret_store(),
        FakeTokenProvider::rotating("refresh-2"),
    );

    let outcome = h.invoke(Some("off")).await;

    assert_eq!(outcome.status, OutcomeStatus::Success);
    assert_eq!(h.store.value(REFRESH_TOKEN).as_deref(), Some("refresh-2"));
}

#[tokio::test]
async fn test_rotation_write_failure_is_not_fatal() {
    let h = Harness::with(
        Script::online(parked_snapshot(5.0, true)),
        secret_store().with_failing_writes(),
        FakeTokenProvider::rotating("refresh-2"),
    );

    let outcome = h.invoke(Some("off")).await;

    assert_eq!(outcome, Outcome::success(TargetState::Off));
    assert_eq!(h.store.value(REFRESH_TOKEN).as_deref(), Some("refresh-1"));
}
