//! Integration tests for the sentry toggle agent

mod test_decision;
mod test_orchestrator;
mod test_wake;
