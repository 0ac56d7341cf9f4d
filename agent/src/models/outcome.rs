//! Invocation outcome models

use serde::{Deserialize, Serialize};

use crate::models::vehicle::TargetState;

/// Final status of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeStatus {
    Success,
    Skipped,
    Error,
}

/// The sole value returned by an invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub status: OutcomeStatus,

    /// Human readable reason, or the achieved state on success
    pub detail: String,

    /// Achieved Sentry Mode state, only set on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentry_mode: Option<TargetState>,
}

impl Outcome {
    pub fn success(state: TargetState) -> Self {
        Self {
            status: OutcomeStatus::Success,
            detail: state.to_string(),
            sentry_mode: Some(state),
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Skipped,
            detail: reason.into(),
            sentry_mode: None,
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Error,
            detail: reason.into(),
            sentry_mode: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == OutcomeStatus::Error
    }
}
