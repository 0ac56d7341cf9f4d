//! Invocation input

use serde::{Deserialize, Serialize};

/// Input event of one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationEvent {
    /// Desired Sentry Mode state, "on" when absent
    #[serde(default)]
    pub sentry: Option<String>,
}

impl InvocationEvent {
    pub fn new(sentry: impl Into<String>) -> Self {
        Self {
            sentry: Some(sentry.into()),
        }
    }
}
