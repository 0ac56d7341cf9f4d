//! Retry envelope around one orchestration attempt
//!
//! The envelope is the only place that interprets retryability. An attempt
//! returns `Ok(outcome)` for anything it evaluated (success or skip) and a
//! [`ToggleError`] otherwise; the error's [`ToggleError::is_retryable`] tag
//! decides between backing off and giving up.

use std::future::Future;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::errors::ToggleError;
use crate::models::outcome::Outcome;
use crate::utils::{calc_exp_backoff, CooldownOptions};

/// Retry envelope options
#[derive(Debug, Clone)]
pub struct Options {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Backoff applied after each retryable failure
    pub cooldown: CooldownOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            cooldown: CooldownOptions::default(),
        }
    }
}

/// Runs an attempt until it completes, fails fatally, or the budget is spent
pub struct RetryEnvelope {
    options: Options,
    clock: Arc<dyn Clock>,
}

impl RetryEnvelope {
    pub fn new(options: Options, clock: Arc<dyn Clock>) -> Self {
        Self { options, clock }
    }

    /// Run `attempt`, always producing an [`Outcome`]
    pub async fn run<F, Fut>(&self, mut attempt: F) -> Outcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Outcome, ToggleError>>,
    {
        let max_attempts = self.options.max_attempts.max(1);
        let mut last_error = None;

        for attempt_no in 1..=max_attempts {
            match attempt().await {
                Ok(outcome) => return outcome,
                Err(e) if e.is_retryable() => {
                    let delay = calc_exp_backoff(&self.options.cooldown, attempt_no - 1);
                    warn!(
                        "Attempt {}/{} failed: {}. Backing off for {:?}...",
                        attempt_no, max_attempts, e, delay
                    );
                    last_error = Some(e);
                    self.clock.sleep(delay).await;
                }
                Err(e) => {
                    error!("Attempt {}/{} failed and cannot be retried: {}", attempt_no, max_attempts, e);
                    return Outcome::error(e.to_string());
                }
            }
        }

        let reason = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "retry budget exhausted".to_string());
        info!("Giving up after {} attempts: {}", max_attempts, reason);
        Outcome::error(reason)
    }
}
