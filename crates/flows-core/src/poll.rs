//! Bounded status polling
//!
//! A [`Poller`] repeatedly asks a caller-supplied fetch function for the
//! current status of one entity and classifies every answer with an
//! [`Intent`]. The loop stops on the first non-transitional answer, on the
//! first request error, when the retry budget runs out, or when the
//! optional cancel signal fires.

use crate::error::{FlowsError, Result};
use crate::status::{EntityKind, EntityStatus, Intent, Verdict};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Attempt count and spacing for every settlement wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl RetryBudget {
    /// Upper bound on time spent sleeping in one loop
    pub fn worst_case(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

/// 60 attempts, 5 seconds apart (5 minutes)
pub const RETRY_BUDGET: RetryBudget = RetryBudget {
    max_attempts: 60,
    interval: Duration::from_secs(5),
};

/// Sleep primitive used between attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Create a connected cancel handle/signal pair.
pub fn cancellation() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle(Arc::new(tx)), CancelSignal(rx))
}

/// Fires a [`CancelSignal`]
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<watch::Sender<bool>>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

/// Observed by a [`Poller`] while it sleeps between attempts
#[derive(Debug, Clone)]
pub struct CancelSignal(watch::Receiver<bool>);

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once cancelled. Never resolves if the handle is dropped first.
    pub async fn cancelled(&self) {
        let mut rx = self.0.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// The entity a poll loop is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub kind: EntityKind,
    pub id: String,
}

impl Target {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Why a loop ended in failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// A named status that rules out the expected outcome
    Terminal,
    /// A status outside the vocabulary
    Unrecognized,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Terminal => {
                write!(f, "reached terminal status instead of expected outcome")
            }
            FailureReason::Unrecognized => write!(f, "unrecognized status"),
        }
    }
}

/// Result of one poll loop
#[derive(Debug)]
pub enum PollOutcome {
    /// The expected status was reached
    Settled(EntityStatus),
    /// The entity disappeared (only produced for [`Intent::Deletion`])
    Removed,
    Failed {
        status: EntityStatus,
        reason: FailureReason,
    },
    /// Budget exhausted while still transitional
    TimedOut { last_status: Option<EntityStatus> },
    /// The fetch itself failed; never retried
    TransportError(FlowsError),
    Cancelled { last_status: Option<EntityStatus> },
}

impl PollOutcome {
    /// Convert into a typed result. `Ok(None)` means the entity is gone.
    pub fn into_result(self, target: &Target, intent: Intent) -> Result<Option<EntityStatus>> {
        let expected = intent.expectation();
        match self {
            PollOutcome::Settled(status) => Ok(Some(status)),
            PollOutcome::Removed => Ok(None),
            PollOutcome::Failed {
                status,
                reason: FailureReason::Terminal,
            } => Err(FlowsError::TerminalStatus {
                kind: target.kind,
                id: target.id.clone(),
                status,
                expected,
            }),
            PollOutcome::Failed {
                status,
                reason: FailureReason::Unrecognized,
            } => Err(FlowsError::UnknownStatus {
                kind: target.kind,
                id: target.id.clone(),
                status,
                expected,
            }),
            PollOutcome::TimedOut { last_status } => Err(FlowsError::Timeout {
                kind: target.kind,
                id: target.id.clone(),
                expected,
                last_status,
                waited: RETRY_BUDGET.worst_case(),
            }),
            PollOutcome::TransportError(err) => Err(err),
            PollOutcome::Cancelled { last_status } => Err(FlowsError::Cancelled {
                kind: target.kind,
                id: target.id.clone(),
                last_status,
            }),
        }
    }
}

/// Drives bounded status polling
#[derive(Clone)]
pub struct Poller {
    sleeper: Arc<dyn Sleeper>,
    cancel: Option<CancelSignal>,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new()
    }
}

impl Poller {
    pub fn new() -> Self {
        Self::with_sleeper(Arc::new(TokioSleeper))
    }

    pub fn with_sleeper(sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            sleeper,
            cancel: None,
        }
    }

    /// Abort the wait between attempts when `signal` fires.
    pub fn with_cancel(mut self, signal: CancelSignal) -> Self {
        self.cancel = Some(signal);
        self
    }

    /// Poll `fetch` until `intent` is satisfied, fails, or the budget runs out.
    ///
    /// The first attempt happens immediately; later attempts are spaced by
    /// the budget interval. A `NotFound` error ends the loop successfully
    /// only when the intent accepts absence.
    pub async fn poll<F, Fut>(&self, target: &Target, intent: Intent, mut fetch: F) -> PollOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<EntityStatus>>,
    {
        let budget = RETRY_BUDGET;
        let mut last_status: Option<EntityStatus> = None;

        for attempt in 1..=budget.max_attempts {
            if self.is_cancelled() {
                return PollOutcome::Cancelled { last_status };
            }

            let status = match fetch().await {
                Ok(status) => status,
                Err(err) if err.is_not_found() && intent.on_absent() == Some(Verdict::Ready) => {
                    tracing::debug!(
                        kind = %target.kind,
                        entity_id = %target.id,
                        attempt,
                        "Entity is gone"
                    );
                    return PollOutcome::Removed;
                }
                Err(err) => return PollOutcome::TransportError(err),
            };

            tracing::debug!(
                kind = %target.kind,
                entity_id = %target.id,
                status = %status,
                attempt,
                "Polled status"
            );

            match intent.classify(&status) {
                Verdict::Ready => return PollOutcome::Settled(status),
                Verdict::TerminalFailure => {
                    return PollOutcome::Failed {
                        status,
                        reason: FailureReason::Terminal,
                    };
                }
                Verdict::Unknown => {
                    return PollOutcome::Failed {
                        status,
                        reason: FailureReason::Unrecognized,
                    };
                }
                Verdict::Transitional => {}
            }

            last_status = Some(status);

            if attempt < budget.max_attempts && !self.pause(budget.interval).await {
                tracing::warn!(
                    kind = %target.kind,
                    entity_id = %target.id,
                    "Polling cancelled"
                );
                return PollOutcome::Cancelled { last_status };
            }
        }

        PollOutcome::TimedOut { last_status }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelSignal::is_cancelled)
    }

    /// Sleep for `interval`; returns false if cancelled meanwhile.
    async fn pause(&self, interval: Duration) -> bool {
        match &self.cancel {
            Some(signal) => {
                tokio::select! {
                    _ = self.sleeper.sleep(interval) => true,
                    _ = signal.cancelled() => false,
                }
            }
            None => {
                self.sleeper.sleep(interval).await;
                true
            }
        }
    }
}

/// Test doubles
#[cfg(any(test, feature = "test-util"))]
pub mod testing {
    use super::Sleeper;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Returns immediately and records every requested duration
    #[derive(Debug, Default)]
    pub struct RecordingSleeper {
        slept: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn count(&self) -> usize {
            self.slept.lock().map(|s| s.len()).unwrap_or(0)
        }

        pub fn durations(&self) -> Vec<Duration> {
            self.slept.lock().map(|s| s.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            if let Ok(mut slept) = self.slept.lock() {
                slept.push(duration);
            }
            tokio::task::yield_now().await;
        }
    }
}
