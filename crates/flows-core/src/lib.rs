//! Flows status settlement
//!
//! Entities managed by the Flows control plane (flows, entity lifecycles,
//! app installations) move through a small set of lifecycle statuses. This
//! crate decides what those statuses mean and waits for them to settle.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │          flows-provider / flows CLI              │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 flows-core                       │
//! │  ┌──────────────┐  ┌──────────────────────────┐ │
//! │  │   confirm    │  │     wait_for_deleted     │ │
//! │  └──────┬───────┘  └────────────┬─────────────┘ │
//! │  ┌──────▼───────────────────────▼─────────────┐ │
//! │  │     Poller (60 attempts × 5s, cancel)      │ │
//! │  └──────────────────┬─────────────────────────┘ │
//! │  ┌──────────────────▼─────────────────────────┐ │
//! │  │     Intent::classify (status tables)       │ │
//! │  └────────────────────────────────────────────┘ │
//! └─────────────────┬───────────────────────────────┘
//!                   │ trait StatusSource / Confirmable
//! ┌─────────────────▼───────────────────────────────┐
//! │                  flows-api                       │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod confirm;
pub mod delete;
pub mod error;
pub mod poll;
pub mod status;

// Re-exports
pub use confirm::{
    Confirmable, Confirmation, StatusSource, confirm, confirm_with_status, issue_confirm,
    wait_until_ready,
};
pub use delete::wait_for_deleted;
pub use error::{FlowsError, Result};
pub use poll::{
    CancelHandle, CancelSignal, FailureReason, PollOutcome, Poller, RETRY_BUDGET, RetryBudget,
    Sleeper, Target, TokioSleeper, cancellation,
};
pub use status::{EntityKind, EntityStatus, Expectation, Intent, Verdict, classify};
