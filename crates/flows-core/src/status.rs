//! Entity status vocabulary and classification
//!
//! The control plane reports one of a fixed set of lifecycle strings for
//! every entity. The same string can mean opposite things depending on
//! what the caller is waiting for: `draining` is a failure while waiting
//! for an entity to become ready, but the expected path while waiting for
//! it to be deleted. [`Intent::classify`] holds both tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status reported by the control plane
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityStatus {
    /// Created but not confirmed yet
    Draft,
    /// Confirmation accepted, the server is still working
    InProgress,
    /// Fully applied
    Ready,
    /// The server gave up applying the entity
    Failed,
    /// Remote resources diverged from the declared configuration
    Drifted,
    /// Being torn down
    Draining,
    /// Tear-down failed
    DrainingFailed,
    /// Torn down, record not yet removed
    Drained,
    /// Anything outside the known vocabulary (kept verbatim)
    Unrecognized(String),
}

impl EntityStatus {
    /// Parse a wire string. Matching is exact and case-sensitive.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "draft" => Self::Draft,
            "in_progress" => Self::InProgress,
            "ready" => Self::Ready,
            "failed" => Self::Failed,
            "drifted" => Self::Drifted,
            "draining" => Self::Draining,
            "draining_failed" => Self::DrainingFailed,
            "drained" => Self::Drained,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "draft",
            Self::InProgress => "in_progress",
            Self::Ready => "ready",
            Self::Failed => "failed",
            Self::Drifted => "drifted",
            Self::Draining => "draining",
            Self::DrainingFailed => "draining_failed",
            Self::Drained => "drained",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl From<String> for EntityStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for EntityStatus {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<EntityStatus> for String {
    fn from(status: EntityStatus) -> Self {
        match status {
            EntityStatus::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a single observation affects a polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The wait is over and the operation succeeded
    Ready,
    /// Keep polling
    Transitional,
    /// A named status that rules out the expected outcome
    TerminalFailure,
    /// Status outside the vocabulary
    Unknown,
}

/// What the caller is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Waiting for a confirmed entity to become `ready`
    Confirmation,
    /// Waiting for a deleted entity to disappear
    Deletion,
}

impl Intent {
    /// Classify an observed status for this intent.
    pub fn classify(self, status: &EntityStatus) -> Verdict {
        use EntityStatus::*;

        match (self, status) {
            (_, Unrecognized(_)) => Verdict::Unknown,

            (Intent::Confirmation, Ready) => Verdict::Ready,
            (Intent::Confirmation, Draft | InProgress) => Verdict::Transitional,
            (Intent::Confirmation, Failed | Drifted | DrainingFailed | Draining | Drained) => {
                Verdict::TerminalFailure
            }

            (Intent::Deletion, Draining) => Verdict::Transitional,
            (Intent::Deletion, Drained) => Verdict::Ready,
            (
                Intent::Deletion,
                Draft | InProgress | Ready | Failed | Drifted | DrainingFailed,
            ) => Verdict::TerminalFailure,
        }
    }

    /// Verdict for an entity that no longer exists, if the intent accepts it.
    ///
    /// Only deletion treats absence as an answer; everywhere else a
    /// "not found" response is an ordinary error.
    pub fn on_absent(self) -> Option<Verdict> {
        match self {
            Intent::Confirmation => None,
            Intent::Deletion => Some(Verdict::Ready),
        }
    }

    /// The outcome this intent is waiting for
    pub fn expectation(self) -> Expectation {
        match self {
            Intent::Confirmation => Expectation::Ready,
            Intent::Deletion => Expectation::Deleted,
        }
    }
}

/// Classify a status with the confirmation table.
pub fn classify(status: &EntityStatus) -> Verdict {
    Intent::Confirmation.classify(status)
}

/// Expected end state, used in failure messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Ready,
    Deleted,
}

impl Expectation {
    /// Adjective for timeout messages ("settled state", "deleted state")
    pub fn state_word(self) -> &'static str {
        match self {
            Expectation::Ready => "settled",
            Expectation::Deleted => "deleted",
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Ready => write!(f, "\"ready\""),
            Expectation::Deleted => write!(f, "being deleted"),
        }
    }
}

/// Kind of server-managed object, used for log fields and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Entity,
    EntityLifecycle,
    AppInstallation,
}

impl EntityKind {
    /// Human-readable name that keeps lifecycles apart from plain entities
    pub const fn title(self) -> &'static str {
        match self {
            EntityKind::Entity => "Entity",
            EntityKind::EntityLifecycle => "Entity Lifecycle",
            EntityKind::AppInstallation => "App Installation",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Entity | EntityKind::EntityLifecycle => write!(f, "Entity"),
            EntityKind::AppInstallation => write!(f, "App Installation"),
        }
    }
}
