//! Error taxonomy shared by every Flows crate

use crate::status::{EntityKind, EntityStatus, Expectation};
use std::time::Duration;
use thiserror::Error;

/// Error message the control plane returns for missing records
pub const NOT_FOUND_MESSAGE: &str = "not found";

/// Suffix of the error returned when confirming something that already left draft
pub const NOT_A_DRAFT_SUFFIX: &str = "is not a draft";

/// Flows errors
#[derive(Error, Debug)]
pub enum FlowsError {
    /// The record does not exist (anymore)
    #[error("not found")]
    NotFound,

    /// Error message carried in the response envelope
    #[error("{0}")]
    Api(String),

    /// Network or HTTP-layer failure
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("unexpected status code: {0}")]
    UnexpectedStatusCode(u16),

    #[error("could not json-decode response: {message}; response: {body}")]
    Decode { message: String, body: String },

    /// A named status ruled out the expected outcome
    #[error("{kind} {id:?} reached status \"{status}\" instead of {expected}")]
    TerminalStatus {
        kind: EntityKind,
        id: String,
        status: EntityStatus,
        expected: Expectation,
    },

    /// A status outside the known vocabulary
    #[error("{kind} {id} has unknown status \"{status}\"")]
    UnknownStatus {
        kind: EntityKind,
        id: String,
        status: EntityStatus,
        expected: Expectation,
    },

    /// Retry budget exhausted while still transitional
    #[error(
        "{kind} {id} did not reach a {} state within {}, last status was {}",
        .expected.state_word(),
        human_duration(.waited),
        describe_status(.last_status)
    )]
    Timeout {
        kind: EntityKind,
        id: String,
        expected: Expectation,
        last_status: Option<EntityStatus>,
        waited: Duration,
    },

    #[error("waiting for {kind} {id} was cancelled, last status was {}", describe_status(.last_status))]
    Cancelled {
        kind: EntityKind,
        id: String,
        last_status: Option<EntityStatus>,
    },
}

impl FlowsError {
    /// Build an error from an envelope message, recognizing the not-found sentinel.
    pub fn from_api_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message == NOT_FOUND_MESSAGE {
            FlowsError::NotFound
        } else {
            FlowsError::Api(message)
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FlowsError::NotFound)
    }

    /// Whether this is the confirm race where the entity already left draft.
    ///
    /// Matches server wording such as "app installation is not a draft".
    pub fn is_not_a_draft(&self) -> bool {
        match self {
            FlowsError::Api(message) => message.trim_end().ends_with(NOT_A_DRAFT_SUFFIX),
            _ => false,
        }
    }
}

fn describe_status(status: &Option<EntityStatus>) -> String {
    match status {
        Some(status) => format!("\"{}\"", status),
        None => "unknown".to_string(),
    }
}

fn human_duration(duration: &Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        let minutes = secs / 60;
        if minutes == 1 {
            "1 minute".to_string()
        } else {
            format!("{} minutes", minutes)
        }
    } else {
        format!("{} seconds", secs)
    }
}

pub type Result<T> = std::result::Result<T, FlowsError>;
