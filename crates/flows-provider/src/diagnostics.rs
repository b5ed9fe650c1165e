//! User-facing diagnostics

use flows_core::{EntityKind, FlowsError, Intent};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    /// Attribute the diagnostic points at, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.attribute {
            Some(attribute) => write!(f, "{} ({}): {}", self.summary, attribute, self.detail),
            None => write!(f, "{}: {}", self.summary, self.detail),
        }
    }
}

/// Ordered collection of errors and warnings for one operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Severity::Error, summary.into(), detail.into(), None);
    }

    pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Severity::Warning, summary.into(), detail.into(), None);
    }

    pub fn add_attribute_error(
        &mut self,
        attribute: &str,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) {
        self.push(
            Severity::Error,
            summary.into(),
            detail.into(),
            Some(attribute.to_string()),
        );
    }

    /// Generic request failure: `"{action}, got error: {err}"`.
    pub fn add_client_error(&mut self, action: &str, err: &FlowsError) {
        self.add_error("Client Error", format!("{}, got error: {}", action, err));
    }

    /// Report an error from a confirm or delete wait.
    ///
    /// Settlement failures get a summary naming the entity kind and what was
    /// being waited for; anything else is a client error.
    pub fn add_settlement_error(
        &mut self,
        kind: EntityKind,
        intent: Intent,
        action: &str,
        err: &FlowsError,
    ) {
        let phase = match intent {
            Intent::Confirmation => "Confirmation",
            Intent::Deletion => "Deletion",
        };

        let summary = match err {
            FlowsError::TerminalStatus { .. } => format!("{} {} Failed", kind, phase),
            FlowsError::UnknownStatus { .. } => format!("Unknown {} Status", kind),
            FlowsError::Timeout { .. } => format!("{} {} Timeout", kind, phase),
            FlowsError::Cancelled { .. } => format!("{} {} Cancelled", kind, phase),
            _ => return self.add_client_error(action, err),
        };

        self.add_error(summary, err.to_string());
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push(
        &mut self,
        severity: Severity,
        summary: String,
        detail: String,
        attribute: Option<String>,
    ) {
        self.0.push(Diagnostic {
            severity,
            summary,
            detail,
            attribute,
        });
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flows_core::{EntityStatus, Expectation};
    use std::time::Duration;

    #[test]
    fn test_settlement_summaries() {
        let mut diags = Diagnostics::new();
        let terminal = FlowsError::TerminalStatus {
            kind: EntityKind::Entity,
            id: "e-1".into(),
            status: EntityStatus::Failed,
            expected: Expectation::Ready,
        };
        let timeout = FlowsError::Timeout {
            kind: EntityKind::AppInstallation,
            id: "ai-1".into(),
            expected: Expectation::Deleted,
            last_status: Some(EntityStatus::Draining),
            waited: Duration::from_secs(300),
        };
        let unknown = FlowsError::UnknownStatus {
            kind: EntityKind::AppInstallation,
            id: "ai-1".into(),
            status: EntityStatus::parse("bogus"),
            expected: Expectation::Ready,
        };

        diags.add_settlement_error(EntityKind::Entity, Intent::Confirmation, "x", &terminal);
        diags.add_settlement_error(EntityKind::AppInstallation, Intent::Deletion, "x", &timeout);
        diags.add_settlement_error(EntityKind::AppInstallation, Intent::Confirmation, "x", &unknown);

        let summaries: Vec<_> = diags.iter().map(|d| d.summary.as_str()).collect();
        assert_eq!(
            summaries,
            [
                "Entity Confirmation Failed",
                "App Installation Deletion Timeout",
                "Unknown App Installation Status",
            ]
        );
    }

    #[test]
    fn test_non_settlement_errors_are_client_errors() {
        let mut diags = Diagnostics::new();
        diags.add_settlement_error(
            EntityKind::Entity,
            Intent::Confirmation,
            "Unable to confirm entity",
            &FlowsError::Api("forbidden".into()),
        );

        let diag = diags.errors().next().unwrap();
        assert_eq!(diag.summary, "Client Error");
        assert_eq!(diag.detail, "Unable to confirm entity, got error: forbidden");
    }

    #[test]
    fn test_warnings_are_not_errors() {
        let mut diags = Diagnostics::new();
        diags.add_warning("Flow Changes Planned", "+ block");
        assert!(!diags.has_error());
        assert_eq!(diags.warnings().count(), 1);
    }
}
