//! Handler results

use crate::diagnostics::Diagnostics;
use flows_core::FlowsError;

/// What a handler did to the stored state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State<M> {
    /// Leave the prior state as it was
    Unchanged,
    /// Store this model
    Recorded(M),
    /// Forget the resource
    Removed,
}

/// State change plus diagnostics produced by one handler call
///
/// A later failure does not undo an earlier `record`, so an id assigned
/// before a failing step is kept and the next run can resume from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<M> {
    pub state: State<M>,
    pub diagnostics: Diagnostics,
}

impl<M> Default for Response<M> {
    fn default() -> Self {
        Self {
            state: State::Unchanged,
            diagnostics: Diagnostics::default(),
        }
    }
}

impl<M> Response<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(model: M) -> Self {
        Self {
            state: State::Recorded(model),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn removed() -> Self {
        Self {
            state: State::Removed,
            diagnostics: Diagnostics::default(),
        }
    }

    /// A response with a single error diagnostic and no state change
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        let mut response = Self::default();
        response.diagnostics.add_error(summary, detail);
        response
    }

    pub fn client_error(action: &str, err: &FlowsError) -> Self {
        let mut response = Self::default();
        response.diagnostics.add_client_error(action, err);
        response
    }

    pub fn record(&mut self, model: M) {
        self.state = State::Recorded(model);
    }

    pub fn remove(&mut self) {
        self.state = State::Removed;
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }

    /// The recorded model, if any
    pub fn model(&self) -> Option<&M> {
        match &self.state {
            State::Recorded(model) => Some(model),
            _ => None,
        }
    }

    pub fn is_removed(&self) -> bool {
        matches!(self.state, State::Removed)
    }

    /// Convert a recorded model, keeping diagnostics as they are.
    pub fn map<N>(self, f: impl FnOnce(M) -> N) -> Response<N> {
        let state = match self.state {
            State::Unchanged => State::Unchanged,
            State::Recorded(model) => State::Recorded(f(model)),
            State::Removed => State::Removed,
        };
        Response {
            state,
            diagnostics: self.diagnostics,
        }
    }
}
