use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{design::design_model::ModelType, session::session_model::SessionState};

/// One line of the session trace. Records what the session did, never the
/// design content itself.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub state: String,
    pub operation: String,

    pub outcome: Option<String>,
    pub selected_id: Option<String>,
    pub model: Option<ModelType>,
    pub fingerprint: Option<String>,
    pub list_len: Option<usize>,
}

impl TraceEvent {
    pub fn now(step: u64, state: SessionState, operation: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            step,
            state: format!("{:?}", state),
            operation: operation.to_string(),
            outcome: None,
            selected_id: None,
            model: None,
            fingerprint: None,
            list_len: None,
        }
    }

    pub fn with_outcome(mut self, outcome: impl ToString) -> Self {
        self.outcome = Some(outcome.to_string());
        self
    }

    pub fn with_selection(mut self, id: Option<&str>, model: Option<ModelType>) -> Self {
        self.selected_id = id.map(|s| s.to_string());
        self.model = model;
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: String) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    pub fn with_list_len(mut self, len: usize) -> Self {
        self.list_len = Some(len);
        self
    }
}
