use crate::design::classifier::classify_result;
use crate::design::design_model::{DesignResult, ModelType, SavedDesign, Stats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing displayed
    Empty,
    /// Newest saved design auto-selected after a list fetch
    Loaded,
    /// Analyze request in flight
    Generating,
    /// User picked a saved design explicitly
    Viewing,
}

/// What the viewer currently displays. Always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub selected_id: Option<String>,
    pub current_model: Option<ModelType>,
    pub stats: Stats,
    pub prompt: String,
    pub result: Option<DesignResult>,
}

impl Selection {
    pub fn from_result(id: Option<String>, prompt: &str, result: DesignResult) -> Self {
        Self {
            selected_id: id,
            current_model: Some(classify_result(&result)),
            stats: result.stats,
            prompt: prompt.to_string(),
            result: Some(result),
        }
    }

    pub fn from_saved(design: &SavedDesign) -> Self {
        Self::from_result(Some(design.id.clone()), &design.prompt, design.result.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.selected_id.is_none() && self.result.is_none()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_id.as_deref() == Some(id)
    }
}

/// Whether a completed read was applied to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    /// A newer request for the same slot was started; the response was dropped
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOutcome {
    pub model: ModelType,
    pub design_id: Option<String>,
    /// False when the follow-up list fetch failed; the analyze result is still displayed.
    pub list_refreshed: bool,
}
