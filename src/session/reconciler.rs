use crate::{
    api::{
        auth::{AuthSession, require},
        client::DesignApi,
        error::ApiError,
    },
    design::{
        classifier::DEFAULT_MODEL,
        design_model::{AnalyzeOutcome, DesignResult, ModelType, SavedDesign},
    },
    session::{
        session_model::{Applied, GenerateOutcome, Selection, SessionState},
        slots::{RequestSlots, Slot, Ticket},
    },
    trace::{logger::TraceLogger, trace::TraceEvent},
};

/// Keeps the single "currently displayed" design consistent with the
/// backend's list of saved designs.
///
/// Reads (`refresh`, `select`) come in two halves: `begin_*` stamps the
/// request with a [`Ticket`], `finish_*` applies the response only if that
/// ticket is still the latest for its slot. The one-shot methods do both
/// around a blocking call to the backend.
pub struct DesignSession<A: DesignApi> {
    api: A,
    auth: Option<AuthSession>,
    designs: Vec<SavedDesign>,
    selection: Selection,
    state: SessionState,
    resume_state: SessionState,
    slots: RequestSlots,
    tracer: TraceLogger,
    step: u64,
}

impl<A: DesignApi> DesignSession<A> {
    pub fn new(api: A, auth: Option<AuthSession>) -> Self {
        Self {
            api,
            auth,
            designs: Vec::new(),
            selection: Selection::default(),
            state: SessionState::Empty,
            resume_state: SessionState::Empty,
            slots: RequestSlots::new(),
            tracer: TraceLogger::disabled(),
            step: 0,
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn current_model(&self) -> Option<ModelType> {
        self.selection.current_model
    }

    /// Cached saved designs, newest first, as of the last successful list fetch.
    pub fn designs(&self) -> &[SavedDesign] {
        &self.designs
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn auth(&self) -> Option<&AuthSession> {
        self.auth.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        require(self.auth.as_ref()).is_ok()
    }

    pub fn login(&mut self, auth: AuthSession) {
        self.auth = Some(auth);
        self.trace(TraceEvent::now(self.step, self.state, "login"));
    }

    /// Drop the auth session and every piece of session state.
    pub fn logout(&mut self) {
        self.auth = None;
        self.designs.clear();
        self.selection = Selection::default();
        self.state = SessionState::Empty;
        self.resume_state = SessionState::Empty;
        self.slots.invalidate_all();
        self.trace(TraceEvent::now(self.step, self.state, "logout"));
    }

    /// Clear what is displayed without touching the cached list.
    pub fn new_draft(&mut self) {
        self.selection = Selection::default();
        self.set_display_state(SessionState::Empty);
        self.slots.invalidate(Slot::DesignDetail);
        self.trace(TraceEvent::now(self.step, self.state, "new_draft"));
    }

    // ========================================================================
    // List
    // ========================================================================

    pub fn refresh(&mut self) -> Result<Applied, ApiError> {
        let ticket = self.begin_refresh()?;
        let response = self.api.list(require(self.auth.as_ref())?);
        self.finish_refresh(ticket, response)
    }

    pub fn begin_refresh(&mut self) -> Result<Ticket, ApiError> {
        require(self.auth.as_ref())?;
        Ok(self.slots.begin(Slot::DesignList))
    }

    /// Apply a list response. Replaces the cached list and, when nothing is
    /// displayed, auto-selects the newest entry.
    pub fn finish_refresh(
        &mut self,
        ticket: Ticket,
        response: Result<Vec<SavedDesign>, ApiError>,
    ) -> Result<Applied, ApiError> {
        if !self.slots.is_current(&ticket) {
            self.trace(TraceEvent::now(self.step, self.state, "refresh").with_outcome("stale"));
            return Ok(Applied::Stale);
        }

        let designs = match response {
            Ok(designs) => designs,
            Err(e) => {
                self.trace(TraceEvent::now(self.step, self.state, "refresh").with_outcome(&e));
                return Err(e);
            }
        };

        let len = designs.len();
        self.designs = designs;

        if self.selection.is_empty() && self.state != SessionState::Generating {
            match self.designs.first() {
                Some(newest) => {
                    self.selection = Selection::from_saved(newest);
                    self.state = SessionState::Loaded;
                }
                None => self.state = SessionState::Empty,
            }
        }

        let event = TraceEvent::now(self.step, self.state, "refresh")
            .with_outcome("applied")
            .with_list_len(len);
        self.trace_selection(event);
        Ok(Applied::Current)
    }

    // ========================================================================
    // Detail
    // ========================================================================

    pub fn select(&mut self, id: &str) -> Result<Applied, ApiError> {
        let ticket = self.begin_select()?;
        let response = self.api.get(require(self.auth.as_ref())?, id);
        self.finish_select(ticket, id, response)
    }

    pub fn begin_select(&mut self) -> Result<Ticket, ApiError> {
        require(self.auth.as_ref())?;
        Ok(self.slots.begin(Slot::DesignDetail))
    }

    /// Replace the displayed design with the fetched detail of `id`.
    pub fn finish_select(
        &mut self,
        ticket: Ticket,
        id: &str,
        response: Result<DesignResult, ApiError>,
    ) -> Result<Applied, ApiError> {
        if !self.slots.is_current(&ticket) {
            self.trace(TraceEvent::now(self.step, self.state, "select").with_outcome("stale"));
            return Ok(Applied::Stale);
        }

        let result = match response {
            Ok(result) => result,
            Err(e) => {
                self.trace(TraceEvent::now(self.step, self.state, "select").with_outcome(&e));
                return Err(e);
            }
        };

        // The detail endpoint carries no prompt; it lives on the list entry.
        let prompt = self
            .designs
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.prompt.clone())
            .unwrap_or_default();

        self.selection = Selection::from_result(Some(id.to_string()), &prompt, result);
        self.set_display_state(SessionState::Viewing);

        let event = TraceEvent::now(self.step, self.state, "select").with_outcome("applied");
        self.trace_selection(event);
        Ok(Applied::Current)
    }

    // ========================================================================
    // Generate
    // ========================================================================

    /// Submit `prompt` for analysis, display the result, then refresh the
    /// list and display its newest entry.
    pub fn generate(&mut self, prompt: &str) -> Result<GenerateOutcome, ApiError> {
        let prompt = self.begin_generate(prompt)?;
        let response = self.api.analyze(require(self.auth.as_ref())?, &prompt);
        self.finish_generate(&prompt, response)
    }

    /// Validate the prompt and session and enter `Generating`. Returns the
    /// trimmed prompt to send. Fails without any state change.
    ///
    /// While a generate is in flight the session stays `Generating`; selects,
    /// deletes and drafts still replace the display and record the state the
    /// session falls back to if the analysis fails.
    pub fn begin_generate(&mut self, prompt: &str) -> Result<String, ApiError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ApiError::EmptyPrompt);
        }
        require(self.auth.as_ref())?;

        if self.state != SessionState::Generating {
            self.resume_state = self.state;
        }
        self.state = SessionState::Generating;
        self.trace(TraceEvent::now(self.step, self.state, "generate").with_outcome("submitted"));
        Ok(prompt.to_string())
    }

    pub fn finish_generate(
        &mut self,
        prompt: &str,
        response: Result<AnalyzeOutcome, ApiError>,
    ) -> Result<GenerateOutcome, ApiError> {
        let outcome = match response {
            Ok(outcome) => outcome,
            Err(e) => {
                self.state = self.resume_state;
                self.trace(TraceEvent::now(self.step, self.state, "generate").with_outcome(&e));
                return Err(e);
            }
        };

        self.selection = Selection::from_result(outcome.design_id.clone(), prompt, outcome.result);
        self.state = SessionState::Loaded;
        // A detail response still in flight belongs to the old selection.
        self.slots.invalidate(Slot::DesignDetail);

        let event = TraceEvent::now(self.step, self.state, "generate").with_outcome("analyzed");
        self.trace_selection(event);

        let list_refreshed = match self.refresh_after_write() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("design list refresh after generate failed: {}", e);
                false
            }
        };

        Ok(GenerateOutcome {
            model: self.selection.current_model.unwrap_or(DEFAULT_MODEL),
            design_id: self.selection.selected_id.clone(),
            list_refreshed,
        })
    }

    /// Identity is assigned server-side, so after a write the newest list
    /// entry is displayed rather than the analyze response.
    fn refresh_after_write(&mut self) -> Result<(), ApiError> {
        let ticket = self.slots.begin(Slot::DesignList);
        let designs = self.api.list(require(self.auth.as_ref())?)?;

        if !self.slots.is_current(&ticket) {
            return Ok(());
        }

        self.designs = designs;
        if let Some(newest) = self.designs.first() {
            self.selection = Selection::from_saved(newest);
            self.state = SessionState::Loaded;
        }

        let event = TraceEvent::now(self.step, self.state, "refresh_after_write")
            .with_list_len(self.designs.len());
        self.trace_selection(event);
        Ok(())
    }

    // ========================================================================
    // Delete
    // ========================================================================

    /// Delete a saved design on the backend. Clears the display only when the
    /// deleted design is the one shown. A failed delete changes nothing.
    pub fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        let auth = require(self.auth.as_ref())?;

        if let Err(e) = self.api.delete(auth, id) {
            self.trace(TraceEvent::now(self.step, self.state, "delete").with_outcome(&e));
            return Err(e);
        }

        self.designs.retain(|d| d.id != id);

        if self.selection.is_selected(id) {
            self.selection = Selection::default();
            self.set_display_state(SessionState::Empty);
            self.slots.invalidate(Slot::DesignDetail);
        }

        self.trace(
            TraceEvent::now(self.step, self.state, "delete")
                .with_outcome("deleted")
                .with_list_len(self.designs.len()),
        );
        Ok(())
    }

    /// Set the state that describes the current display. During a generate
    /// this only moves the fallback for a failed analysis.
    fn set_display_state(&mut self, state: SessionState) {
        if self.state == SessionState::Generating {
            self.resume_state = state;
        } else {
            self.state = state;
        }
    }

    // ========================================================================
    // Tracing
    // ========================================================================

    fn trace_selection(&mut self, event: TraceEvent) {
        let mut event = event.with_selection(
            self.selection.selected_id.as_deref(),
            self.selection.current_model,
        );
        if let Some(result) = &self.selection.result {
            event = event.with_fingerprint(result.fingerprint());
        }
        self.trace(event);
    }

    fn trace(&mut self, event: TraceEvent) {
        self.tracer.log(&event);
        self.step += 1;
    }
}
