use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;

use chrono::{DateTime, Duration, Utc};

use crate::api::auth::AuthSession;
use crate::api::client::DesignApi;
use crate::api::error::ApiError;
use crate::design::design_model::{AnalyzeOutcome, DesignResult, SavedDesign, Stats};

/// Which endpoint a queued failure applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOp {
    Analyze,
    List,
    Get,
    Delete,
}

/// Failure to inject on the next call of an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum MockFailure {
    Unreachable,
    Rejected { status: u16, message: Option<String> },
}

impl MockFailure {
    fn into_error(self, op: MockOp) -> ApiError {
        match self {
            MockFailure::Unreachable => ApiError::NetworkFailure {
                context: format!("mock {:?}", op),
                source: Box::new(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "mock backend unreachable",
                )),
            },
            MockFailure::Rejected { status, message } => {
                ApiError::ServerRejected { status, message }
            }
        }
    }
}

type Responder = Box<dyn Fn(&str) -> DesignResult>;

#[derive(Default)]
struct MockState {
    designs: Vec<SavedDesign>,
    next_id: u64,
    clock: Option<DateTime<Utc>>,
    failures: VecDeque<(MockOp, MockFailure)>,
    calls: Vec<String>,
}

/// In-memory stand-in for the design backend. Assigns ids server-side, keeps
/// saved designs newest first, and records every call it receives.
pub struct MockDesignApi {
    token: String,
    responder: Responder,
    state: RefCell<MockState>,
}

impl MockDesignApi {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            responder: Box::new(echo_result),
            state: RefCell::new(MockState {
                next_id: 1,
                ..MockState::default()
            }),
        }
    }

    /// Use `responder` to produce the analysis result for each prompt.
    pub fn with_responder(mut self, responder: impl Fn(&str) -> DesignResult + 'static) -> Self {
        self.responder = Box::new(responder);
        self
    }

    /// Seed a saved design as if it had been created earlier.
    pub fn seed(&self, prompt: &str, result: DesignResult) -> String {
        self.persist(prompt, result)
    }

    pub fn fail_next(&self, op: MockOp, failure: MockFailure) {
        self.state.borrow_mut().failures.push_back((op, failure));
    }

    /// Calls received so far, e.g. `"list"`, `"get 3"`.
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn stored_ids(&self) -> Vec<String> {
        self.state
            .borrow()
            .designs
            .iter()
            .map(|d| d.id.clone())
            .collect()
    }

    fn persist(&self, prompt: &str, result: DesignResult) -> String {
        let mut state = self.state.borrow_mut();
        let id = state.next_id.to_string();
        state.next_id += 1;

        // Strictly increasing timestamps keep newest-first ordering unambiguous.
        let created_at = match state.clock {
            Some(prev) => prev + Duration::seconds(1),
            None => Utc::now(),
        };
        state.clock = Some(created_at);

        state.designs.insert(
            0,
            SavedDesign {
                id: id.clone(),
                name: result.name.clone(),
                prompt: prompt.to_string(),
                created_at,
                result,
            },
        );
        id
    }

    fn enter(&self, auth: &AuthSession, op: MockOp, call: String) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);

        if auth.token() != self.token {
            return Err(ApiError::Unauthenticated {
                message: Some("令牌无效".to_string()),
            });
        }

        if let Some(pos) = state.failures.iter().position(|(o, _)| *o == op) {
            if let Some((_, failure)) = state.failures.remove(pos) {
                return Err(failure.into_error(op));
            }
        }
        Ok(())
    }
}

impl DesignApi for MockDesignApi {
    fn analyze(&self, auth: &AuthSession, prompt: &str) -> Result<AnalyzeOutcome, ApiError> {
        self.enter(auth, MockOp::Analyze, format!("analyze {}", prompt))?;
        let result = (self.responder)(prompt);
        let id = self.persist(prompt, result.clone());
        Ok(AnalyzeOutcome {
            result,
            design_id: Some(id),
        })
    }

    fn list(&self, auth: &AuthSession) -> Result<Vec<SavedDesign>, ApiError> {
        self.enter(auth, MockOp::List, "list".to_string())?;
        Ok(self.state.borrow().designs.clone())
    }

    fn get(&self, auth: &AuthSession, id: &str) -> Result<DesignResult, ApiError> {
        self.enter(auth, MockOp::Get, format!("get {}", id))?;
        self.state
            .borrow()
            .designs
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.result.clone())
            .ok_or_else(|| ApiError::ServerRejected {
                status: 404,
                message: Some("设计不存在".to_string()),
            })
    }

    fn delete(&self, auth: &AuthSession, id: &str) -> Result<(), ApiError> {
        self.enter(auth, MockOp::Delete, format!("delete {}", id))?;
        let mut state = self.state.borrow_mut();
        let before = state.designs.len();
        state.designs.retain(|d| d.id != id);
        if state.designs.len() == before {
            return Err(ApiError::ServerRejected {
                status: 404,
                message: Some("设计不存在".to_string()),
            });
        }
        Ok(())
    }
}

/// Default responder: names the design after the prompt and leaves the
/// category to the keyword rules.
fn echo_result(prompt: &str) -> DesignResult {
    DesignResult {
        equipment_type: String::new(),
        model_type: None,
        name: prompt.to_string(),
        description: format!("根据需求生成的设计方案：{}", prompt),
        stats: Stats::new(60, 60, 60, 60),
        design_suggestions: vec!["优化动力系统".to_string()],
        technical_specs: Default::default(),
        analysis: String::new(),
    }
}
