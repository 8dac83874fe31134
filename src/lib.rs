//! Classification and session reconciliation for AI-generated equipment
//! designs, plus a blocking client for the design backend.

pub mod api;
pub mod cli;
pub mod design;
pub mod report;
pub mod session;
pub mod trace;

pub use api::auth::AuthSession;
pub use api::client::{DesignApi, HttpBackend};
pub use api::error::ApiError;
pub use design::classifier::{classify, classify_result};
pub use design::design_model::{DesignResult, ModelType, SavedDesign, Stats};
pub use session::reconciler::DesignSession;
