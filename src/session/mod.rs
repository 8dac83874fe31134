pub mod reconciler;
pub mod session_model;
pub mod slots;
