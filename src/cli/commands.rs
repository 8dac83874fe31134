use std::time::Duration;

use crate::api::auth::{AuthSession, require};
use crate::api::client::{DesignApi, HttpBackend};
use crate::api::error::ApiError;
use crate::cli::config::Settings;
use crate::design::classifier::classify_with_rule;
use crate::design::demo::demo_designs;
use crate::design::design_model::ModelType;
use crate::report::console::{
    format_classification, format_demo_designs, format_design_list, format_selection,
};
use crate::session::reconciler::DesignSession;
use crate::trace::logger::TraceLogger;

// ============================================================================
// Session construction
// ============================================================================

pub fn build_backend(settings: &Settings) -> HttpBackend {
    HttpBackend::with_timeout(&settings.base_url, Duration::from_secs(settings.timeout_secs))
}

pub fn build_session(settings: &Settings) -> DesignSession<HttpBackend> {
    let auth = settings.token.as_deref().map(AuthSession::new);
    let tracer = match settings.trace_path.as_deref() {
        Some(path) => {
            let tracer = TraceLogger::new(path);
            if tracer.is_enabled() {
                log::info!("tracing session events to {}", path);
            }
            tracer
        }
        None => TraceLogger::disabled(),
    };
    DesignSession::new(build_backend(settings), auth).with_tracer(tracer)
}

// ============================================================================
// classify / demo (offline)
// ============================================================================

pub fn cmd_classify(name: &str, equipment_type: &str, hint: Option<&str>) -> String {
    let hint_model = hint.and_then(|h| {
        let parsed = ModelType::parse(h);
        if parsed.is_none() {
            log::warn!("ignoring unknown model type hint '{}'", h);
        }
        parsed
    });
    let (model, rule) = classify_with_rule(Some(name), Some(equipment_type), hint_model);
    format_classification(model, &rule)
}

pub fn cmd_demo() -> String {
    format_demo_designs(&demo_designs())
}

// ============================================================================
// list / show / generate / delete
// ============================================================================

/// Fetch the saved designs. Falls back to the example set when there are none.
pub fn cmd_list<A: DesignApi>(session: &mut DesignSession<A>) -> Result<String, ApiError> {
    session.refresh()?;

    let mut out = format_design_list(session.designs(), session.selection());
    if session.designs().is_empty() {
        out.push('\n');
        out.push_str(&cmd_demo());
    } else {
        out.push('\n');
        out.push_str(&format_selection(session.state(), session.selection()));
    }
    Ok(out)
}

pub fn cmd_show<A: DesignApi>(session: &mut DesignSession<A>, id: &str) -> Result<String, ApiError> {
    // The list supplies the prompt that the detail endpoint omits.
    if let Err(e) = session.refresh() {
        log::warn!("could not refresh design list before show: {}", e);
    }
    session.select(id)?;
    Ok(format_selection(session.state(), session.selection()))
}

pub fn cmd_generate<A: DesignApi>(
    session: &mut DesignSession<A>,
    prompt: &str,
) -> Result<String, ApiError> {
    let outcome = session.generate(prompt)?;

    let mut out = format_selection(session.state(), session.selection());
    if !outcome.list_refreshed {
        out.push_str("(design list could not be refreshed; showing the analysis result)\n");
    }
    Ok(out)
}

pub fn cmd_delete<A: DesignApi>(session: &mut DesignSession<A>, id: &str) -> Result<String, ApiError> {
    if let Err(e) = session.refresh() {
        log::warn!("could not refresh design list before delete: {}", e);
    }
    session.delete(id)?;
    Ok(format!("Deleted design {}\n", id))
}

// ============================================================================
// login / whoami
// ============================================================================

/// Logs in. The bearer token is only written out when `print_token` is set.
pub fn cmd_login(
    backend: &HttpBackend,
    username: &str,
    password: &str,
    print_token: bool,
) -> Result<String, ApiError> {
    let auth = backend.login(username, password)?;
    let who = auth
        .user
        .as_ref()
        .map(|u| u.nickname.clone().unwrap_or_else(|| u.username.clone()))
        .unwrap_or_else(|| username.to_string());

    let mut out = format!("Logged in as {}\n", who);
    if print_token {
        out.push_str(&format!("token: {}\n", auth.token()));
    } else {
        out.push_str("(token hidden; rerun with --print-token to show it)\n");
    }
    Ok(out)
}

pub fn cmd_whoami(backend: &HttpBackend, auth: Option<&AuthSession>) -> Result<String, ApiError> {
    let auth = require(auth)?;
    let user = backend.current_user(auth)?;
    Ok(format!(
        "{}{}\n",
        user.username,
        user.role.map(|r| format!(" ({})", r)).unwrap_or_default()
    ))
}

/// Ends the backend session. A backend failure is logged, not returned; the
/// token is treated as gone either way.
pub fn cmd_logout(backend: &HttpBackend, auth: Option<&AuthSession>) -> Result<String, ApiError> {
    let auth = require(auth)?;
    if let Err(e) = backend.logout(auth) {
        log::warn!("backend logout failed: {}", e);
    }
    Ok("Logged out\n".to_string())
}
