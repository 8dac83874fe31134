use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::{Value, json};

use crate::api::auth::{AuthSession, UserProfile, decode_login, decode_user};
use crate::api::error::ApiError;
use crate::design::decode::{
    decode_analyze_response, decode_design_detail, decode_design_list, error_message,
};
use crate::design::design_model::{AnalyzeOutcome, DesignResult, SavedDesign};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

// ============================================================================
// DesignApi trait: the backend as seen by the session
// ============================================================================

/// The AI-design endpoints. Every call takes the caller's `AuthSession`
/// explicitly.
pub trait DesignApi {
    /// `POST /ai/analyze-design`. The backend persists the result as a new
    /// saved design.
    fn analyze(&self, auth: &AuthSession, prompt: &str) -> Result<AnalyzeOutcome, ApiError>;

    /// `GET /ai/designs`, newest first.
    fn list(&self, auth: &AuthSession) -> Result<Vec<SavedDesign>, ApiError>;

    /// `GET /ai/designs/:id`
    fn get(&self, auth: &AuthSession, id: &str) -> Result<DesignResult, ApiError>;

    /// `DELETE /ai/designs/:id`
    fn delete(&self, auth: &AuthSession, id: &str) -> Result<(), ApiError>;
}

impl<T: DesignApi + ?Sized> DesignApi for Box<T> {
    fn analyze(&self, auth: &AuthSession, prompt: &str) -> Result<AnalyzeOutcome, ApiError> {
        (**self).analyze(auth, prompt)
    }

    fn list(&self, auth: &AuthSession) -> Result<Vec<SavedDesign>, ApiError> {
        (**self).list(auth)
    }

    fn get(&self, auth: &AuthSession, id: &str) -> Result<DesignResult, ApiError> {
        (**self).get(auth, id)
    }

    fn delete(&self, auth: &AuthSession, id: &str) -> Result<(), ApiError> {
        (**self).delete(auth, id)
    }
}

// ============================================================================
// HTTP backend (reqwest blocking)
// ============================================================================

pub struct HttpBackend {
    base_url: String,
    client: Client,
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("could not build configured HTTP client ({}); using defaults", e);
                Client::new()
            });

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn design_url(&self, id: &str) -> String {
        self.url(&format!("/ai/designs/{}", urlencoding::encode(id)))
    }

    /// Send a request and return the decoded JSON body of a 2xx response.
    /// Non-JSON success bodies come back as `Value::Null`.
    fn send(&self, request: RequestBuilder, context: &str) -> Result<Value, ApiError> {
        log::debug!("{} -> sending", context);

        let response = request.send().map_err(|e| ApiError::NetworkFailure {
            context: context.to_string(),
            source: Box::new(e),
        })?;

        let status = response.status();
        let text = response.text().map_err(|e| ApiError::NetworkFailure {
            context: context.to_string(),
            source: Box::new(e),
        })?;
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        log::debug!("{} <- {}", context, status);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthenticated {
                message: error_message(&body),
            });
        }

        if !status.is_success() {
            return Err(ApiError::ServerRejected {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(body)
    }

    // ---- auth endpoints ----

    /// `POST /auth/login`
    pub fn login(&self, username: &str, password: &str) -> Result<AuthSession, ApiError> {
        let body = self.send(
            self.client
                .post(self.url("/auth/login"))
                .json(&json!({ "username": username, "password": password })),
            "login",
        )?;
        decode_login(&body)
    }

    /// `GET /auth/me`: confirms the token is still accepted.
    pub fn current_user(&self, auth: &AuthSession) -> Result<UserProfile, ApiError> {
        let body = self.send(
            self.client
                .get(self.url("/auth/me"))
                .header("Authorization", auth.bearer()),
            "current user",
        )?;
        decode_user(&body).ok_or_else(|| ApiError::MalformedPayload {
            context: "current user".to_string(),
            detail: "response has no 'user' object".to_string(),
        })
    }

    /// `POST /auth/logout`. Best effort; the caller drops its session either way.
    pub fn logout(&self, auth: &AuthSession) -> Result<(), ApiError> {
        self.send(
            self.client
                .post(self.url("/auth/logout"))
                .header("Authorization", auth.bearer()),
            "logout",
        )
        .map(|_| ())
    }
}

impl DesignApi for HttpBackend {
    fn analyze(&self, auth: &AuthSession, prompt: &str) -> Result<AnalyzeOutcome, ApiError> {
        let body = self.send(
            self.client
                .post(self.url("/ai/analyze-design"))
                .header("Authorization", auth.bearer())
                .json(&json!({ "prompt": prompt })),
            "analyze design",
        )?;
        decode_analyze_response(&body)
    }

    fn list(&self, auth: &AuthSession) -> Result<Vec<SavedDesign>, ApiError> {
        let body = self.send(
            self.client
                .get(self.url("/ai/designs"))
                .header("Authorization", auth.bearer()),
            "list designs",
        )?;
        decode_design_list(&body)
    }

    fn get(&self, auth: &AuthSession, id: &str) -> Result<DesignResult, ApiError> {
        let body = self.send(
            self.client
                .get(self.design_url(id))
                .header("Authorization", auth.bearer()),
            "fetch design",
        )?;
        decode_design_detail(&body)
    }

    fn delete(&self, auth: &AuthSession, id: &str) -> Result<(), ApiError> {
        self.send(
            self.client
                .delete(self.design_url(id))
                .header("Authorization", auth.bearer()),
            "delete design",
        )
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let backend = HttpBackend::new("http://host:1/api/");
        assert_eq!(backend.base_url(), "http://host:1/api");
        assert_eq!(backend.design_url("42"), "http://host:1/api/ai/designs/42");
    }

    #[test]
    fn design_ids_are_escaped_as_one_segment() {
        let backend = HttpBackend::new("http://host:1/api");
        assert_eq!(backend.design_url("abc-123"), "http://host:1/api/ai/designs/abc-123");
        assert_eq!(backend.design_url("a/b c"), "http://host:1/api/ai/designs/a%2Fb%20c");
    }
}
