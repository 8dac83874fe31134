use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::error::ApiError;

/// Authenticated user as reported by `/auth/login` and `/auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Explicit authentication context. Built once at the boundary and passed to
/// every operation that needs a bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    token: String,
    pub user: Option<UserProfile>,
}

impl AuthSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into().trim().to_string(),
            user: None,
        }
    }

    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.user = Some(user);
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_valid(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Resolve the session to use for an authenticated call, failing before any
/// request is built when there is none.
pub fn require(auth: Option<&AuthSession>) -> Result<&AuthSession, ApiError> {
    match auth {
        Some(session) if session.is_valid() => Ok(session),
        _ => Err(ApiError::login_required()),
    }
}

/// Build a session from a login response: `{token, user}`, optionally nested
/// under `data`.
pub fn decode_login(body: &Value) -> Result<AuthSession, ApiError> {
    let root = body.get("data").filter(|d| d.is_object()).unwrap_or(body);

    let token = root
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::MalformedPayload {
            context: "login response".to_string(),
            detail: "no token in response".to_string(),
        })?;

    let session = AuthSession::new(token);
    Ok(match decode_user(root) {
        Some(user) => session.with_user(user),
        None => session,
    })
}

/// Extract the user object from `{user}` or `{data: {user}}`.
pub fn decode_user(body: &Value) -> Option<UserProfile> {
    let root = body.get("data").filter(|d| d.is_object()).unwrap_or(body);
    let user = root.get("user")?;
    match serde_json::from_value::<UserProfile>(user.clone()) {
        Ok(profile) => Some(profile),
        Err(e) => {
            log::warn!("user profile in auth response could not be decoded: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_is_not_a_session() {
        let session = AuthSession::new("   ");
        assert!(!session.is_valid());
        assert!(require(Some(&session)).unwrap_err().is_unauthenticated());
        assert!(require(None).is_err());
    }

    #[test]
    fn bearer_header_value() {
        assert_eq!(AuthSession::new("abc").bearer(), "Bearer abc");
    }
}
