use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    /// No session token, or the backend refused it (401/403). Raised before
    /// any request when the token is missing; `message` is the backend's
    /// `{error}` text when it sent one.
    Unauthenticated { message: Option<String> },

    /// Submitted prompt was empty after trimming; no request was sent
    EmptyPrompt,

    /// Request never produced a response (connection refused, DNS, timeout)
    NetworkFailure {
        context: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Backend answered with a non-2xx status
    ServerRejected { status: u16, message: Option<String> },

    /// Response envelope could not be decoded at all
    MalformedPayload { context: String, detail: String },
}

pub const GENERIC_FAILURE_MESSAGE: &str = "操作失败，请稍后重试";
pub const UNREACHABLE_MESSAGE: &str = "无法连接到后端服务，请确认服务已启动";
pub const LOGIN_REQUIRED_MESSAGE: &str = "请先登录";
pub const EMPTY_PROMPT_MESSAGE: &str = "请输入设计需求";

impl ApiError {
    /// Missing or blank token, detected before any request.
    pub fn login_required() -> Self {
        ApiError::Unauthenticated { message: None }
    }

    /// Text suitable for an end-user notification. Uses the server's message
    /// when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthenticated { message: Some(msg) } => msg.clone(),
            ApiError::Unauthenticated { message: None } => LOGIN_REQUIRED_MESSAGE.to_string(),
            ApiError::EmptyPrompt => EMPTY_PROMPT_MESSAGE.to_string(),
            ApiError::NetworkFailure { .. } => UNREACHABLE_MESSAGE.to_string(),
            ApiError::ServerRejected {
                message: Some(msg), ..
            } => msg.clone(),
            ApiError::ServerRejected { message: None, .. } => GENERIC_FAILURE_MESSAGE.to_string(),
            ApiError::MalformedPayload { .. } => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ApiError::Unauthenticated { .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthenticated { message } => match message {
                Some(msg) => write!(f, "Not authenticated: {}", msg),
                None => write!(f, "Not authenticated"),
            },
            ApiError::EmptyPrompt => write!(f, "Prompt is empty"),
            ApiError::NetworkFailure { context, source } => {
                write!(f, "Backend unreachable ({}): {}", context, source)
            }
            ApiError::ServerRejected { status, message } => match message {
                Some(msg) => write!(f, "Server rejected request ({}): {}", status, msg),
                None => write!(f, "Server rejected request ({})", status),
            },
            ApiError::MalformedPayload { context, detail } => {
                write!(f, "Malformed payload ({}): {}", context, detail)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::NetworkFailure { source, .. } => Some(&**source),
            _ => None,
        }
    }
}
