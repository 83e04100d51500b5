//! Unified error model for the session/identity module.
//! One enum covers every failure surfaced by the identity client and the
//! session store, along with helpers describing how each class is handled
//! (surfaced to the user vs recovered silently).

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthError {
    /// Network/service unreachable. Surfaced with a retry-suggesting message.
    Connectivity { code: String, message: String },
    /// Bad credentials or rejected registration. Surfaced with the service's message.
    Authentication { code: String, message: String },
    /// Token rejected by the identity service. Recovered silently by clearing the session.
    StaleToken { code: String, message: String },
    /// Unexpected status or undecodable body from the identity service.
    Service { code: String, message: String },
}

impl AuthError {
    pub fn code_str(&self) -> &str {
        match self {
            AuthError::Connectivity { code, .. }
            | AuthError::Authentication { code, .. }
            | AuthError::StaleToken { code, .. }
            | AuthError::Service { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AuthError::Connectivity { message, .. }
            | AuthError::Authentication { message, .. }
            | AuthError::StaleToken { message, .. }
            | AuthError::Service { message, .. } => message.as_str(),
        }
    }

    pub fn connectivity<S: Into<String>>(code: S, msg: S) -> Self { AuthError::Connectivity { code: code.into(), message: msg.into() } }
    pub fn authentication<S: Into<String>>(code: S, msg: S) -> Self { AuthError::Authentication { code: code.into(), message: msg.into() } }
    pub fn stale_token<S: Into<String>>(code: S, msg: S) -> Self { AuthError::StaleToken { code: code.into(), message: msg.into() } }
    pub fn service<S: Into<String>>(code: S, msg: S) -> Self { AuthError::Service { code: code.into(), message: msg.into() } }

    /// Whether the session store swallows this error and degrades to an
    /// anonymous session instead of surfacing it.
    pub fn is_silent(&self) -> bool {
        matches!(self, AuthError::StaleToken { .. })
    }

    /// Whether retrying the same call later can plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::Connectivity { .. })
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AuthError {}

pub type AuthResult<T> = Result<T, AuthError>;

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        // Transport-level failures (refused, DNS, TLS, timeouts) all read as
        // "the service cannot be reached" to the caller.
        AuthError::Connectivity {
            code: "unreachable".into(),
            message: format!("Cannot connect to the identity service: {}. Please check that the backend is running and retry.", err),
        }
    }
}
