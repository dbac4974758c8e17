use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::validate::ValidationErrors;

static DUP_KEY_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"dup key:\s*\{\s*"?(\w+)"?\s*:\s*"([^"]*)""#).expect("static regex")
});

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("{0}")]
    Conflict(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("unexpected response shape for {resource}")]
    UnexpectedShape { resource: String },
    #[error("invalid api base url: {0}")]
    InvalidBaseUrl(String),
    #[error("not signed in: missing bearer token")]
    MissingSession,
    #[error("no record is open for editing")]
    NotOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    Auth,
    Transport,
    Server,
    Unknown,
}

impl ConsoleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Conflict(_) => ErrorCategory::Conflict,
            Self::Transport(_) => ErrorCategory::Transport,
            Self::MissingSession => ErrorCategory::Auth,
            Self::Server { status, message } => {
                if *status == 401 || *status == 403 {
                    ErrorCategory::Auth
                } else if *status == 409 || is_conflict_message(message) {
                    ErrorCategory::Conflict
                } else {
                    ErrorCategory::Server
                }
            }
            Self::UnexpectedShape { .. } | Self::InvalidBaseUrl(_) | Self::NotOpen => {
                ErrorCategory::Unknown
            }
        }
    }

    /// Text to show the operator. Server messages pass through verbatim
    /// unless they describe a known uniqueness conflict.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } => {
                friendly_conflict(message).unwrap_or_else(|| message.clone())
            }
            Self::Transport(_) => "Could not reach the server; check your connection and retry.".to_string(),
            other => other.to_string(),
        }
    }
}

fn is_conflict_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("duplicate key") || lower.contains("e11000") || lower.contains("already exists")
}

/// Rewrites raw uniqueness violations into something an operator can act on.
/// Messages that already read well ("... already exists") are left alone.
pub fn friendly_conflict(message: &str) -> Option<String> {
    let lower = message.to_ascii_lowercase();
    if !(lower.contains("duplicate key") || lower.contains("e11000")) {
        return None;
    }

    if let Some(caps) = DUP_KEY_FIELD.captures(message) {
        let field = &caps[1];
        let value = &caps[2];
        if field.eq_ignore_ascii_case("service") {
            return Some(format!("A limit for service '{value}' already exists."));
        }
        return Some(format!("A record with {field} '{value}' already exists."));
    }

    Some("This record conflicts with an existing one.".to_string())
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
