use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the admin backend. Different endpoints use
/// different keys for the human readable text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl ServerErrorBody {
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .or(self.msg.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

/// Extracts the message a failed request should surface. Falls back to the
/// raw body, then to the status line.
pub fn server_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ServerErrorBody>(body) {
        if let Some(text) = parsed.text() {
            return text.to_string();
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() && !trimmed.starts_with('{') {
        return trimmed.to_string();
    }
    format!("request failed with status {status}")
}

#[derive(Debug, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
