use std::fs;

use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080/api";
const SETTINGS_FILE: &str = "console.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub token: Option<String>,
    pub page_size: usize,
    pub request_timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            token: None,
            page_size: 10,
            request_timeout_seconds: 30,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings.api_base_url = normalize_base_url(&settings.api_base_url);
    settings
}

pub fn apply_file(settings: &mut Settings, raw: &str) {
    let table = match toml::from_str::<toml::Table>(raw) {
        Ok(table) => table,
        Err(err) => {
            warn!(file = SETTINGS_FILE, error = %err, "ignoring unreadable settings file");
            return;
        }
    };

    if let Some(v) = table.get("api_base_url").and_then(toml::Value::as_str) {
        settings.api_base_url = v.to_string();
    }
    if let Some(v) = table.get("token").and_then(toml::Value::as_str) {
        settings.token = Some(v.to_string());
    }
    if let Some(v) = table.get("page_size").and_then(as_count) {
        settings.page_size = v as usize;
    }
    if let Some(v) = table.get("request_timeout_seconds").and_then(as_count) {
        settings.request_timeout_seconds = v;
    }
}

fn as_count(value: &toml::Value) -> Option<u64> {
    match value {
        toml::Value::Integer(n) => u64::try_from(*n).ok(),
        toml::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Later keys win, so the `APP__` forms override the short ones.
pub fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    for key in ["CONSOLE_API_URL", "APP__API_BASE_URL"] {
        if let Some(v) = lookup(key) {
            settings.api_base_url = v;
        }
    }
    for key in ["CONSOLE_TOKEN", "APP__TOKEN"] {
        if let Some(v) = lookup(key) {
            settings.token = Some(v);
        }
    }

    if let Some(v) = lookup("APP__PAGE_SIZE") {
        if let Ok(parsed) = v.trim().parse::<usize>() {
            settings.page_size = parsed;
        }
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_seconds = parsed;
        }
    }
}

pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');

    if trimmed.is_empty() {
        return DEFAULT_API_BASE_URL.to_string();
    }
    if trimmed.contains("://") {
        return trimmed.to_string();
    }
    format!("http://{trimmed}")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
