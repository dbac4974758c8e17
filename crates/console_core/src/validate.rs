//! Field validators for edit and create dialogs.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde_json::{Map, Value};
use shared::error::FieldError;

use crate::schema::{values_equal, FieldSpec};

static ROUTING_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").expect("static regex"));
static TAX_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("static regex"));
static NATIONAL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("static regex"));
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{9}$").expect("static regex"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    /// Bank branch routing code (IFSC).
    RoutingCode,
    /// Permanent account number.
    TaxId,
    /// Twelve digit national id.
    NationalId,
    Phone,
    Email,
    NonNegativeAmount,
    PositiveAmount,
}

impl Rule {
    /// Format rules are not re-applied to values already stored upstream.
    pub fn is_format(self) -> bool {
        matches!(
            self,
            Self::RoutingCode | Self::TaxId | Self::NationalId | Self::Phone | Self::Email
        )
    }

    pub fn check(self, value: Option<&Value>) -> Result<(), String> {
        match self {
            Self::Required => {
                if text_of(value).is_empty() {
                    Err("is required".to_string())
                } else {
                    Ok(())
                }
            }
            Self::RoutingCode => check_pattern(
                value,
                &ROUTING_CODE,
                "must be a valid IFSC code (4 letters, 0, then 6 letters or digits)",
            ),
            Self::TaxId => check_pattern(
                value,
                &TAX_ID,
                "must be a valid PAN (5 letters, 4 digits, 1 letter)",
            ),
            Self::NationalId => check_pattern(value, &NATIONAL_ID, "must be exactly 12 digits"),
            Self::Phone => check_pattern(
                value,
                &PHONE,
                "must be a 10 digit number not starting with 0",
            ),
            Self::Email => check_pattern(value, &EMAIL, "must be a valid email address"),
            Self::NonNegativeAmount => match amount_of(value) {
                Some(amount) if amount.is_finite() && amount >= 0.0 => Ok(()),
                _ => Err("must be a non-negative amount".to_string()),
            },
            Self::PositiveAmount => match amount_of(value) {
                Some(amount) if amount.is_finite() && amount > 0.0 => Ok(()),
                _ => Err("must be an amount greater than zero".to_string()),
            },
        }
    }
}

/// Empty optional values pass; `Required` is responsible for presence.
fn check_pattern(value: Option<&Value>, pattern: &Regex, message: &str) -> Result<(), String> {
    let text = text_of(value).to_ascii_uppercase();
    if text.is_empty() || pattern.is_match(&text) {
        Ok(())
    } else {
        Err(message.to_string())
    }
}

fn text_of(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

pub(crate) fn amount_of(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[derive(Debug, Default)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(field, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|err| err.field == field)
            .map(|err| err.message.as_str())
    }

    fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
            first = false;
        }
        Ok(())
    }
}

/// Validates every field of `draft`, reporting at most one error per field in
/// schema order. With an `original`, format rules are skipped for unchanged
/// values.
pub fn validate_draft(
    fields: &[FieldSpec],
    draft: &Map<String, Value>,
    original: Option<&Map<String, Value>>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    for field in fields {
        let value = draft.get(field.name);
        let unchanged = original
            .map(|original| values_equal(original.get(field.name), value))
            .unwrap_or(false);

        for rule in field.rules {
            if rule.is_format() && unchanged {
                continue;
            }
            if let Err(message) = rule.check(value) {
                errors.push(FieldError::new(field.name, message));
                break;
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
#[path = "tests/validate_tests.rs"]
mod tests;
