//! Create dialogs. Unlike edits there is no stored original, so every rule
//! runs on every field.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use shared::domain::TransactionLimit;
use tracing::info;

use crate::{
    backend::AdminBackend,
    error::ConsoleError,
    schema::FormSchema,
    validate::{validate_draft, ValidationErrors},
};

pub struct CreateForm {
    schema: &'static FormSchema,
    draft: Map<String, Value>,
    errors: BTreeMap<String, String>,
}

impl CreateForm {
    pub fn new(schema: &'static FormSchema) -> Self {
        Self {
            schema,
            draft: schema.seed(&Map::new()),
            errors: BTreeMap::new(),
        }
    }

    pub fn draft(&self) -> &Map<String, Value> {
        &self.draft
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn set_field(&mut self, name: &str, value: Value) -> Result<(), ConsoleError> {
        let field = self.schema.field(name).ok_or_else(|| {
            ConsoleError::Validation(ValidationErrors::single(name, "is not an editable field"))
        })?;
        self.draft
            .insert(field.name.to_string(), field.kind.normalize(value));
        self.errors.remove(name);
        Ok(())
    }

    pub fn validate(&mut self) -> Result<(), ConsoleError> {
        match validate_draft(self.schema.fields, &self.draft, None) {
            Ok(()) => {
                self.errors.clear();
                Ok(())
            }
            Err(errors) => {
                self.errors = errors
                    .iter()
                    .map(|err| (err.field.clone(), err.message.clone()))
                    .collect();
                Err(ConsoleError::Validation(errors))
            }
        }
    }

    /// Validates and posts the draft. Empty optional text fields are left out
    /// of the payload.
    pub async fn submit(&mut self, backend: &dyn AdminBackend) -> Result<Value, ConsoleError> {
        self.validate()?;

        let payload: Map<String, Value> = self
            .draft
            .iter()
            .filter(|(_, value)| !matches!(value, Value::String(text) if text.is_empty()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let created = backend
            .create(self.schema.resource, &Value::Object(payload))
            .await?;
        info!(resource = self.schema.resource.segment, "record created");
        Ok(created)
    }
}

/// Rejects a new limit when one already exists for the same service and
/// member. A missing member means the platform-wide limit for the service.
pub fn check_limit_conflict(
    existing: &[TransactionLimit],
    draft: &Map<String, Value>,
) -> Result<(), ConsoleError> {
    let service = draft
        .get("service")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim();
    let member = draft
        .get("memberId")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|member| !member.is_empty());

    let clash = existing.iter().find(|limit| {
        limit.service.trim().eq_ignore_ascii_case(service)
            && limit
                .member_id
                .as_ref()
                .map(|id| id.as_str().trim())
                .filter(|id| !id.is_empty())
                == member
    });

    match clash {
        Some(limit) => Err(ConsoleError::Conflict(match member {
            Some(_) => format!(
                "A limit for service '{}' already exists for this member.",
                limit.service
            ),
            None => format!("A limit for service '{}' already exists.", limit.service),
        })),
        None => Ok(()),
    }
}

/// Creates a transaction limit unless it would duplicate one in `existing`.
/// The duplicate check happens before any request is made.
pub async fn create_limit(
    backend: &dyn AdminBackend,
    form: &mut CreateForm,
    existing: &[TransactionLimit],
) -> Result<Value, ConsoleError> {
    form.validate()?;
    check_limit_conflict(existing, form.draft())?;
    form.submit(backend).await
}

#[cfg(test)]
#[path = "tests/create_tests.rs"]
mod tests;
