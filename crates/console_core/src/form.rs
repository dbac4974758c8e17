//! Edit dialog controller: authoritative snapshot, mutable draft, minimal
//! diff on submit and independent status-flag toggles.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use shared::protocol::{FlagUpdate, StatusFlag};
use tracing::{debug, info};

use crate::{
    backend::AdminBackend,
    envelope::unwrap_record,
    error::ConsoleError,
    schema::{values_equal, FormSchema},
    sequence::{RequestSequence, Ticket},
    validate::{validate_draft, ValidationErrors},
};

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The draft matches the snapshot; nothing was sent.
    NoChanges,
    /// The diff was accepted. The caller should refresh its list.
    Saved { diff: Map<String, Value> },
    /// The dialog was closed or reopened while the request was in flight.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Applied,
    Discarded,
}

/// Fields of `draft` that differ from `original`, plus the identifier.
/// `None` when nothing but the identifier would be sent.
pub fn compute_diff(
    schema: &FormSchema,
    id: &str,
    original: &Map<String, Value>,
    draft: &Map<String, Value>,
) -> Option<Map<String, Value>> {
    let mut diff: Map<String, Value> = schema
        .fields
        .iter()
        .filter(|field| !values_equal(original.get(field.name), draft.get(field.name)))
        .map(|field| {
            let value = draft.get(field.name).cloned().unwrap_or(Value::Null);
            (field.name.to_string(), value)
        })
        .collect();

    if diff.is_empty() {
        return None;
    }
    diff.insert(schema.id_field.to_string(), Value::String(id.to_string()));
    Some(diff)
}

struct OpenRecord {
    id: String,
    record: Map<String, Value>,
    original: Map<String, Value>,
    draft: Map<String, Value>,
    ticket: Ticket,
}

pub struct FormController {
    schema: &'static FormSchema,
    open: Option<OpenRecord>,
    errors: BTreeMap<String, String>,
    dialogs: RequestSequence,
    pending: bool,
}

impl FormController {
    pub fn new(schema: &'static FormSchema) -> Self {
        Self {
            schema,
            open: None,
            errors: BTreeMap::new(),
            dialogs: RequestSequence::default(),
            pending: false,
        }
    }

    pub fn schema(&self) -> &'static FormSchema {
        self.schema
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn id(&self) -> Option<&str> {
        self.open.as_ref().map(|open| open.id.as_str())
    }

    pub fn record(&self) -> Option<&Map<String, Value>> {
        self.open.as_ref().map(|open| &open.record)
    }

    pub fn original(&self) -> Option<&Map<String, Value>> {
        self.open.as_ref().map(|open| &open.original)
    }

    pub fn draft(&self) -> Option<&Map<String, Value>> {
        self.open.as_ref().map(|open| &open.draft)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Ticket of the currently open dialog.
    pub fn dialog(&self) -> Option<Ticket> {
        self.open.as_ref().map(|open| open.ticket)
    }

    /// Fetches the authoritative record and seeds a fresh draft from it.
    pub async fn open(&mut self, backend: &dyn AdminBackend, id: &str) -> Result<(), ConsoleError> {
        let raw = backend.get_one(self.schema.resource, id).await?;
        let record = unwrap_record(&raw, &self.schema.resource)?;
        self.seed(record)
    }

    pub fn seed(&mut self, record: Map<String, Value>) -> Result<(), ConsoleError> {
        let id = self
            .schema
            .record_id(&record)
            .ok_or_else(|| ConsoleError::UnexpectedShape {
                resource: self.schema.resource.segment.to_string(),
            })?;
        let original = self.schema.seed(&record);
        debug!(resource = self.schema.resource.segment, id = %id, "edit dialog opened");

        self.open = Some(OpenRecord {
            id,
            record,
            draft: original.clone(),
            original,
            ticket: self.dialogs.next(),
        });
        self.errors.clear();
        self.pending = false;
        Ok(())
    }

    pub fn close(&mut self) {
        self.open = None;
        self.errors.clear();
        self.pending = false;
        self.dialogs.invalidate();
    }

    /// Updates one draft field and clears its recorded error.
    pub fn set_field(&mut self, name: &str, value: Value) -> Result<(), ConsoleError> {
        let schema = self.schema;
        let field = schema.field(name).ok_or_else(|| {
            ConsoleError::Validation(ValidationErrors::single(name, "is not an editable field"))
        })?;
        let open = self.open.as_mut().ok_or(ConsoleError::NotOpen)?;
        open.draft
            .insert(field.name.to_string(), field.kind.normalize(value));
        self.errors.remove(name);
        Ok(())
    }

    /// Validates the draft and computes the diff. `Ok(None)` means there is
    /// nothing to send.
    pub fn prepare_submit(&mut self) -> Result<Option<Map<String, Value>>, ConsoleError> {
        let open = self.open.as_ref().ok_or(ConsoleError::NotOpen)?;

        if let Err(errors) = validate_draft(self.schema.fields, &open.draft, Some(&open.original)) {
            self.errors = errors
                .iter()
                .map(|err| (err.field.clone(), err.message.clone()))
                .collect();
            return Err(ConsoleError::Validation(errors));
        }
        self.errors.clear();

        Ok(compute_diff(self.schema, &open.id, &open.original, &open.draft))
    }

    /// Applies the result of an update request issued for `ticket`.
    pub fn settle_submit(
        &mut self,
        ticket: Ticket,
        diff: Map<String, Value>,
        result: Result<Value, ConsoleError>,
    ) -> Result<SubmitOutcome, ConsoleError> {
        self.pending = false;
        let open = match self.open.as_mut() {
            Some(open) if open.ticket == ticket => open,
            _ => return Ok(SubmitOutcome::Discarded),
        };

        result?;
        for (field, value) in &diff {
            if field != self.schema.id_field {
                open.original.insert(field.clone(), value.clone());
                open.record.insert(field.clone(), value.clone());
            }
        }
        info!(
            resource = self.schema.resource.segment,
            id = %open.id,
            fields = diff.len() - 1,
            "record updated"
        );
        Ok(SubmitOutcome::Saved { diff })
    }

    pub async fn submit(
        &mut self,
        backend: &dyn AdminBackend,
    ) -> Result<SubmitOutcome, ConsoleError> {
        let Some(diff) = self.prepare_submit()? else {
            return Ok(SubmitOutcome::NoChanges);
        };
        let ticket = self.dialog().ok_or(ConsoleError::NotOpen)?;

        self.pending = true;
        let result = backend
            .update(self.schema.resource, &Value::Object(diff.clone()))
            .await;
        self.settle_submit(ticket, diff, result)
    }

    /// Flips a status flag through its dedicated endpoint. The draft and the
    /// snapshot change only once the backend accepted the new value.
    pub async fn toggle(
        &mut self,
        backend: &dyn AdminBackend,
        flag: StatusFlag,
        value: Value,
    ) -> Result<ToggleOutcome, ConsoleError> {
        let (ticket, id) = {
            let open = self.open.as_ref().ok_or(ConsoleError::NotOpen)?;
            (open.ticket, open.id.clone())
        };

        let update = FlagUpdate {
            id,
            new_value: value.clone(),
        };
        let result = backend
            .set_flag(self.schema.resource, flag, &update)
            .await;

        let open = match self.open.as_mut() {
            Some(open) if open.ticket == ticket => open,
            _ => return Ok(ToggleOutcome::Discarded),
        };
        result?;

        let field = flag.field().to_string();
        open.draft.insert(field.clone(), value.clone());
        open.original.insert(field.clone(), value.clone());
        open.record.insert(field, value);
        info!(
            resource = self.schema.resource.segment,
            flag = flag.endpoint(),
            "status flag updated"
        );
        Ok(ToggleOutcome::Applied)
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
