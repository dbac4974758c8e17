use anyhow::{bail, Result};
use console_core::{
    create_limit, schema::FormSchema, AdminBackend, CreateForm, FormController, HttpBackend,
    ListController, Listable, SubmitOutcome, ToggleOutcome,
};
use serde_json::Value;
use shared::{
    domain::TransactionLimit,
    protocol::{Resource, StatusFlag},
};
use tracing::info;

use crate::{
    render::{render_page, Row},
    ListArgs,
};

pub struct Context {
    backend: HttpBackend,
    page_size: usize,
}

/// Splits `key=value`, trimming the key.
pub fn parse_pair(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => bail!("expected key=value, got '{raw}'"),
    }
}

impl Context {
    pub fn new(backend: HttpBackend, page_size: usize) -> Self {
        Self { backend, page_size }
    }

    pub fn whoami(&self) -> String {
        match self.backend.session().identity() {
            Some(identity) => format!("signed in as {} ({})", identity.name, identity.id),
            None => "no signed-in admin".to_string(),
        }
    }

    pub async fn list<T: Listable + Row>(&self, args: &ListArgs) -> Result<String> {
        let mut list = ListController::<T>::new(args.page_size.unwrap_or(self.page_size));
        list.refresh(&self.backend).await?;

        if let Some(search) = &args.search {
            list.set_search(search.as_str());
        }
        for raw in &args.filters {
            let (key, value) = parse_pair(raw)?;
            list.set_category(key, value);
        }
        list.go_to_page(args.page);

        Ok(render_page(&list.view()))
    }

    pub async fn edit(
        &self,
        schema: &'static FormSchema,
        id: &str,
        sets: &[String],
    ) -> Result<String> {
        let mut form = FormController::new(schema);
        form.open(&self.backend, id).await?;
        for raw in sets {
            let (field, value) = parse_pair(raw)?;
            form.set_field(&field, Value::String(value))?;
        }

        let segment = schema.resource.segment;
        Ok(match form.submit(&self.backend).await? {
            SubmitOutcome::NoChanges => "no changes".to_string(),
            SubmitOutcome::Saved { diff } => {
                let fields: Vec<&str> = diff
                    .keys()
                    .map(String::as_str)
                    .filter(|key| *key != schema.id_field)
                    .collect();
                format!("updated {segment} {id}: {}", fields.join(", "))
            }
            SubmitOutcome::Discarded => "edit discarded".to_string(),
        })
    }

    pub async fn toggle(
        &self,
        schema: &'static FormSchema,
        id: &str,
        flag: StatusFlag,
        value: Value,
    ) -> Result<String> {
        let mut form = FormController::new(schema);
        form.open(&self.backend, id).await?;

        let shown = match &value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        Ok(match form.toggle(&self.backend, flag, value).await? {
            ToggleOutcome::Applied => format!(
                "{} {id}: {} set to {shown}",
                schema.resource.segment,
                flag.field()
            ),
            ToggleOutcome::Discarded => "update discarded".to_string(),
        })
    }

    pub async fn create(&self, schema: &'static FormSchema, sets: &[String]) -> Result<String> {
        let mut form = fill(schema, sets)?;
        form.submit(&self.backend).await?;
        Ok(format!("created {}", schema.resource.segment))
    }

    /// Loads the current limits first so duplicates are refused locally.
    pub async fn create_limit(&self, sets: &[String]) -> Result<String> {
        let mut existing = ListController::<TransactionLimit>::new(self.page_size);
        existing.refresh(&self.backend).await?;

        let mut form = fill(&console_core::schema::LIMIT_SCHEMA, sets)?;
        create_limit(&self.backend, &mut form, existing.items()).await?;
        Ok("created limit".to_string())
    }

    pub async fn delete(&self, resource: Resource, id: &str) -> Result<String> {
        self.backend.delete(resource, id).await?;
        info!(resource = resource.segment, id, "record deleted");
        Ok(format!("deleted {} {id}", resource.segment))
    }
}

fn fill(schema: &'static FormSchema, sets: &[String]) -> Result<CreateForm> {
    let mut form = CreateForm::new(schema);
    for raw in sets {
        let (field, value) = parse_pair(raw)?;
        form.set_field(&field, Value::String(value))?;
    }
    Ok(form)
}
