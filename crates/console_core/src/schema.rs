//! Editable field sets of each entity and value helpers shared by the form
//! and create controllers.

use serde_json::{Map, Number, Value};
use shared::protocol::Resource;

use crate::validate::Rule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Identifier-like text, stored trimmed and upper-cased.
    Code,
    Amount,
    Flag,
}

impl FieldKind {
    pub fn default_value(self) -> Value {
        match self {
            Self::Text | Self::Code => Value::String(String::new()),
            Self::Amount => Value::from(0),
            Self::Flag => Value::Bool(false),
        }
    }

    /// Canonical form of operator input for this kind of field.
    pub fn normalize(self, value: Value) -> Value {
        match (self, value) {
            (Self::Code, Value::String(text)) => Value::String(text.trim().to_ascii_uppercase()),
            (Self::Amount, Value::String(text)) => match text.trim().parse::<f64>() {
                Ok(amount) => Number::from_f64(amount)
                    .map(Value::Number)
                    .unwrap_or(Value::String(text)),
                Err(_) => Value::String(text),
            },
            (Self::Flag, Value::String(text)) => match text.trim().parse::<bool>() {
                Ok(flag) => Value::Bool(flag),
                Err(_) => Value::String(text),
            },
            (_, value) => value,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub rules: &'static [Rule],
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind, rules: &'static [Rule]) -> Self {
        Self { name, kind, rules }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormSchema {
    pub resource: Resource,
    pub id_field: &'static str,
    pub fields: &'static [FieldSpec],
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Draft seeded from `record`: every editable field, defaulted when absent
    /// or null.
    pub fn seed(&self, record: &Map<String, Value>) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|field| {
                let value = match record.get(field.name) {
                    Some(Value::Null) | None => field.kind.default_value(),
                    Some(value) => value.clone(),
                };
                (field.name.to_string(), value)
            })
            .collect()
    }

    pub fn record_id(&self, record: &Map<String, Value>) -> Option<String> {
        let raw = record.get(self.id_field).or_else(|| record.get("_id"))?;
        match raw {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

/// Value equality that treats `5` and `5.0` alike and a missing value like
/// `null`.
pub fn values_equal(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (None | Some(Value::Null), None | Some(Value::Null)) => true,
        (Some(Value::Number(a)), Some(Value::Number(b))) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

pub const BANK_SCHEMA: FormSchema = FormSchema {
    resource: Resource::BANK,
    id_field: "id",
    fields: &[
        FieldSpec::new("bankName", FieldKind::Text, &[Rule::Required]),
        FieldSpec::new("accountHolderName", FieldKind::Text, &[Rule::Required]),
        FieldSpec::new("accountNumber", FieldKind::Text, &[Rule::Required]),
        FieldSpec::new(
            "ifscCode",
            FieldKind::Code,
            &[Rule::Required, Rule::RoutingCode],
        ),
        FieldSpec::new("branchName", FieldKind::Text, &[]),
    ],
};

pub const MEMBER_SCHEMA: FormSchema = FormSchema {
    resource: Resource::MEMBER,
    id_field: "id",
    fields: &[
        FieldSpec::new("name", FieldKind::Text, &[Rule::Required]),
        FieldSpec::new("email", FieldKind::Text, &[Rule::Email]),
        FieldSpec::new("phone", FieldKind::Text, &[Rule::Required, Rule::Phone]),
        FieldSpec::new("panNumber", FieldKind::Code, &[Rule::TaxId]),
        FieldSpec::new("aadhaarNumber", FieldKind::Text, &[Rule::NationalId]),
        FieldSpec::new(
            "walletBalance",
            FieldKind::Amount,
            &[Rule::NonNegativeAmount],
        ),
    ],
};

pub const LIMIT_SCHEMA: FormSchema = FormSchema {
    resource: Resource::LIMIT,
    id_field: "id",
    fields: &[
        FieldSpec::new("service", FieldKind::Text, &[Rule::Required]),
        FieldSpec::new("memberId", FieldKind::Text, &[]),
        FieldSpec::new("minAmount", FieldKind::Amount, &[Rule::NonNegativeAmount]),
        FieldSpec::new("maxAmount", FieldKind::Amount, &[Rule::NonNegativeAmount]),
        FieldSpec::new("dailyLimit", FieldKind::Amount, &[Rule::NonNegativeAmount]),
    ],
};

pub const TOPUP_SCHEMA: FormSchema = FormSchema {
    resource: Resource::TOPUP,
    id_field: "id",
    fields: &[
        FieldSpec::new("memberId", FieldKind::Text, &[Rule::Required]),
        FieldSpec::new("amount", FieldKind::Amount, &[Rule::PositiveAmount]),
        FieldSpec::new("remark", FieldKind::Text, &[]),
    ],
};

/// Schema for a resource that supports edit or create dialogs.
pub fn schema_for(resource: Resource) -> Option<&'static FormSchema> {
    [&BANK_SCHEMA, &MEMBER_SCHEMA, &LIMIT_SCHEMA, &TOPUP_SCHEMA]
        .into_iter()
        .find(|schema| schema.resource == resource)
}

#[cfg(test)]
#[path = "tests/schema_tests.rs"]
mod tests;
