//! Normalisation of the several response shapes the backend produces.
//!
//! List endpoints answer with a bare array, `{ data: [...] }`,
//! `{ data: { <resource>s: [...] } }` or `{ <resource>s: [...] }`. Record
//! endpoints nest the object under `data.<resource>`, `data`, or not at all.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shared::protocol::Resource;

use crate::error::ConsoleError;

type ListMatcher = fn(&Value, &Resource) -> Option<Vec<Value>>;
type RecordMatcher = fn(&Value, &Resource) -> Option<Map<String, Value>>;

const LIST_SHAPES: [ListMatcher; 4] = [bare_array, data_array, data_collection, top_collection];
const RECORD_SHAPES: [RecordMatcher; 3] = [data_record, data_object, bare_object];

fn bare_array(raw: &Value, _: &Resource) -> Option<Vec<Value>> {
    raw.as_array().cloned()
}

fn data_array(raw: &Value, _: &Resource) -> Option<Vec<Value>> {
    raw.get("data")?.as_array().cloned()
}

fn data_collection(raw: &Value, resource: &Resource) -> Option<Vec<Value>> {
    raw.get("data")?
        .get(resource.collection_key)?
        .as_array()
        .cloned()
}

fn top_collection(raw: &Value, resource: &Resource) -> Option<Vec<Value>> {
    raw.get(resource.collection_key)?.as_array().cloned()
}

fn data_record(raw: &Value, resource: &Resource) -> Option<Map<String, Value>> {
    raw.get("data")?
        .get(resource.record_key)?
        .as_object()
        .cloned()
}

fn data_object(raw: &Value, _: &Resource) -> Option<Map<String, Value>> {
    raw.get("data")?.as_object().cloned()
}

fn bare_object(raw: &Value, _: &Resource) -> Option<Map<String, Value>> {
    raw.as_object().cloned()
}

pub fn unwrap_list(raw: &Value, resource: &Resource) -> Result<Vec<Value>, ConsoleError> {
    LIST_SHAPES
        .iter()
        .find_map(|matcher| matcher(raw, resource))
        .ok_or_else(|| unexpected(resource))
}

pub fn unwrap_record(
    raw: &Value,
    resource: &Resource,
) -> Result<Map<String, Value>, ConsoleError> {
    RECORD_SHAPES
        .iter()
        .find_map(|matcher| matcher(raw, resource))
        .ok_or_else(|| unexpected(resource))
}

pub fn decode_list<T: DeserializeOwned>(
    raw: &Value,
    resource: &Resource,
) -> Result<Vec<T>, ConsoleError> {
    unwrap_list(raw, resource)?
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|_| unexpected(resource)))
        .collect()
}

pub fn decode_record<T: DeserializeOwned>(
    raw: &Value,
    resource: &Resource,
) -> Result<T, ConsoleError> {
    let record = unwrap_record(raw, resource)?;
    serde_json::from_value(Value::Object(record)).map_err(|_| unexpected(resource))
}

fn unexpected(resource: &Resource) -> ConsoleError {
    ConsoleError::UnexpectedShape {
        resource: resource.segment.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/envelope_tests.rs"]
mod tests;
