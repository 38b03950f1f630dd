//! Collection codec: canonical JSON text <-> typed records.
//!
//! # Responsibility
//! - Revive creation timestamps from their textual (or legacy numeric) form.
//! - Treat `null` fields as absent so record defaults apply.
//! - Collapse tag references to bare ids, whether stored as plain strings
//!   or as legacy embedded `{id, tagName}` objects.
//!
//! # Invariants
//! - `encode(decode(x))` is stable once tag normalization has been applied.
//! - Decoding never panics; a malformed value is a `CodecError`, a malformed
//!   record is reported in `DecodedCollection::rejected`.

use crate::model::dates;
use chrono::{TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TAGS_FIELD: &str = "tags";
const CREATE_DATE_FIELD: &str = "createDate";

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    /// Top-level value was valid JSON but not an array of records.
    NotAnArray(&'static str),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "{err}"),
            Self::NotAnArray(found) => write!(f, "expected a JSON array of records, found {found}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::NotAnArray(_) => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Records decoded from one stored collection value.
#[derive(Debug)]
pub struct DecodedCollection<T> {
    pub records: Vec<T>,
    /// Elements that could not be read as a record, by array index.
    pub rejected: Vec<(usize, serde_json::Error)>,
}

/// Decodes a stored collection value into typed records.
///
/// A value that is not a JSON array fails as a whole. Inside the array each
/// element is decoded on its own, so one unreadable record does not take the
/// rest of the collection with it.
pub fn decode_collection<T: DeserializeOwned>(raw: &str) -> CodecResult<DecodedCollection<T>> {
    let items = match serde_json::from_str::<Value>(raw)? {
        Value::Array(items) => items,
        other => return Err(CodecError::NotAnArray(json_kind(&other))),
    };

    let mut decoded = DecodedCollection {
        records: Vec::with_capacity(items.len()),
        rejected: Vec::new(),
    };
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value(normalize_record(item)) {
            Ok(record) => decoded.records.push(record),
            Err(err) => decoded.rejected.push((index, err)),
        }
    }
    Ok(decoded)
}

/// Encodes records into the canonical stored form.
pub fn encode_collection<T: Serialize>(items: &[T]) -> CodecResult<String> {
    Ok(serde_json::to_string(items)?)
}

/// Maps a stored tag collection to ordered, de-duplicated bare ids.
///
/// Elements that are neither strings nor objects with a string `id` are
/// dropped.
pub fn normalize_tag_refs(value: &Value) -> Vec<String> {
    let Value::Array(elements) = value else {
        return Vec::new();
    };

    let mut ids: Vec<String> = Vec::with_capacity(elements.len());
    for element in elements {
        let id = match element {
            Value::String(id) => Some(id.as_str()),
            Value::Object(fields) => fields.get("id").and_then(Value::as_str),
            _ => None,
        };
        if let Some(id) = id {
            if !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        }
    }
    ids
}

fn normalize_record(mut record: Value) -> Value {
    if let Value::Object(fields) = &mut record {
        // Older writers left `null` where a value was unset; absent fields
        // fall back to their defaults.
        fields.retain(|_, value| !value.is_null());
        normalize_tags_field(fields);
        normalize_create_date_field(fields);
    }
    record
}

fn normalize_tags_field(fields: &mut Map<String, Value>) {
    if let Some(tags) = fields.get_mut(TAGS_FIELD) {
        let ids = normalize_tag_refs(tags);
        *tags = Value::Array(ids.into_iter().map(Value::String).collect());
    }
}

fn normalize_create_date_field(fields: &mut Map<String, Value>) {
    match fields.get(CREATE_DATE_FIELD) {
        Some(Value::Number(millis)) => {
            let revived = millis
                .as_i64()
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
                .map(|instant| Value::String(dates::format_instant(&instant)));
            match revived {
                Some(text) => {
                    fields.insert(CREATE_DATE_FIELD.to_string(), text);
                }
                None => {
                    fields.remove(CREATE_DATE_FIELD);
                }
            }
        }
        _ => {}
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
