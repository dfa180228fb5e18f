//! Record flattener: the inverse of the assembler.
//!
//! Flat output uses exactly the raw keys the router understands, so
//! assembling a flattened record with the same registry gives the record
//! back. Nested output groups the same data by section and is the on-disk
//! form.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::warn;

use super::schema::{normalize_name, SchemaKind, SchemaRegistry};
use crate::record::Record;

const IDENTITY_KEYS: [&str; 2] = ["id", "external_id"];

/// Shape of flattened output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlattenMode {
    /// One level of dotted keys.
    #[default]
    Flat,
    /// Sections for fields, metadata, vectors, suggestions and responses.
    Nested,
}

/// Flattens records against a schema.
#[derive(Debug, Clone, Copy)]
pub struct RecordFlattener<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> RecordFlattener<'a> {
    /// Creates a flattener.
    #[must_use]
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Flattens one record.
    ///
    /// Every declared field, metadata property and vector appears, `null`
    /// when the record has no value. In flat mode every question also gets
    /// its suggestion, score and agent keys.
    #[must_use]
    pub fn flatten(&self, record: &Record, mode: FlattenMode) -> Map<String, Value> {
        match mode {
            FlattenMode::Flat => self.flat(record),
            FlattenMode::Nested => self.nested(record),
        }
    }

    /// Flattens many records so that every row has the same keys.
    #[must_use]
    pub fn flatten_batch(&self, records: &[Record], mode: FlattenMode) -> Vec<Map<String, Value>> {
        let mut rows: Vec<_> = records.iter().map(|r| self.flatten(r, mode)).collect();

        let columns: BTreeSet<String> = rows.iter().flat_map(|row| row.keys().cloned()).collect();
        for row in &mut rows {
            for column in &columns {
                if !row.contains_key(column) {
                    row.insert(column.clone(), Value::Null);
                }
            }
        }
        rows
    }

    fn flat(&self, record: &Record) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("id".into(), identity(record));
        out.insert("external_id".into(), external_id(record));

        self.insert_values(&mut out, record);

        for question in self.registry.items_of(SchemaKind::Question) {
            let name = &question.name;
            let suggestion = record.suggestion(name);
            out.insert(
                format!("{name}.suggestion"),
                suggestion.map(|s| s.value.clone()).unwrap_or(Value::Null),
            );
            out.insert(
                format!("{name}.suggestion.score"),
                suggestion
                    .and_then(|s| s.score.as_ref())
                    .map(|score| score.to_value())
                    .unwrap_or(Value::Null),
            );
            out.insert(
                format!("{name}.suggestion.agent"),
                suggestion
                    .and_then(|s| s.agent.clone())
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            );

            for response in record.responses_to(name) {
                let key = format!("{name}.response.{}", response.user_id);
                out.insert(
                    format!("{key}.status"),
                    Value::String(response.status.to_string()),
                );
                out.insert(key, response.value.clone());
            }
        }
        out
    }

    fn insert_values(&self, out: &mut Map<String, Value>, record: &Record) {
        for field in self.registry.items_of(SchemaKind::Field) {
            let value = record
                .fields
                .get(&field.name)
                .map(|text| Value::String(text.clone()))
                .unwrap_or(Value::Null);
            out.insert(field.name.clone(), value);
        }

        for property in self.registry.items_of(SchemaKind::MetadataProperty) {
            let value = record
                .metadata
                .get(&property.name)
                .cloned()
                .unwrap_or(Value::Null);
            out.insert(property.name.clone(), value);
        }

        for vector in self.registry.items_of(SchemaKind::Vector) {
            let value = record
                .vectors
                .get(&vector.name)
                .map(|v| Value::from(v.clone()))
                .unwrap_or(Value::Null);
            out.insert(vector.name.clone(), value);
        }

        // Extra metadata never shadows a schema item or an identity key.
        for (name, value) in &record.metadata {
            match self.registry.lookup(name) {
                Some(item)
                    if item.kind() == SchemaKind::MetadataProperty && item.name == *name => {}
                Some(item) => {
                    warn!(
                        metadata = %name,
                        shadows = %item.name,
                        "Dropping extra metadata that collides with a schema item"
                    );
                }
                None if IDENTITY_KEYS.contains(&normalize_name(name).as_str()) => {
                    warn!(metadata = %name, "Dropping extra metadata named like an identity key");
                }
                None => {
                    out.insert(name.clone(), value.clone());
                }
            }
        }
    }

    fn nested(&self, record: &Record) -> Map<String, Value> {
        let mut values = Map::new();
        self.insert_values(&mut values, record);

        let mut fields = Map::new();
        let mut metadata = Map::new();
        let mut vectors = Map::new();
        for (name, value) in values {
            match self.registry.lookup(&name).map(|item| item.kind()) {
                Some(SchemaKind::Field) => fields.insert(name, value),
                Some(SchemaKind::Vector) => vectors.insert(name, value),
                _ => metadata.insert(name, value),
            };
        }

        let mut suggestions = Map::new();
        for suggestion in &record.suggestions {
            let mut entry = Map::new();
            entry.insert("value".into(), suggestion.value.clone());
            entry.insert(
                "score".into(),
                suggestion
                    .score
                    .as_ref()
                    .map(|score| score.to_value())
                    .unwrap_or(Value::Null),
            );
            entry.insert(
                "agent".into(),
                suggestion
                    .agent
                    .clone()
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            );
            suggestions.insert(suggestion.question_name.clone(), Value::Object(entry));
        }

        let mut responses = Map::new();
        for response in &record.responses {
            let mut entry = Map::new();
            entry.insert("value".into(), response.value.clone());
            entry.insert("user_id".into(), Value::String(response.user_id.to_string()));
            entry.insert("status".into(), Value::String(response.status.to_string()));

            let list = responses
                .entry(response.question_name.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = list {
                items.push(Value::Object(entry));
            }
        }

        let mut out = Map::new();
        out.insert("id".into(), identity(record));
        out.insert("external_id".into(), external_id(record));
        out.insert("fields".into(), Value::Object(fields));
        out.insert("metadata".into(), Value::Object(metadata));
        out.insert("vectors".into(), Value::Object(vectors));
        out.insert("suggestions".into(), Value::Object(suggestions));
        out.insert("responses".into(), Value::Object(responses));
        out
    }
}

fn identity(record: &Record) -> Value {
    record
        .id
        .map(|id| Value::String(id.to_string()))
        .unwrap_or(Value::Null)
}

fn external_id(record: &Record) -> Value {
    record
        .external_id
        .clone()
        .map(Value::String)
        .unwrap_or(Value::Null)
}

/// Converts a nested record back to raw keys the assembler accepts.
///
/// Unknown sections and malformed entries are dropped.
#[must_use]
pub fn raw_from_nested(nested: &Map<String, Value>) -> Map<String, Value> {
    let mut raw = Map::new();

    for key in ["id", "external_id"] {
        if let Some(value) = nested.get(key) {
            raw.insert(key.to_string(), value.clone());
        }
    }

    for section in ["fields", "metadata", "vectors"] {
        if let Some(Value::Object(values)) = nested.get(section) {
            for (name, value) in values {
                raw.insert(name.clone(), value.clone());
            }
        }
    }

    if let Some(Value::Object(suggestions)) = nested.get("suggestions") {
        for (question, entry) in suggestions {
            let Value::Object(entry) = entry else { continue };
            for (attribute, suffix) in [
                ("value", "suggestion"),
                ("score", "suggestion.score"),
                ("agent", "suggestion.agent"),
            ] {
                if let Some(value) = entry.get(attribute) {
                    raw.insert(format!("{question}.{suffix}"), value.clone());
                }
            }
        }
    }

    if let Some(Value::Object(responses)) = nested.get("responses") {
        for (question, entries) in responses {
            let Value::Array(entries) = entries else { continue };
            for entry in entries {
                let Some(user_id) = entry.get("user_id").and_then(Value::as_str) else {
                    continue;
                };
                let key = format!("{question}.response.{user_id}");
                if let Some(status) = entry.get("status") {
                    raw.insert(format!("{key}.status"), status.clone());
                }
                if let Some(value) = entry.get("value") {
                    raw.insert(key, value.clone());
                }
            }
        }
    }

    raw
}
