//! Record assembler: builds a [`Record`] from one raw input dictionary.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use super::router::{IdentityKind, KeyRouter, RenameMapping, RouteDecision, UnroutableReason};
use super::schema::{SchemaRegistry, TypeDetails};
use crate::error::{Error, Result};
use crate::models::{ResponseStatus, Score};
use crate::record::{Record, Response, Suggestion};

/// Why a key was left out of an assembled record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The key could not be routed.
    Unroutable(UnroutableReason),
    /// A score, agent or status arrived without the value it belongs to.
    MissingValue,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unroutable(reason) => write!(f, "{reason}"),
            Self::MissingValue => write!(f, "no value was given for this suggestion or response"),
        }
    }
}

/// A key that did not contribute to the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedKey {
    /// Original input key.
    pub key: String,

    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Result of assembling one raw record.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembled {
    /// The structured record.
    pub record: Record,

    /// Keys that were not used.
    pub skipped: Vec<SkippedKey>,
}

#[derive(Default)]
struct PendingSuggestion {
    value: Option<Value>,
    score: Option<Score>,
    agent: Option<String>,
    keys: Vec<String>,
}

#[derive(Default)]
struct PendingResponse {
    value: Option<Value>,
    status: Option<ResponseStatus>,
    keys: Vec<String>,
}

/// Builds structured records from raw dictionaries.
///
/// Keys are processed in input order, but suggestion and response parts are
/// collected per question (and per user) first, so a score may precede its
/// value.
#[derive(Debug, Clone)]
pub struct RecordAssembler<'a> {
    registry: &'a SchemaRegistry,
    mapping: RenameMapping,
    default_user_id: Option<Uuid>,
    generate_external_id: bool,
}

impl<'a> RecordAssembler<'a> {
    /// Creates an assembler without rename mapping or default user.
    #[must_use]
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            mapping: RenameMapping::default(),
            default_user_id: None,
            generate_external_id: true,
        }
    }

    /// Sets the rename mapping.
    #[must_use]
    pub fn with_mapping(mut self, mapping: RenameMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Sets the user that unattributed responses belong to.
    #[must_use]
    pub fn with_default_user(mut self, user_id: Uuid) -> Self {
        self.default_user_id = Some(user_id);
        self
    }

    /// Keeps the identity found in the input as is: a record without an
    /// external id stays without one.
    #[must_use]
    pub fn preserve_identity(mut self) -> Self {
        self.generate_external_id = false;
        self
    }

    /// Assembles one raw record.
    ///
    /// `null` values are treated as absent. A record without an external id
    /// gets a generated one unless [`Self::preserve_identity`] is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeConstraint`] when a value does not satisfy its
    /// schema item, and [`Error::AmbiguousResponseAttribution`] when a
    /// response has no user and no default user is configured.
    pub fn assemble(&self, raw: &Map<String, Value>) -> Result<Assembled> {
        let router = KeyRouter::new(self.registry, &self.mapping);
        let mut record = Record::new();
        let mut skipped = Vec::new();
        let mut suggestions: BTreeMap<String, PendingSuggestion> = BTreeMap::new();
        let mut responses: BTreeMap<(String, Uuid), PendingResponse> = BTreeMap::new();

        for (key, value) in raw {
            if value.is_null() {
                continue;
            }

            match router.route(key) {
                RouteDecision::ToIdentity(IdentityKind::Id) => {
                    record.id = Some(parse_id(key, value)?);
                }
                RouteDecision::ToIdentity(IdentityKind::ExternalId) => {
                    record.external_id = Some(parse_external_id(key, value)?);
                }
                RouteDecision::ToField(name) => {
                    let text = field_text(key, value)?;
                    record.fields.insert(name, text);
                }
                RouteDecision::ToMetadata(name) => {
                    if let Some(TypeDetails::MetadataProperty(kind)) = self.details(&name) {
                        kind.check_value(value)
                            .map_err(|message| Error::type_constraint(key, message))?;
                    }
                    record.metadata.insert(name, value.clone());
                }
                RouteDecision::ToVector(name) => {
                    let dimensions = match self.details(&name) {
                        Some(TypeDetails::Vector { dimensions }) => Some(*dimensions),
                        _ => None,
                    };
                    let vector = parse_vector(key, value, dimensions)?;
                    record.vectors.insert(name, vector);
                }
                RouteDecision::ToSuggestionValue(question) => {
                    if let Some(TypeDetails::Question(kind)) = self.details(&question) {
                        kind.check_value(value)
                            .map_err(|message| Error::type_constraint(key, message))?;
                    }
                    let entry = suggestions.entry(question).or_default();
                    entry.value = Some(value.clone());
                    entry.keys.push(key.clone());
                }
                RouteDecision::ToSuggestionScore(question) => {
                    let score = Score::from_value(value)
                        .map_err(|message| Error::type_constraint(key, message))?;
                    let entry = suggestions.entry(question).or_default();
                    entry.score = Some(score);
                    entry.keys.push(key.clone());
                }
                RouteDecision::ToSuggestionAgent(question) => {
                    let agent = value
                        .as_str()
                        .ok_or_else(|| {
                            Error::type_constraint(key, format!("expected an agent name, got {value}"))
                        })?
                        .to_string();
                    let entry = suggestions.entry(question).or_default();
                    entry.agent = Some(agent);
                    entry.keys.push(key.clone());
                }
                RouteDecision::ToResponseValue { question, user_id } => {
                    let user_id = self.attribute(key, &question, user_id)?;
                    if let Some(TypeDetails::Question(kind)) = self.details(&question) {
                        kind.check_value(value)
                            .map_err(|message| Error::type_constraint(key, message))?;
                    }
                    let entry = responses.entry((question, user_id)).or_default();
                    entry.value = Some(value.clone());
                    entry.keys.push(key.clone());
                }
                RouteDecision::ToResponseStatus { question, user_id } => {
                    let user_id = self.attribute(key, &question, user_id)?;
                    let status = value
                        .as_str()
                        .ok_or_else(|| format!("expected a response status, got {value}"))
                        .and_then(|s| s.parse::<ResponseStatus>())
                        .map_err(|message| Error::type_constraint(key, message))?;
                    let entry = responses.entry((question, user_id)).or_default();
                    entry.status = Some(status);
                    entry.keys.push(key.clone());
                }
                RouteDecision::Unroutable(reason) => {
                    warn!(key = %key, reason = %reason, "Skipping unroutable key");
                    skipped.push(SkippedKey {
                        key: key.clone(),
                        reason: SkipReason::Unroutable(reason),
                    });
                }
            }
        }

        for (question_name, pending) in suggestions {
            match pending.value {
                Some(value) => record.suggestions.push(Suggestion {
                    question_name,
                    value,
                    score: pending.score,
                    agent: pending.agent,
                }),
                None => skip_missing_value(&mut skipped, pending.keys),
            }
        }

        for ((question_name, user_id), pending) in responses {
            match pending.value {
                Some(value) => record.responses.push(Response {
                    question_name,
                    value,
                    user_id,
                    status: pending.status.unwrap_or_default(),
                }),
                None => skip_missing_value(&mut skipped, pending.keys),
            }
        }

        if self.generate_external_id && record.external_id.is_none() {
            record.external_id = Some(Uuid::new_v4().to_string());
        }

        debug!(
            external_id = ?record.external_id,
            fields = record.fields.len(),
            suggestions = record.suggestions.len(),
            responses = record.responses.len(),
            skipped = skipped.len(),
            "Assembled record"
        );

        Ok(Assembled { record, skipped })
    }

    /// Assembles each raw record independently.
    ///
    /// The caller decides whether a failed record aborts the batch.
    pub fn assemble_batch(&self, raws: &[Map<String, Value>]) -> Vec<Result<Assembled>> {
        raws.iter().map(|raw| self.assemble(raw)).collect()
    }

    fn details(&self, name: &str) -> Option<&'a TypeDetails> {
        self.registry.lookup(name).map(|item| &item.details)
    }

    fn attribute(&self, key: &str, question: &str, user_id: Option<Uuid>) -> Result<Uuid> {
        user_id
            .or(self.default_user_id)
            .ok_or_else(|| Error::AmbiguousResponseAttribution {
                key: format!("{key} ({question})"),
            })
    }
}

fn skip_missing_value(skipped: &mut Vec<SkippedKey>, keys: Vec<String>) {
    for key in keys {
        warn!(key = %key, "Skipping key without a value");
        skipped.push(SkippedKey {
            key,
            reason: SkipReason::MissingValue,
        });
    }
}

fn parse_id(key: &str, value: &Value) -> Result<Uuid> {
    value
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| Error::type_constraint(key, format!("expected a UUID, got {value}")))
}

fn parse_external_id(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(Error::type_constraint(
            key,
            format!("expected a string or number, got {other}"),
        )),
    }
}

fn field_text(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(Error::type_constraint(
            key,
            format!("expected a text value, got {other}"),
        )),
    }
}

fn parse_vector(key: &str, value: &Value, dimensions: Option<usize>) -> Result<Vec<f32>> {
    let items = value
        .as_array()
        .ok_or_else(|| Error::type_constraint(key, format!("expected a list of numbers, got {value}")))?;

    let vector = items
        .iter()
        .map(|item| {
            item.as_f64()
                .map(|x| x as f32)
                .ok_or_else(|| Error::type_constraint(key, format!("expected a number, got {item}")))
        })
        .collect::<Result<Vec<f32>>>()?;

    if let Some(dimensions) = dimensions {
        if vector.len() != dimensions {
            return Err(Error::type_constraint(
                key,
                format!("expected {dimensions} dimensions, got {}", vector.len()),
            ));
        }
    }
    Ok(vector)
}
