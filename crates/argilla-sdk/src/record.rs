//! Schema-resolved records.
//!
//! A [`Record`] is what the mapper produces from a raw input dictionary and
//! what the flattener turns back into one. It addresses questions by name;
//! conversion to and from the wire shapes in [`crate::models`] translates
//! names to server ids through a [`SchemaRegistry`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::mapping::{SchemaKind, SchemaRegistry};
use crate::models::{
    RecordModel, RecordUpsert, ResponseStatus, ResponseValue, Score, SuggestionModel,
    UserResponseModel,
};

/// A suggested answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Question name.
    pub question_name: String,

    /// Suggested value.
    pub value: Value,

    /// Confidence score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,

    /// Producing agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

impl Suggestion {
    /// Creates a suggestion without score or agent.
    #[must_use]
    pub fn new(question_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            question_name: question_name.into(),
            value: value.into(),
            score: None,
            agent: None,
        }
    }

    /// Sets the score.
    #[must_use]
    pub fn with_score(mut self, score: Score) -> Self {
        self.score = Some(score);
        self
    }

    /// Sets the agent.
    #[must_use]
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }
}

/// One user's answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Question name.
    pub question_name: String,

    /// Answer value.
    pub value: Value,

    /// Author.
    pub user_id: Uuid,

    /// Status of the author's response.
    #[serde(default)]
    pub status: ResponseStatus,
}

impl Response {
    /// Creates a draft response.
    #[must_use]
    pub fn new(question_name: impl Into<String>, value: impl Into<Value>, user_id: Uuid) -> Self {
        Self {
            question_name: question_name.into(),
            value: value.into(),
            user_id,
            status: ResponseStatus::Draft,
        }
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: ResponseStatus) -> Self {
        self.status = status;
        self
    }
}

/// A record resolved against a dataset schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Server identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Caller identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// Field values.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,

    /// Metadata values.
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,

    /// Vector values.
    #[serde(default)]
    pub vectors: BTreeMap<String, Vec<f32>>,

    /// At most one suggestion per question.
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,

    /// At most one response per question and user.
    #[serde(default)]
    pub responses: Vec<Response>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the suggestion for a question.
    #[must_use]
    pub fn suggestion(&self, question: &str) -> Option<&Suggestion> {
        self.suggestions.iter().find(|s| s.question_name == question)
    }

    /// Returns the responses to a question, one per user.
    pub fn responses_to<'a>(&'a self, question: &'a str) -> impl Iterator<Item = &'a Response> {
        self.responses
            .iter()
            .filter(move |r| r.question_name == question)
    }

    /// Converts to a bulk upsert item.
    ///
    /// Question names become server ids and responses are grouped per user.
    /// The server keeps one status per user, so all answers of a user must
    /// share it.
    ///
    /// # Errors
    ///
    /// Returns a schema error when a question is unknown or has no server id,
    /// which happens for settings that were never published, and
    /// [`Error::TypeConstraint`] when one user's answers carry different
    /// statuses.
    pub fn to_upsert(&self, registry: &SchemaRegistry) -> Result<RecordUpsert> {
        let question_id = |name: &str| -> Result<Uuid> {
            let item = registry
                .lookup(name)
                .filter(|item| item.kind() == SchemaKind::Question)
                .ok_or_else(|| Error::schema(format!("unknown question '{name}'")))?;
            item.id
                .ok_or_else(|| Error::schema(format!("question '{name}' has no server id")))
        };

        let suggestions = self
            .suggestions
            .iter()
            .map(|s| {
                Ok(SuggestionModel {
                    id: None,
                    question_id: question_id(&s.question_name)?,
                    value: s.value.clone(),
                    score: s.score.clone(),
                    agent: s.agent.clone(),
                    kind: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut per_user: Vec<UserResponseModel> = Vec::new();
        for response in &self.responses {
            question_id(&response.question_name)?;
            let value = ResponseValue {
                value: response.value.clone(),
            };
            match per_user.iter_mut().find(|r| r.user_id == response.user_id) {
                Some(existing) if existing.status != response.status => {
                    return Err(Error::type_constraint(
                        format!("{}.response.{}.status", response.question_name, response.user_id),
                        format!(
                            "user {} answers with status '{}' elsewhere but '{}' here; \
                             a user has one status per record",
                            response.user_id, existing.status, response.status
                        ),
                    ));
                }
                Some(existing) => {
                    existing.values.insert(response.question_name.clone(), value);
                }
                None => per_user.push(UserResponseModel {
                    id: None,
                    values: BTreeMap::from([(response.question_name.clone(), value)]),
                    status: response.status,
                    user_id: response.user_id,
                    inserted_at: None,
                    updated_at: None,
                }),
            }
        }

        Ok(RecordUpsert {
            id: self.id,
            external_id: self.external_id.clone(),
            fields: self.fields.clone(),
            metadata: self.metadata.clone(),
            vectors: self.vectors.clone(),
            suggestions,
            responses: per_user,
        })
    }

    /// Builds a record from a fetched server record.
    ///
    /// Suggestions whose question id is not in the registry are skipped with
    /// a warning. Non-string field values are rendered as JSON text.
    #[must_use]
    pub fn from_model(model: RecordModel, registry: &SchemaRegistry) -> Self {
        let fields = model
            .fields
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(name, value)| {
                let text = match value {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                (name, text)
            })
            .collect();

        let suggestions = model
            .suggestions
            .unwrap_or_default()
            .into_iter()
            .filter_map(|s| match registry.question_name(&s.question_id) {
                Some(name) => Some(Suggestion {
                    question_name: name.to_string(),
                    value: s.value,
                    score: s.score,
                    agent: s.agent,
                }),
                None => {
                    warn!(
                        record_id = %model.id,
                        question_id = %s.question_id,
                        "Skipping suggestion for unknown question"
                    );
                    None
                }
            })
            .collect();

        let mut responses = Vec::new();
        for user_response in model.responses.unwrap_or_default() {
            for (question_name, answer) in user_response.values {
                responses.push(Response {
                    question_name,
                    value: answer.value,
                    user_id: user_response.user_id,
                    status: user_response.status,
                });
            }
        }
        responses.sort_by(|a, b| {
            (&a.question_name, a.user_id).cmp(&(&b.question_name, b.user_id))
        });

        Self {
            id: Some(model.id),
            external_id: model.external_id,
            fields,
            metadata: model
                .metadata
                .map(|m| m.into_iter().collect())
                .unwrap_or_default(),
            vectors: model.vectors.unwrap_or_default(),
            suggestions,
            responses,
        }
    }
}
