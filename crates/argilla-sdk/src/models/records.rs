//! Record models as exchanged with the server.
//!
//! These are the wire shapes. The schema-resolved view used for ingestion and
//! export is [`crate::record::Record`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A record returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordModel {
    /// Server identifier.
    pub id: Uuid,

    /// Caller-provided identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// Field values.
    #[serde(default)]
    pub fields: Map<String, Value>,

    /// Metadata values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,

    /// Vector values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vectors: Option<BTreeMap<String, Vec<f32>>>,

    /// Responses, one entry per user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<Vec<UserResponseModel>>,

    /// Suggestions, one entry per question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<SuggestionModel>>,

    /// Completion status.
    #[serde(default)]
    pub status: RecordStatus,

    /// Owning dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<Uuid>,

    /// When the record was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<DateTime<Utc>>,

    /// When the record was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Completion status of a record under the dataset's task distribution.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Still needs responses.
    #[default]
    Pending,
    /// Enough submitted responses.
    Completed,
}

/// Confidence score of a suggestion: one value, or one per element of a
/// multi-valued suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    /// A single score.
    Single(f64),
    /// One score per suggested value.
    Many(Vec<f64>),
}

impl Score {
    /// Parses a score from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns a message when the value is neither a number nor a list of numbers.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Number(number) => number
                .as_f64()
                .map(Self::Single)
                .ok_or_else(|| format!("score {number} is not representable as a float")),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_f64()
                        .ok_or_else(|| format!("expected a numeric score, got {item}"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Many),
            other => Err(format!("expected a score or list of scores, got {other}")),
        }
    }

    /// Converts the score to a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Single(score) => Value::from(*score),
            Self::Many(scores) => Value::from(scores.clone()),
        }
    }
}

/// Origin of a suggestion.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    /// Proposed by a model.
    #[default]
    Model,
    /// Proposed by a person.
    Human,
}

/// A suggestion as stored on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionModel {
    /// Server identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Question the suggestion answers.
    pub question_id: Uuid,

    /// Suggested value.
    pub value: Value,

    /// Confidence score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,

    /// Agent that produced the suggestion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    /// Origin of the suggestion.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SuggestionType>,
}

/// Status of a user's response.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// Saved but not submitted.
    #[default]
    Draft,
    /// Submitted.
    Submitted,
    /// The user discarded the record.
    Discarded,
}

impl std::fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Submitted => write!(f, "submitted"),
            Self::Discarded => write!(f, "discarded"),
        }
    }
}

impl std::str::FromStr for ResponseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "discarded" => Ok(Self::Discarded),
            _ => Err(format!("Unknown response status: {s}")),
        }
    }
}

/// The value given to one question inside a user response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseValue {
    /// Answer value.
    pub value: Value,
}

/// All answers of one user for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponseModel {
    /// Server identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Answers keyed by question name.
    #[serde(default)]
    pub values: BTreeMap<String, ResponseValue>,

    /// Response status.
    pub status: ResponseStatus,

    /// Author of the response.
    pub user_id: Uuid,

    /// When the response was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<DateTime<Utc>>,

    /// When the response was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request body for creating or replacing the current user's response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseUpsert {
    /// Answers keyed by question name.
    pub values: BTreeMap<String, ResponseValue>,

    /// Response status.
    pub status: ResponseStatus,
}

impl ResponseUpsert {
    /// Creates an empty response with the given status.
    #[must_use]
    pub fn new(status: ResponseStatus) -> Self {
        Self {
            values: BTreeMap::new(),
            status,
        }
    }

    /// Adds an answer.
    #[must_use]
    pub fn with_value(mut self, question: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(
            question.into(),
            ResponseValue {
                value: value.into(),
            },
        );
        self
    }
}

/// One item of a bulk create or upsert request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordUpsert {
    /// Server identifier of an existing record to update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Caller-provided identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// Field values.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,

    /// Metadata values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,

    /// Vector values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vectors: BTreeMap<String, Vec<f32>>,

    /// Suggestions.
    #[serde(default)]
    pub suggestions: Vec<SuggestionModel>,

    /// Responses grouped per user.
    #[serde(default)]
    pub responses: Vec<UserResponseModel>,
}

/// Bulk request body: `{"items": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsBulk<T> {
    /// Items of the request or response.
    pub items: Vec<T>,
}

/// A page of records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsPage {
    /// Records on this page.
    pub items: Vec<RecordModel>,

    /// Total number of records matching the listing.
    #[serde(default)]
    pub total: u64,
}

/// Full-text query over record fields.
#[derive(Debug, Clone, Serialize)]
pub struct TextQuery {
    /// Search terms.
    pub q: String,

    /// Restrict the search to one field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Search request body.
#[derive(Debug, Clone, Serialize)]
pub struct RecordSearch {
    /// Query part.
    pub query: SearchQuery,
}

/// Query part of a search request.
#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery {
    /// Text query.
    pub text: TextQuery,
}

impl RecordSearch {
    /// Creates a text search over all fields.
    #[must_use]
    pub fn text(q: impl Into<String>) -> Self {
        Self {
            query: SearchQuery {
                text: TextQuery {
                    q: q.into(),
                    field: None,
                },
            },
        }
    }

    /// Restricts the search to one field.
    #[must_use]
    pub fn in_field(mut self, field: impl Into<String>) -> Self {
        self.query.text.field = Some(field.into());
        self
    }
}

/// One search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Matching record.
    pub record: RecordModel,

    /// Relevance score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_score: Option<f64>,
}

/// A page of search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    /// Hits on this page.
    pub items: Vec<SearchHit>,

    /// Total number of hits.
    #[serde(default)]
    pub total: u64,
}
