//! Dataset settings.
//!
//! [`Settings`] is an immutable description of a dataset schema: fields,
//! questions, metadata properties and vectors plus the dataset-level options.
//! It is what gets published to the server, what the record mapper is built
//! from, and what a dataset archive persists next to its records.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::mapping::{normalize_name, SchemaRegistry};
use crate::models::{Field, MetadataProperty, Question, TaskDistribution, VectorSettings};

/// Complete schema of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Content fields.
    #[serde(default)]
    pub fields: Vec<Field>,

    /// Questions.
    #[serde(default)]
    pub questions: Vec<Question>,

    /// Metadata properties.
    #[serde(default)]
    pub metadata: Vec<MetadataProperty>,

    /// Vector settings.
    #[serde(default)]
    pub vectors: Vec<VectorSettings>,

    /// Annotation guidelines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidelines: Option<String>,

    /// Whether records may carry undeclared metadata.
    #[serde(default)]
    pub allow_extra_metadata: bool,

    /// Task distribution.
    #[serde(default)]
    pub distribution: TaskDistribution,
}

impl Settings {
    /// Creates empty settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a question.
    #[must_use]
    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    /// Adds a metadata property.
    #[must_use]
    pub fn with_metadata(mut self, property: MetadataProperty) -> Self {
        self.metadata.push(property);
        self
    }

    /// Adds vector settings.
    #[must_use]
    pub fn with_vector(mut self, vector: VectorSettings) -> Self {
        self.vectors.push(vector);
        self
    }

    /// Sets the guidelines.
    #[must_use]
    pub fn with_guidelines(mut self, guidelines: impl Into<String>) -> Self {
        self.guidelines = Some(guidelines.into());
        self
    }

    /// Sets the extra metadata policy.
    #[must_use]
    pub fn with_extra_metadata(mut self, allow: bool) -> Self {
        self.allow_extra_metadata = allow;
        self
    }

    /// Sets the task distribution.
    #[must_use]
    pub fn with_distribution(mut self, distribution: TaskDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Returns the question with the given name, compared the way the
    /// schema registry compares names.
    #[must_use]
    pub fn question(&self, name: &str) -> Option<&Question> {
        let name = normalize_name(name);
        self.questions.iter().find(|q| normalize_name(&q.name) == name)
    }

    /// Builds the schema registry used to map records.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DuplicateName`] when two items share a name.
    pub fn registry(&self) -> Result<SchemaRegistry> {
        SchemaRegistry::from_settings(self)
    }

    /// Checks the settings can be published.
    ///
    /// A dataset needs at least one field and one question, names must be
    /// unique across all kinds, and span questions must point at a declared
    /// text field.
    ///
    /// # Errors
    ///
    /// Returns a schema or duplicate-name error describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(crate::Error::schema("at least one field is required"));
        }
        if self.questions.is_empty() {
            return Err(crate::Error::schema("at least one question is required"));
        }

        self.registry()?;

        for question in &self.questions {
            if let crate::models::QuestionKind::Span { field, .. } = &question.settings {
                let field_name = normalize_name(field);
                let is_text_field = self.fields.iter().any(|f| {
                    normalize_name(&f.name) == field_name
                        && matches!(f.settings, crate::models::FieldKind::Text { .. })
                });
                if !is_text_field {
                    return Err(crate::Error::schema(format!(
                        "span question '{}' refers to unknown text field '{field}'",
                        question.name
                    )));
                }
            }
        }

        for vector in &self.vectors {
            if vector.dimensions == 0 {
                return Err(crate::Error::schema(format!(
                    "vector '{}' must have at least one dimension",
                    vector.name
                )));
            }
        }

        Ok(())
    }
}
