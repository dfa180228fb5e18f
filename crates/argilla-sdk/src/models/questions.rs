//! Question models.
//!
//! Each question kind has its own settings shape. They are modelled as the
//! closed [`QuestionKind`] enum, internally tagged on `type` exactly as the
//! server encodes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A question asks annotators (or models) for a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Server identifier, unset until the question is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Question name.
    pub name: String,

    /// Title shown in the UI.
    pub title: String,

    /// Optional help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether a submitted response must answer it.
    #[serde(default = "default_required")]
    pub required: bool,

    /// Kind-specific settings.
    pub settings: QuestionKind,

    /// Owning dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<Uuid>,

    /// When the question was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<DateTime<Utc>>,

    /// When the question was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_required() -> bool {
    true
}

/// A selectable option of a label, multi-label, ranking or span question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelOption {
    /// Stored value.
    pub value: String,

    /// Displayed text.
    pub text: String,

    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LabelOption {
    /// Creates an option whose text equals its value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            text: value.clone(),
            value,
            description: None,
        }
    }
}

/// A rating option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingOption {
    /// Rating value.
    pub value: i64,
}

/// Order in which multi-label options are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionsOrder {
    /// Declaration order.
    #[default]
    Natural,
    /// Suggested labels first.
    Suggestion,
}

/// Kind of a question, with its kind-specific settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Free text answer.
    Text {
        /// Render the answer as markdown.
        #[serde(default)]
        use_markdown: bool,
    },
    /// Exactly one label.
    LabelSelection {
        /// Available labels.
        options: Vec<LabelOption>,
        /// Number of options shown before collapsing.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        visible_options: Option<u32>,
    },
    /// Any number of labels.
    MultiLabelSelection {
        /// Available labels.
        options: Vec<LabelOption>,
        /// Number of options shown before collapsing.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        visible_options: Option<u32>,
        /// Display order.
        #[serde(default)]
        options_order: OptionsOrder,
    },
    /// A single integer rating.
    Rating {
        /// Allowed ratings.
        options: Vec<RatingOption>,
    },
    /// An ordering of the options.
    Ranking {
        /// Items to rank.
        options: Vec<LabelOption>,
    },
    /// Labelled character spans over a text field.
    Span {
        /// Field the spans refer to.
        field: String,
        /// Span labels.
        options: Vec<LabelOption>,
        /// Whether spans may overlap.
        #[serde(default)]
        allow_overlapping: bool,
        /// Number of options shown before collapsing.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        visible_options: Option<u32>,
    },
}

impl QuestionKind {
    /// Wire name of the kind.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::LabelSelection { .. } => "label_selection",
            Self::MultiLabelSelection { .. } => "multi_label_selection",
            Self::Rating { .. } => "rating",
            Self::Ranking { .. } => "ranking",
            Self::Span { .. } => "span",
        }
    }

    /// Checks that a suggestion or response value has the shape this kind
    /// expects.
    ///
    /// # Errors
    ///
    /// Returns a message describing the violated constraint.
    pub fn check_value(&self, value: &Value) -> Result<(), String> {
        match self {
            Self::Text { .. } => match value {
                Value::String(_) => Ok(()),
                other => Err(format!("expected a text value, got {other}")),
            },
            Self::LabelSelection { options, .. } => {
                let label = value
                    .as_str()
                    .ok_or_else(|| format!("expected a label, got {value}"))?;
                check_label(options, label)
            }
            Self::MultiLabelSelection { options, .. } => {
                let labels = value
                    .as_array()
                    .ok_or_else(|| format!("expected a list of labels, got {value}"))?;
                for label in labels {
                    let label = label
                        .as_str()
                        .ok_or_else(|| format!("expected a label, got {label}"))?;
                    check_label(options, label)?;
                }
                Ok(())
            }
            Self::Rating { options } => {
                let rating = value
                    .as_i64()
                    .ok_or_else(|| format!("expected an integer rating, got {value}"))?;
                if options.iter().any(|option| option.value == rating) {
                    Ok(())
                } else {
                    Err(format!("rating {rating} is not one of the allowed options"))
                }
            }
            Self::Ranking { .. } => match value {
                Value::Array(_) => Ok(()),
                other => Err(format!("expected a ranking list, got {other}")),
            },
            Self::Span { .. } => match value {
                Value::Array(spans) if spans.iter().all(Value::is_object) => Ok(()),
                other => Err(format!("expected a list of spans, got {other}")),
            },
        }
    }
}

fn check_label(options: &[LabelOption], label: &str) -> Result<(), String> {
    if options.iter().any(|option| option.value == label) {
        Ok(())
    } else {
        Err(format!("label '{label}' is not one of the declared options"))
    }
}

impl Question {
    /// Creates a required question; the title defaults to the name.
    #[must_use]
    pub fn new(name: impl Into<String>, settings: QuestionKind) -> Self {
        let name = name.into();
        Self {
            id: None,
            title: name.clone(),
            name,
            description: None,
            required: true,
            settings,
            dataset_id: None,
            inserted_at: None,
            updated_at: None,
        }
    }

    /// Creates a free text question.
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, QuestionKind::Text { use_markdown: false })
    }

    /// Creates a single-label question.
    #[must_use]
    pub fn label<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            QuestionKind::LabelSelection {
                options: labels.into_iter().map(LabelOption::new).collect(),
                visible_options: None,
            },
        )
    }

    /// Creates a multi-label question.
    #[must_use]
    pub fn multi_label<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            QuestionKind::MultiLabelSelection {
                options: labels.into_iter().map(LabelOption::new).collect(),
                visible_options: None,
                options_order: OptionsOrder::default(),
            },
        )
    }

    /// Creates a rating question.
    #[must_use]
    pub fn rating(name: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        Self::new(
            name,
            QuestionKind::Rating {
                options: values.into_iter().map(|value| RatingOption { value }).collect(),
            },
        )
    }

    /// Creates a ranking question.
    #[must_use]
    pub fn ranking<I, S>(name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            QuestionKind::Ranking {
                options: items.into_iter().map(LabelOption::new).collect(),
            },
        )
    }

    /// Creates a span question over a text field.
    #[must_use]
    pub fn span<I, S>(name: impl Into<String>, field: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            QuestionKind::Span {
                field: field.into(),
                options: labels.into_iter().map(LabelOption::new).collect(),
                allow_overlapping: false,
                visible_options: None,
            },
        )
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets whether the question is required.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Request to update a question.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuestionUpdate {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// New settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<QuestionKind>,
}
