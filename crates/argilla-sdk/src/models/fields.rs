//! Field models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A field holds the content annotators look at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Server identifier, unset until the field is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Field name.
    pub name: String,

    /// Title shown in the UI.
    pub title: String,

    /// Whether every record must provide a value.
    #[serde(default = "default_required")]
    pub required: bool,

    /// Kind-specific settings.
    pub settings: FieldKind,

    /// Owning dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<Uuid>,

    /// When the field was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<DateTime<Utc>>,

    /// When the field was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_required() -> bool {
    true
}

/// Kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Plain or markdown text.
    Text {
        /// Render the value as markdown.
        #[serde(default)]
        use_markdown: bool,
    },
    /// An image URL or data URI.
    Image,
}

impl Field {
    /// Creates a required text field.
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text { use_markdown: false })
    }

    /// Creates a required image field.
    #[must_use]
    pub fn image(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Image)
    }

    /// Creates a required field of the given kind; the title defaults to the name.
    #[must_use]
    pub fn new(name: impl Into<String>, settings: FieldKind) -> Self {
        let name = name.into();
        Self {
            id: None,
            title: name.clone(),
            name,
            required: true,
            settings,
            dataset_id: None,
            inserted_at: None,
            updated_at: None,
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets whether the field is required.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Request to update a field.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldUpdate {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<FieldKind>,
}
