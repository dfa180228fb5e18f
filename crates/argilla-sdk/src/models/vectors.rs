//! Vector settings models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declares a fixed-dimension embedding attached to records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorSettings {
    /// Server identifier, unset until the settings are created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Vector name.
    pub name: String,

    /// Title shown in the UI.
    pub title: String,

    /// Number of components.
    pub dimensions: usize,

    /// Owning dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<Uuid>,

    /// When the settings were created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<DateTime<Utc>>,

    /// When the settings were last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl VectorSettings {
    /// Creates vector settings; the title defaults to the name.
    #[must_use]
    pub fn new(name: impl Into<String>, dimensions: usize) -> Self {
        let name = name.into();
        Self {
            id: None,
            title: name.clone(),
            name,
            dimensions,
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
}

/// Request to update vector settings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VectorSettingsUpdate {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
