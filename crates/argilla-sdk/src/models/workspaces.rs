//! Workspace models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A workspace groups datasets and the users allowed to annotate them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    /// Unique identifier.
    pub id: Uuid,

    /// Workspace name.
    pub name: String,

    /// When the workspace was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<DateTime<Utc>>,

    /// When the workspace was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request to create a workspace.
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceCreate {
    /// Workspace name.
    pub name: String,
}

impl WorkspaceCreate {
    /// Creates a new workspace creation request.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
