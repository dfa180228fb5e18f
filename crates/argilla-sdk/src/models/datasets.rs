//! Dataset models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dataset in a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Unique identifier.
    pub id: Uuid,

    /// Dataset name, unique within its workspace.
    pub name: String,

    /// Annotation guidelines shown to annotators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidelines: Option<String>,

    /// Dataset status.
    #[serde(default)]
    pub status: DatasetStatus,

    /// Whether records may carry metadata not declared in the settings.
    #[serde(default)]
    pub allow_extra_metadata: bool,

    /// How records are distributed among annotators.
    #[serde(default)]
    pub distribution: TaskDistribution,

    /// Owning workspace.
    pub workspace_id: Uuid,

    /// Last time a record or response changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<DateTime<Utc>>,

    /// When the dataset was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<DateTime<Utc>>,

    /// When the dataset was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Dataset status.
///
/// A dataset is created as a draft; fields and questions can only be added
/// while it is a draft, and records can only be added once it is published.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatasetStatus {
    /// Settings are still being defined.
    #[default]
    Draft,
    /// Published and accepting records.
    Ready,
}

impl std::fmt::Display for DatasetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

/// Task distribution strategy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum TaskDistribution {
    /// Every record is shown to annotators until it has `min_submitted`
    /// submitted responses.
    Overlap {
        /// Submitted responses needed to complete a record.
        min_submitted: u32,
    },
}

impl Default for TaskDistribution {
    fn default() -> Self {
        Self::Overlap { min_submitted: 1 }
    }
}

/// Request to create a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetCreate {
    /// Dataset name.
    pub name: String,

    /// Target workspace.
    pub workspace_id: Uuid,

    /// Annotation guidelines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidelines: Option<String>,

    /// Whether extra metadata is allowed.
    #[serde(default)]
    pub allow_extra_metadata: bool,

    /// Task distribution.
    #[serde(default)]
    pub distribution: TaskDistribution,
}

impl DatasetCreate {
    /// Creates a new dataset creation request.
    #[must_use]
    pub fn new(name: impl Into<String>, workspace_id: Uuid) -> Self {
        Self {
            name: name.into(),
            workspace_id,
            guidelines: None,
            allow_extra_metadata: false,
            distribution: TaskDistribution::default(),
        }
    }

    /// Sets the guidelines.
    #[must_use]
    pub fn with_guidelines(mut self, guidelines: impl Into<String>) -> Self {
        self.guidelines = Some(guidelines.into());
        self
    }

    /// Allows metadata not declared in the settings.
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
}

/// Request to update a dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New guidelines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidelines: Option<String>,

    /// New extra metadata policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_extra_metadata: Option<bool>,

    /// New task distribution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<TaskDistribution>,
}

impl DatasetUpdate {
    /// Creates a new dataset update request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
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
        self.allow_extra_metadata = Some(allow);
        self
    }

    /// Sets the task distribution.
    #[must_use]
    pub fn with_distribution(mut self, distribution: TaskDistribution) -> Self {
        self.distribution = Some(distribution);
        self
    }
}
