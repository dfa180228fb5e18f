//! User models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user of the annotation platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,

    /// Login name.
    pub username: String,

    /// First name.
    pub first_name: String,

    /// Last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Role of the user.
    pub role: UserRole,

    /// When the user was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<DateTime<Utc>>,

    /// When the user was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Role of a user.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full control over the server.
    Owner,
    /// Manages the workspaces it belongs to.
    Admin,
    /// Submits responses.
    #[default]
    Annotator,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Admin => write!(f, "admin"),
            Self::Annotator => write!(f, "annotator"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "annotator" => Ok(Self::Annotator),
            _ => Err(format!("Unknown user role: {s}")),
        }
    }
}

/// Request to create a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserCreate {
    /// Login name.
    pub username: String,

    /// Password.
    pub password: String,

    /// First name.
    pub first_name: String,

    /// Last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Role.
    pub role: UserRole,
}

impl UserCreate {
    /// Creates a request for an annotator; the first name defaults to the username.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            first_name: username.clone(),
            username,
            password: password.into(),
            last_name: None,
            role: UserRole::default(),
        }
    }

    /// Sets first and last name.
    #[must_use]
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = Some(last.into());
        self
    }

    /// Sets the role.
    #[must_use]
    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }
}
