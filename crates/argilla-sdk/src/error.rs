//! Error types for the Argilla SDK.
//!
//! One error enum covers both server responses and client-side failures,
//! including the record mapping errors raised while ingesting raw records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mapping::SchemaKind;

/// The main error type for all SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request was malformed or contained invalid data.
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message describing what was invalid.
        message: String,
    },

    /// Authentication failed - invalid or missing API key.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// The authenticated user lacks permission for this operation.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Error message describing missing permissions.
        message: String,
    },

    /// The requested resource was not found.
    #[error("Not found: {resource_type} with id '{resource_id}'")]
    NotFound {
        /// Type of resource (e.g., "dataset", "record").
        resource_type: String,
        /// ID or name of the resource that was not found.
        resource_id: String,
    },

    /// The request conflicts with existing state.
    #[error("Conflict: {message}")]
    Conflict {
        /// Error message describing the conflict.
        message: String,
    },

    /// The server rejected the payload during validation.
    #[error("Unprocessable entity: {message}")]
    Unprocessable {
        /// Error message from the server.
        message: String,
    },

    /// Server-side error occurred.
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Error message from server.
        message: String,
    },

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Error building the client configuration.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message.
        message: String,
    },

    /// Error serializing request or deserializing response.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error while reading or writing a dataset archive.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Two schema items normalize to the same name.
    #[error("Duplicate schema name '{name}': declared as {first} and {second}")]
    DuplicateName {
        /// The normalized name shared by both items.
        name: String,
        /// Kind of the first declaration.
        first: SchemaKind,
        /// Kind of the conflicting declaration.
        second: SchemaKind,
    },

    /// A value violates the declared constraint of its schema item.
    #[error("Invalid value for '{key}': {message}")]
    TypeConstraint {
        /// The input key carrying the value.
        key: String,
        /// The violated constraint.
        message: String,
    },

    /// A response key was found but no user could be attributed.
    #[error("Cannot attribute response '{key}' to a user: no user id in the key and no default user id")]
    AmbiguousResponseAttribution {
        /// The response key.
        key: String,
    },

    /// Settings or records reference something the schema does not know.
    #[error("Schema error: {message}")]
    Schema {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a server error.
    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a type constraint error for an input key.
    pub fn type_constraint(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TypeConstraint {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code if applicable.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::Unprocessable { .. } => Some(422),
            Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for errors raised while mapping a single record.
    ///
    /// Batch callers use this to decide between skipping a record and
    /// aborting the whole batch.
    #[must_use]
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            Self::TypeConstraint { .. } | Self::AmbiguousResponseAttribution { .. }
        )
    }
}

/// Error body returned by the server.
///
/// The server reports errors as `{"detail": ...}` where the detail is either
/// a plain message or a structured `{code, params}` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error detail.
    pub detail: Value,
}

impl ApiError {
    /// Returns a human-readable message for the detail payload.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.detail {
            Value::String(message) => message.clone(),
            Value::Object(map) => match (map.get("code"), map.get("params")) {
                (Some(Value::String(code)), Some(params)) => format!("{code}: {params}"),
                _ => self.detail.to_string(),
            },
            other => other.to_string(),
        }
    }

    /// Converts this API error to an SDK error for the given status code.
    #[must_use]
    pub fn into_error(self, status: u16) -> Error {
        let message = self.message();

        match status {
            400 => Error::BadRequest { message },
            401 => Error::Unauthorized { message },
            403 => Error::Forbidden { message },
            404 => Error::NotFound {
                resource_type: "resource".to_string(),
                resource_id: message,
            },
            409 => Error::Conflict { message },
            422 => Error::Unprocessable { message },
            _ => Error::ServerError { status, message },
        }
    }
}

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;
