//! Key router: classifies one flat input key against the schema.
//!
//! A key is first renamed through the [`RenameMapping`] (if it has an entry),
//! giving a descriptor. Descriptors are either `id` / `external_id`, a bare
//! schema name, or a dotted path into a question:
//!
//! | descriptor | route |
//! |---|---|
//! | `<question>` | suggestion value |
//! | `<question>.suggestion[.value]` | suggestion value |
//! | `<question>.suggestion.score` | suggestion score |
//! | `<question>.suggestion.agent` | suggestion agent |
//! | `<question>.response[.value]` | response value of the default user |
//! | `<question>.response.status` | response status of the default user |
//! | `<question>.response.<user_id>[.value]` | response value of that user |
//! | `<question>.response.<user_id>.status` | response status of that user |

use std::collections::BTreeMap;
use std::fmt;

use uuid::Uuid;

use super::schema::{SchemaKind, SchemaRegistry};

const SUGGESTION: &str = "suggestion";
const RESPONSE: &str = "response";

/// Rename mapping from external key names to descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMapping {
    targets: BTreeMap<String, String>,
}

impl RenameMapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, descriptor: impl Into<String>) -> Self {
        self.targets.insert(key.into(), descriptor.into());
        self
    }

    /// Returns the descriptor for a key, if mapped.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.targets.get(key).map(String::as_str)
    }

    /// Returns true if the mapping has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RenameMapping
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            targets: iter
                .into_iter()
                .map(|(key, descriptor)| (key.into(), descriptor.into()))
                .collect(),
        }
    }
}

/// Which identity attribute a key sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    /// Server identifier.
    Id,
    /// Caller identifier.
    ExternalId,
}

/// Why a key could not be routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnroutableReason {
    /// The base name is not in the schema.
    UnknownName(String),
    /// The suffix does not apply to the item's kind.
    InvalidSuffix {
        /// Resolved base name.
        name: String,
        /// Kind of the resolved item.
        kind: SchemaKind,
        /// The offending suffix.
        suffix: String,
    },
}

impl fmt::Display for UnroutableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownName(name) => write!(f, "'{name}' is not defined in the dataset settings"),
            Self::InvalidSuffix { name, kind, suffix } => {
                write!(f, "suffix '{suffix}' is not valid for {kind} '{name}'")
            }
        }
    }
}

/// Routing decision for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Field value.
    ToField(String),
    /// Suggestion value of a question.
    ToSuggestionValue(String),
    /// Suggestion score of a question.
    ToSuggestionScore(String),
    /// Suggestion agent of a question.
    ToSuggestionAgent(String),
    /// Response value of a question; `user_id` is `None` for the default user.
    ToResponseValue {
        /// Question name.
        question: String,
        /// Explicit user.
        user_id: Option<Uuid>,
    },
    /// Response status of a question; `user_id` is `None` for the default user.
    ToResponseStatus {
        /// Question name.
        question: String,
        /// Explicit user.
        user_id: Option<Uuid>,
    },
    /// Metadata value.
    ToMetadata(String),
    /// Vector value.
    ToVector(String),
    /// Record identity.
    ToIdentity(IdentityKind),
    /// The key cannot be routed.
    Unroutable(UnroutableReason),
}

/// Routes flat keys using a schema registry and a rename mapping.
#[derive(Debug, Clone, Copy)]
pub struct KeyRouter<'a> {
    registry: &'a SchemaRegistry,
    mapping: &'a RenameMapping,
}

impl<'a> KeyRouter<'a> {
    /// Creates a router.
    #[must_use]
    pub fn new(registry: &'a SchemaRegistry, mapping: &'a RenameMapping) -> Self {
        Self { registry, mapping }
    }

    /// Returns the descriptor a key resolves to after renaming.
    #[must_use]
    pub fn descriptor<'k>(&self, key: &'k str) -> &'k str
    where
        'a: 'k,
    {
        self.mapping.get(key).unwrap_or(key)
    }

    /// Routes one key. Routing is a pure function of the key, the mapping
    /// and the registry.
    #[must_use]
    pub fn route(&self, key: &str) -> RouteDecision {
        let descriptor = self.descriptor(key).trim();

        match descriptor {
            "id" => return RouteDecision::ToIdentity(IdentityKind::Id),
            "external_id" => return RouteDecision::ToIdentity(IdentityKind::ExternalId),
            _ => {}
        }

        let mut segments = descriptor.split('.');
        let base = segments.next().unwrap_or_default();
        let suffix: Vec<String> = segments.map(str::to_lowercase).collect();

        let Some(item) = self.registry.lookup(base) else {
            return RouteDecision::Unroutable(UnroutableReason::UnknownName(base.to_string()));
        };
        let name = item.name.clone();
        let kind = item.kind();
        let suffix: Vec<&str> = suffix.iter().map(String::as_str).collect();

        let invalid = |name: String| {
            RouteDecision::Unroutable(UnroutableReason::InvalidSuffix {
                name,
                kind,
                suffix: suffix.join("."),
            })
        };

        match kind {
            SchemaKind::Field if suffix.is_empty() => RouteDecision::ToField(name),
            SchemaKind::MetadataProperty if suffix.is_empty() => RouteDecision::ToMetadata(name),
            SchemaKind::Vector if suffix.is_empty() => RouteDecision::ToVector(name),
            SchemaKind::Question => match suffix.as_slice() {
                [] | [SUGGESTION] | [SUGGESTION, "value"] => RouteDecision::ToSuggestionValue(name),
                [SUGGESTION, "score"] => RouteDecision::ToSuggestionScore(name),
                [SUGGESTION, "agent"] => RouteDecision::ToSuggestionAgent(name),
                [RESPONSE] | [RESPONSE, "value"] => RouteDecision::ToResponseValue {
                    question: name,
                    user_id: None,
                },
                [RESPONSE, "status"] => RouteDecision::ToResponseStatus {
                    question: name,
                    user_id: None,
                },
                [RESPONSE, user] | [RESPONSE, user, "value"] => match Uuid::parse_str(user) {
                    Ok(user_id) => RouteDecision::ToResponseValue {
                        question: name,
                        user_id: Some(user_id),
                    },
                    Err(_) => invalid(name),
                },
                [RESPONSE, user, "status"] => match Uuid::parse_str(user) {
                    Ok(user_id) => RouteDecision::ToResponseStatus {
                        question: name,
                        user_id: Some(user_id),
                    },
                    Err(_) => invalid(name),
                },
                _ => invalid(name),
            },
            _ => invalid(name),
        }
    }
}
