//! Schema registry: name → kind and type constraints.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{FieldKind, MetadataKind, QuestionKind};
use crate::settings::Settings;

/// Normalizes a schema or key name: lower-case, spaces become underscores.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Kind of a schema item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// A content field.
    Field,
    /// A question.
    Question,
    /// A metadata property.
    MetadataProperty,
    /// A vector.
    Vector,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field => write!(f, "field"),
            Self::Question => write!(f, "question"),
            Self::MetadataProperty => write!(f, "metadata property"),
            Self::Vector => write!(f, "vector"),
        }
    }
}

/// Kind-specific constraints of a schema item.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDetails {
    /// Field settings.
    Field(FieldKind),
    /// Question settings.
    Question(QuestionKind),
    /// Metadata settings.
    MetadataProperty(MetadataKind),
    /// Vector dimensionality.
    Vector {
        /// Required number of components.
        dimensions: usize,
    },
}

/// One named entry of a dataset schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaItem {
    /// Normalized name.
    pub name: String,

    /// Server identifier, when the item has been created remotely.
    pub id: Option<Uuid>,

    /// Constraints.
    pub details: TypeDetails,
}

impl SchemaItem {
    /// Returns the kind of the item.
    #[must_use]
    pub fn kind(&self) -> SchemaKind {
        match self.details {
            TypeDetails::Field(_) => SchemaKind::Field,
            TypeDetails::Question(_) => SchemaKind::Question,
            TypeDetails::MetadataProperty(_) => SchemaKind::MetadataProperty,
            TypeDetails::Vector { .. } => SchemaKind::Vector,
        }
    }
}

/// Resolves names of a dataset schema.
///
/// Fields, questions, metadata properties and vectors share one namespace
/// because raw input records address all four through flat keys. The registry
/// is immutable; changed settings produce a new registry.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    items: BTreeMap<String, SchemaItem>,
    declared: Vec<String>,
    question_ids: HashMap<Uuid, String>,
}

impl SchemaRegistry {
    /// Builds a registry from dataset settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] when two items, of any kinds,
    /// normalize to the same name.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut registry = Self::default();

        for field in &settings.fields {
            registry.insert(&field.name, field.id, TypeDetails::Field(field.settings))?;
        }
        for question in &settings.questions {
            registry.insert(
                &question.name,
                question.id,
                TypeDetails::Question(question.settings.clone()),
            )?;
        }
        for property in &settings.metadata {
            registry.insert(
                &property.name,
                property.id,
                TypeDetails::MetadataProperty(property.settings.clone()),
            )?;
        }
        for vector in &settings.vectors {
            registry.insert(
                &vector.name,
                vector.id,
                TypeDetails::Vector {
                    dimensions: vector.dimensions,
                },
            )?;
        }

        Ok(registry)
    }

    fn insert(&mut self, name: &str, id: Option<Uuid>, details: TypeDetails) -> Result<()> {
        let name = normalize_name(name);
        let item = SchemaItem {
            name: name.clone(),
            id,
            details,
        };

        if let Some(existing) = self.items.get(&name) {
            return Err(Error::DuplicateName {
                name,
                first: existing.kind(),
                second: item.kind(),
            });
        }

        if let (SchemaKind::Question, Some(id)) = (item.kind(), id) {
            self.question_ids.insert(id, name.clone());
        }
        self.declared.push(name.clone());
        self.items.insert(name, item);
        Ok(())
    }

    /// Looks up an item; the name is normalized first.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&SchemaItem> {
        self.items.get(&normalize_name(name))
    }

    /// Returns the name of the question with the given server id.
    #[must_use]
    pub fn question_name(&self, id: &Uuid) -> Option<&str> {
        self.question_ids.get(id).map(String::as_str)
    }

    /// Iterates over items of one kind in declaration order.
    pub fn items_of(&self, kind: SchemaKind) -> impl Iterator<Item = &SchemaItem> {
        self.declared
            .iter()
            .filter_map(move |name| self.items.get(name))
            .filter(move |item| item.kind() == kind)
    }

    /// Iterates over all items in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaItem> {
        self.declared.iter().filter_map(move |name| self.items.get(name))
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the registry has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
