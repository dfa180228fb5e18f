//! Metadata property models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A typed, filterable side attribute of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataProperty {
    /// Server identifier, unset until the property is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Property name.
    pub name: String,

    /// Title shown in the UI.
    pub title: String,

    /// Whether annotators can see the value.
    #[serde(default = "default_visible")]
    pub visible_for_annotators: bool,

    /// Kind-specific settings.
    pub settings: MetadataKind,

    /// Owning dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<Uuid>,

    /// When the property was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<DateTime<Utc>>,

    /// When the property was last updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_visible() -> bool {
    true
}

/// Kind of a metadata property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetadataKind {
    /// One or more string terms.
    Terms {
        /// Allowed terms; any term is accepted when unset.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        values: Option<Vec<String>>,
    },
    /// An integer.
    Integer {
        /// Inclusive lower bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        /// Inclusive upper bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    /// A floating point number.
    Float {
        /// Inclusive lower bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Inclusive upper bound.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
}

impl MetadataKind {
    /// Checks a value against the declared type and bounds.
    ///
    /// # Errors
    ///
    /// Returns a message describing the violated constraint.
    pub fn check_value(&self, value: &Value) -> Result<(), String> {
        match self {
            Self::Terms { values } => {
                let terms: Vec<&str> = match value {
                    Value::String(term) => vec![term.as_str()],
                    Value::Array(items) => items
                        .iter()
                        .map(|item| {
                            item.as_str()
                                .ok_or_else(|| format!("expected a string term, got {item}"))
                        })
                        .collect::<Result<_, _>>()?,
                    other => return Err(format!("expected a term or list of terms, got {other}")),
                };
                if let Some(allowed) = values {
                    if let Some(term) = terms.iter().find(|term| !allowed.iter().any(|a| a == *term)) {
                        return Err(format!("term '{term}' is not one of the allowed values"));
                    }
                }
                Ok(())
            }
            Self::Integer { min, max } => {
                let number = value
                    .as_i64()
                    .ok_or_else(|| format!("expected an integer, got {value}"))?;
                check_bounds(number, *min, *max)
            }
            Self::Float { min, max } => {
                let number = value
                    .as_f64()
                    .ok_or_else(|| format!("expected a number, got {value}"))?;
                check_bounds(number, *min, *max)
            }
        }
    }
}

fn check_bounds<T>(value: T, min: Option<T>, max: Option<T>) -> Result<(), String>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if let Some(min) = min {
        if value < min {
            return Err(format!("value {value} is below minimum {min}"));
        }
    }
    if let Some(max) = max {
        if value > max {
            return Err(format!("value {value} is above maximum {max}"));
        }
    }
    Ok(())
}

impl MetadataProperty {
    /// Creates a property of the given kind; the title defaults to the name.
    #[must_use]
    pub fn new(name: impl Into<String>, settings: MetadataKind) -> Self {
        let name = name.into();
        Self {
            id: None,
            title: name.clone(),
            name,
            visible_for_annotators: true,
            settings,
            dataset_id: None,
            inserted_at: None,
            updated_at: None,
        }
    }

    /// Creates a terms property, optionally restricted to `values`.
    #[must_use]
    pub fn terms(name: impl Into<String>, values: Option<Vec<String>>) -> Self {
        Self::new(name, MetadataKind::Terms { values })
    }

    /// Creates an integer property.
    #[must_use]
    pub fn integer(name: impl Into<String>, min: Option<i64>, max: Option<i64>) -> Self {
        Self::new(name, MetadataKind::Integer { min, max })
    }

    /// Creates a float property.
    #[must_use]
    pub fn float(name: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        Self::new(name, MetadataKind::Float { min, max })
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Hides the value from annotators.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible_for_annotators = false;
        self
    }
}

/// Request to update a metadata property.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetadataPropertyUpdate {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_for_annotators: Option<bool>,
}
