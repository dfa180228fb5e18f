//! Record normalization and schema mapping.
//!
//! Raw input records are flat dictionaries whose keys may name a field, a
//! question, a metadata property or a vector, optionally through a rename
//! mapping. The mapper runs in four stages:
//!
//! 1. [`SchemaRegistry`] resolves names against the dataset settings.
//! 2. [`KeyRouter`] decides where each key goes.
//! 3. [`RecordAssembler`] builds a [`crate::Record`] and reports skipped keys.
//! 4. [`RecordFlattener`] turns records back into flat or nested dictionaries.
//!
//! Everything here is synchronous and performs no I/O.
//!
//! # Example
//!
//! ```rust
//! use argilla_sdk::mapping::{FlattenMode, RecordAssembler, RecordFlattener};
//! use argilla_sdk::models::{Field, Question};
//! use argilla_sdk::Settings;
//! use serde_json::json;
//!
//! let registry = Settings::new()
//!     .with_field(Field::text("text"))
//!     .with_question(Question::label("label", ["positive", "negative"]))
//!     .registry()?;
//!
//! let raw = json!({"text": "great", "label": "positive", "label.suggestion.score": 0.9});
//! let raw = raw.as_object().cloned().unwrap_or_default();
//! let assembled = RecordAssembler::new(&registry).assemble(&raw)?;
//! assert_eq!(assembled.record.suggestions.len(), 1);
//!
//! let flat = RecordFlattener::new(&registry).flatten(&assembled.record, FlattenMode::Flat);
//! assert_eq!(flat["label.suggestion.score"], json!(0.9));
//! # Ok::<(), argilla_sdk::Error>(())
//! ```

mod assembler;
mod flatten;
mod router;
mod schema;

pub use assembler::{Assembled, RecordAssembler, SkipReason, SkippedKey};
pub use flatten::{raw_from_nested, FlattenMode, RecordFlattener};
pub use router::{IdentityKind, KeyRouter, RenameMapping, RouteDecision, UnroutableReason};
pub use schema::{normalize_name, SchemaItem, SchemaKind, SchemaRegistry, TypeDetails};
