//! Wire models for the Argilla REST API.
//!
//! This module contains the request and response types exchanged with the
//! server. Settings types (fields, questions, metadata properties, vectors)
//! double as the local schema description used by the record mapper.

mod common;
mod datasets;
mod fields;
mod metadata;
mod questions;
mod records;
mod users;
mod vectors;
mod workspaces;

pub use common::*;
pub use datasets::*;
pub use fields::*;
pub use metadata::*;
pub use questions::*;
pub use records::*;
pub use users::*;
pub use vectors::*;
pub use workspaces::*;
