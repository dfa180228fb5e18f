//! Integration tests for the Argilla SDK.
//!
//! Covers the REST services, record logging and export, and local archives.

pub mod common;
pub mod archive;
