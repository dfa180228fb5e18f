//! Common test utilities and fixtures.

pub mod fixtures;
pub mod server;

pub use fixtures::*;
pub use server::*;
