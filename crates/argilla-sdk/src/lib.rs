//! # Argilla SDK
//!
//! Rust client for the [Argilla](https://argilla.io) data-annotation platform.
//!
//! ## Features
//!
//! - **Typed API client** for users, workspaces, datasets, schema items,
//!   records, suggestions and responses
//! - **Record mapping** from flat, loosely typed dictionaries to schema-resolved
//!   records and back ([`mapping`])
//! - **Batched ingestion and export** with sequential bulk requests and paging
//! - **Local archives** of a dataset's settings and records ([`disk`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use argilla_sdk::models::{DatasetCreate, Field, Question};
//! use argilla_sdk::{ArgillaClient, LogOptions, Settings};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), argilla_sdk::Error> {
//!     let client = ArgillaClient::from_env()?;
//!     let workspace = client.workspaces().get_by_name("argilla").await?;
//!
//!     let settings = Settings::new()
//!         .with_field(Field::text("text"))
//!         .with_question(Question::label("sentiment", ["positive", "negative"]));
//!     let (dataset, _) = client
//!         .datasets()
//!         .create_with_settings(&DatasetCreate::new("reviews", workspace.id), &settings)
//!         .await?;
//!
//!     let rows: Vec<_> = [json!({"text": "Great!", "sentiment": "positive"})]
//!         .into_iter()
//!         .filter_map(|row| row.as_object().cloned())
//!         .collect();
//!     client.records(dataset.id).log(&rows, &LogOptions::new()).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, argilla_sdk::Error>`:
//!
//! ```rust,no_run
//! # use argilla_sdk::ArgillaClient;
//! # async fn example(client: ArgillaClient, id: uuid::Uuid) {
//! match client.datasets().get(id).await {
//!     Ok(dataset) => println!("Found: {}", dataset.name),
//!     Err(argilla_sdk::Error::NotFound { .. }) => println!("Dataset not found"),
//!     Err(argilla_sdk::Error::Unauthorized { .. }) => println!("Invalid API key"),
//!     Err(e) => eprintln!("Error: {e}"),
//! }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod client;
pub mod disk;
pub mod error;
pub mod mapping;
pub mod models;
pub mod record;
pub mod settings;

pub use client::{ArgillaClient, ArgillaClientBuilder, ArgillaConfig, LogOptions, RecordPager};
pub use disk::DatasetArchive;
pub use error::{Error, Result};
pub use record::{Record, Response, Suggestion};
pub use settings::Settings;

/// SDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent string for API requests
pub const USER_AGENT: &str = concat!("argilla-sdk-rust/", env!("CARGO_PKG_VERSION"));
