//! Local persistence of a dataset.
//!
//! Layout of an archive directory:
//!
//! ```text
//! <dir>/
//!   .argilla/
//!     dataset.json    dataset identity, when known
//!     settings.json   dataset settings
//!   records.json      compact JSON array of nested records
//! ```

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::mapping::{raw_from_nested, FlattenMode, RecordAssembler, RecordFlattener};
use crate::models::Dataset;
use crate::record::Record;
use crate::settings::Settings;

const META_DIR: &str = ".argilla";
const DATASET_FILE: &str = "dataset.json";
const SETTINGS_FILE: &str = "settings.json";
const RECORDS_FILE: &str = "records.json";

/// A dataset with its settings and records, as stored on disk.
#[derive(Debug, Clone, Default)]
pub struct DatasetArchive {
    /// Remote dataset, if the archive was exported from a server.
    pub dataset: Option<Dataset>,

    /// Dataset settings.
    pub settings: Settings,

    /// Records.
    pub records: Vec<Record>,
}

impl DatasetArchive {
    /// Creates an archive without a remote dataset.
    #[must_use]
    pub fn new(settings: Settings, records: Vec<Record>) -> Self {
        Self {
            dataset: None,
            settings,
            records,
        }
    }

    /// Writes the archive into `dir`, creating it if needed. Existing
    /// archive files are overwritten.
    ///
    /// # Errors
    ///
    /// Returns an I/O or serialization error, or a duplicate-name error if
    /// the settings are inconsistent.
    #[instrument(skip(self, dir), fields(dir = %dir.as_ref().display(), records = self.records.len()))]
    pub fn write(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        let meta = dir.join(META_DIR);
        fs::create_dir_all(&meta)?;

        if let Some(dataset) = &self.dataset {
            write_json(&meta.join(DATASET_FILE), dataset)?;
        }
        write_json(&meta.join(SETTINGS_FILE), &self.settings)?;

        let registry = self.settings.registry()?;
        let rows = RecordFlattener::new(&registry).flatten_batch(&self.records, FlattenMode::Nested);
        write_json(&dir.join(RECORDS_FILE), &rows)?;

        debug!("Wrote dataset archive");
        Ok(())
    }

    /// Reads an archive from `dir`.
    ///
    /// Records are re-assembled against the stored settings. A missing
    /// records file reads as no records.
    ///
    /// # Errors
    ///
    /// Returns an I/O or serialization error when the settings are missing
    /// or unreadable, and a mapping error when a stored record no longer
    /// fits the settings.
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn read(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let meta = dir.join(META_DIR);

        let settings: Settings = read_json(&meta.join(SETTINGS_FILE))?;
        let dataset_path = meta.join(DATASET_FILE);
        let dataset = if dataset_path.exists() {
            Some(read_json(&dataset_path)?)
        } else {
            None
        };

        let records_path = dir.join(RECORDS_FILE);
        let rows: Vec<Map<String, Value>> = if records_path.exists() {
            read_json(&records_path)?
        } else {
            Vec::new()
        };

        let registry = settings.registry()?;
        let assembler = RecordAssembler::new(&registry).preserve_identity();
        let records = rows
            .iter()
            .map(|row| assembler.assemble(&raw_from_nested(row)).map(|a| a.record))
            .collect::<Result<Vec<_>>>()?;

        debug!(records = records.len(), "Read dataset archive");
        Ok(Self {
            dataset,
            settings,
            records,
        })
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
