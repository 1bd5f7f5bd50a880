//! Record schema and dataset loading.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use bedside_core::error::BedsideError;

/// The dataset bundled with the crate, used when no file is configured.
const BUNDLED_RECORDS: &str = include_str!("../data/records.json");

/// A single provider entry in the directory dataset.
///
/// Read-only reference data: loaded once at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u32,
    pub name: String,
    pub specialty: String,
    pub city: String,
    pub experience_years: u32,
    pub hospital: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details_link: Option<String>,
    pub keywords: Vec<String>,
}

/// Errors from loading the record dataset.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("records dataset not found: {0}")]
    NotFound(String),
    #[error("records dataset could not be read: {0}")]
    Io(String),
    #[error("records dataset is not valid JSON: {0}")]
    Decode(String),
}

impl From<DirectoryError> for BedsideError {
    fn from(err: DirectoryError) -> Self {
        BedsideError::Directory(err.to_string())
    }
}

/// The loaded record set.
#[derive(Debug, Clone)]
pub struct Directory {
    records: Vec<Record>,
}

impl Directory {
    /// Load the dataset from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DirectoryError::NotFound(path.display().to_string())
            } else {
                DirectoryError::Io(e.to_string())
            }
        })?;
        let directory = Self::from_json_str(&content)?;
        info!(
            path = %path.display(),
            records = directory.len(),
            "Records dataset loaded"
        );
        Ok(directory)
    }

    /// Parse a dataset from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, DirectoryError> {
        let records: Vec<Record> =
            serde_json::from_str(json).map_err(|e| DirectoryError::Decode(e.to_string()))?;
        Ok(Self { records })
    }

    /// The dataset bundled with the crate.
    pub fn bundled() -> Self {
        Self::from_json_str(BUNDLED_RECORDS).expect("bundled dataset is valid JSON")
    }

    /// All records in dataset order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records in the dataset.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
