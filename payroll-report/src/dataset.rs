//! Dataset loading
//!
//! Reads a JSON export of employee and time record documents and seeds the
//! in-memory store with it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use payroll_service::{Employee, InMemoryRepository, TimeRecord};

/// Errors that can occur while loading a dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Dataset file not found: {0}")]
    NotFound(String),
}

/// Employee and time record documents as exported from the store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub employees: Vec<Employee>,

    #[serde(rename = "timeRecords", default)]
    pub time_records: Vec<TimeRecord>,
}

impl Dataset {
    /// Load a dataset from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DatasetError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let dataset: Dataset =
            serde_json::from_str(&content).map_err(|e| DatasetError::Parse(e.to_string()))?;

        tracing::debug!(
            "Loaded {} employees and {} time records from {}",
            dataset.employees.len(),
            dataset.time_records.len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn into_repository(self) -> InMemoryRepository {
        InMemoryRepository::with_data(self.employees, self.time_records)
    }
}
