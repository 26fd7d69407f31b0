//! Data loading utilities

use crate::error::{Result, TitanicError};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// CSV loader for the passenger table
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Rows used to infer column types
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self {
            infer_schema_length: 1000,
        }
    }

    /// Set the number of rows used for schema inference
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows.max(1);
        self
    }

    /// Load a CSV file with a header row.
    ///
    /// A missing or unreadable file surfaces as [`TitanicError::Io`]; a file
    /// that opens but does not parse as a table surfaces as [`TitanicError::Data`].
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let start = Instant::now();
        let file = File::open(path)?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| TitanicError::Data(format!("{}: {}", path.display(), e)))?;

        info!(
            path = %path.display(),
            rows = df.height(),
            cols = df.width(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded dataset"
        );

        Ok(df)
    }
}

/// Writes data frames back to disk
pub struct DataSaver;

impl DataSaver {
    /// Save to CSV with a header row and no index column
    pub fn save_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path)?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .map_err(|e| TitanicError::Data(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), rows = df.height(), cols = df.width(), "Wrote dataset");
        Ok(())
    }
}

/// Load a passenger table from a CSV file with default options
pub fn load_data(path: impl AsRef<Path>) -> Result<DataFrame> {
    DataLoader::new().load_csv(path)
}
