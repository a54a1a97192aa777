//! Data-file references
//!
//! Generated scripts read their data with `read.csv`, so the only accepted
//! data format is comma-separated values. The extension is checked when a
//! [`DataSource`] is created; the file itself is only opened on request, to
//! compare its header with the model's variables.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ScriptError;
use crate::model::{StatisticalModel, ValidationError};
use crate::templates::r_string;

/// The one accepted data-file extension
pub const DATA_EXTENSION: &str = "csv";

/// Path to a CSV data file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    path: PathBuf,
}

impl DataSource {
    /// Accept `path` if it is valid UTF-8 and its extension is `csv` (any case)
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        if path.to_str().is_none() {
            return Err(ValidationError::NonUtf8DataPath {
                path: format!("{:?}", path),
            });
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case(DATA_EXTENSION) => Ok(Self {
                path: path.to_path_buf(),
            }),
            other => Err(ValidationError::UnsupportedDataExtension {
                path: path.display().to_string(),
                extension: other.map(str::to_string),
                expected: DATA_EXTENSION,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The path as an R string literal
    pub fn r_literal(&self) -> String {
        // Checked to be UTF-8 in `new`, so nothing is replaced
        r_string(&self.path.to_string_lossy())
    }

    /// Column names from the CSV header
    pub fn columns(&self) -> Result<Vec<String>, ScriptError> {
        let csv_error = |e: csv::Error| ScriptError::Csv {
            path: self.path.clone(),
            message: e.to_string(),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(csv_error)?;
        let headers = reader.headers().map_err(csv_error)?;

        let columns: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
        debug!(path = %self.path.display(), ?columns, "read data header");
        Ok(columns)
    }

    /// Model variables (including random-effect groups) absent from the header
    pub fn missing_columns(&self, model: &StatisticalModel) -> Result<Vec<String>, ScriptError> {
        let columns = self.columns()?;
        let required = std::iter::once(model.dependent().name())
            .chain(model.independents().iter().map(|v| v.name()))
            .chain(model.random_effects().iter().map(|r| r.group()));

        Ok(required
            .filter(|name| !columns.iter().any(|c| c == name))
            .map(str::to_string)
            .collect())
    }
}
