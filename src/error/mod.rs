use std::path::PathBuf;
use thiserror::Error;

use crate::model::ValidationError;
use crate::templates::LookupError;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported schema version '{version}'. Supported versions: {supported}")]
    UnsupportedSchema { version: String, supported: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read CSV header from {path:?}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("Rscript executable not found; install R or set R_HOME")]
    RuntimeNotFound,

    #[error("Failed to run {program}: {message}")]
    Runtime { program: String, message: String },
}
