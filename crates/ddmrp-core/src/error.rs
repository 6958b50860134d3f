//! Error types for the buffer engine and pipeline.

use ddmrp_ingest::{FetchError, SchemaError, TableError};
use ddmrp_model::SourceRole;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{role} table has no rows; nothing to compute")]
    EmptyInput { role: SourceRole },
}

/// Any failure that stops a pipeline run before results exist.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl PipelineError {
    /// Message for the person running the computation.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Fetch(err) => format!("{} ({err})", err.user_message()),
            Self::Table(err) => format!("The file could not be read as a table ({err})."),
            Self::Schema(err) => format!(
                "The {} table is missing required columns: {}.",
                err.role,
                err.missing.join(", ")
            ),
            Self::Engine(err) => format!("Nothing to compute: {err}."),
        }
    }
}

/// Failures while writing exported tables.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
