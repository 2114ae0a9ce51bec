//! Error types for the chaingraph-import crate.

use std::path::PathBuf;

use thiserror::Error;

/// An input file could not be read as a whole.
///
/// Individual malformed lines are not errors; they are skipped and reported
/// in the batch.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse JSON array in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Source read error: {0}")]
    Source(#[from] SourceError),

    #[error("Graph error: {0}")]
    Graph(#[from] chaingraph_graph::GraphError),

    #[error("Invalid record: {0}")]
    Record(#[from] chaingraph_core::RecordError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ImportError>;
