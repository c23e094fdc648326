use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a dataset definition.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read dataset definition {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid dataset definition: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
