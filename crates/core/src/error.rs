use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result alias for configuration loading.
pub type Result<T> = std::result::Result<T, PanelError>;
