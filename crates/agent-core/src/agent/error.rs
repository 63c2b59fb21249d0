use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Agent file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read agent file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse agent definitions: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Agent configuration is missing or empty")]
    Empty,

    #[error("Invalid agent '{agent}': {reason}")]
    Invalid { agent: String, reason: String },

    #[error("Duplicate agent id: {0}")]
    DuplicateId(String),

    #[error("Agent '{0}' not found in configuration")]
    NotFound(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
