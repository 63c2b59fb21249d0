//! Session snapshots persisted between command invocations.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::SubmissionState;
use crate::pipeline::PipelineState;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid session file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Save time, formatted with [`TIMESTAMP_FORMAT`].
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub submission: SubmissionState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<PipelineState>,
}

impl SessionSnapshot {
    pub fn new(submission: SubmissionState) -> Self {
        Self {
            timestamp: String::new(),
            submission,
            pipeline: None,
        }
    }

    /// Loads a snapshot; a missing file yields an empty session.
    pub fn load(path: &Path) -> SessionResult<Self> {
        if !path.exists() {
            log::debug!("No session at {}, starting fresh", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SessionError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Stamps the snapshot with `now` and writes it as pretty JSON.
    pub fn save(&mut self, path: &Path, now: DateTime<Local>) -> SessionResult<()> {
        self.timestamp = now.format(TIMESTAMP_FORMAT).to_string();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SessionError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|source| SessionError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Session saved to {} ({})", path.display(), self.timestamp);
        Ok(())
    }
}
