//! Error types for loading, rendering and writing an export.
//!
//! Loader failures (`Io` on the input file, `Parse`, `NotAnArray`) abort the run.
//! `Conversion` and write-side `Io` errors are reported per conversation or per
//! artifact and the run carries on.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    /// Reading or writing a file failed.
    #[error("I/O error on {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    /// The input file is not valid JSON.
    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The input parsed, but the top-level value is not an array of conversations.
    #[error("Expected a JSON array of conversations in {path:?}")]
    NotAnArray { path: PathBuf },

    /// A single conversation record has the wrong shape.
    #[error("Conversation #{index} is malformed: {source}")]
    Conversion {
        index: usize,
        source: serde_json::Error,
    },

    #[error("Failed to format markdown")]
    Render(#[from] std::fmt::Error),

    #[error("Failed to serialize front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

impl ExportError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn not_an_array(path: impl Into<PathBuf>) -> Self {
        Self::NotAnArray { path: path.into() }
    }

    pub fn conversion(index: usize, source: serde_json::Error) -> Self {
        Self::Conversion { index, source }
    }
}
