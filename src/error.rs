//! Error taxonomy for the corpus and feature pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by corpus indexing, decoding and feature extraction.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("index {index} out of range for dataset of length {len}")]
    Index { index: i64, len: usize },

    #[error("failed to decode audio file {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid audio clip: {0}")]
    InvalidClip(String),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DatasetError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, DatasetError>;
