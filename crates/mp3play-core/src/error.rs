//! Error taxonomy.
//!
//! `Init`, `DirectoryOpen` and `Io` end the run. Everything else is scoped to
//! one file: the player logs it and moves on.

use std::io;
use std::path::PathBuf;

use symphonia::core::errors::Error as SymphoniaError;
use thiserror::Error;

use crate::models::StreamFormat;

pub type Result<T> = std::result::Result<T, PlayerError>;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("audio backend failed to initialize: {0}")]
    Init(String),

    #[error("could not open directory {}: {source}", .path.display())]
    DirectoryOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error opening MP3 file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: SymphoniaError,
    },

    #[error("unsupported stream in {}: {reason}", .path.display())]
    Unsupported { path: PathBuf, reason: String },

    #[error("error opening audio device: {0}")]
    Device(String),

    #[error("error reading MP3 stream: {0}")]
    Read(#[source] SymphoniaError),

    #[error("stream format changed mid-file: opened as {expected}, decoded {actual}")]
    FormatMismatch {
        expected: StreamFormat,
        actual: StreamFormat,
    },

    #[error("decoded block of {needed} samples does not fit a {capacity}-sample buffer")]
    BlockOverflow { needed: usize, capacity: usize },

    #[error("error playing audio: {0}")]
    Write(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl PlayerError {
    /// Whether this error aborts the whole run rather than a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PlayerError::Init(_) | PlayerError::DirectoryOpen { .. } | PlayerError::Io(_)
        )
    }
}
