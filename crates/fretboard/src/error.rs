//! Error types for fretboard operations.
//!
//! This module provides the main error type [`FretboardError`] which wraps
//! the error conditions of request decoding, rendering and disk output.

use std::io;

use thiserror::Error;

use fretboard_core::error::ValidationError;

use crate::export;

/// The main error type for fretboard operations.
///
/// The `Validation` variant means the request itself was wrong and nothing
/// was drawn; every other variant is an environment or pipeline failure.
#[derive(Debug, Error)]
pub enum FretboardError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid diagram: {0}")]
    Validation(#[from] ValidationError),

    #[error("Malformed request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Encode error: {0}")]
    Encode(Box<dyn std::error::Error + Send + Sync>),
}

impl From<export::Error> for FretboardError {
    fn from(err: export::Error) -> Self {
        match err {
            export::Error::Style(msg) => Self::Config(msg),
            export::Error::Render(msg) => Self::Render(msg),
            export::Error::Encode(err) => Self::Encode(err),
        }
    }
}

impl FretboardError {
    /// Returns `true` if the error was caused by the caller's input rather
    /// than by the renderer or the environment.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Json(_))
    }
}
