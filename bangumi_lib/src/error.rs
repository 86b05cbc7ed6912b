//! Error types for the library layer.

use std::fmt;

/// Errors produced while retrieving and preparing rows.
#[derive(Debug)]
pub enum RetrievalError {
    /// A request failed mid-fetch. Rows gathered before the failure are discarded.
    Transport(bangumi_api::TransportError),
    /// User-provided filter input failed validation.
    InvalidFilter(String),
    /// Reading an archive dump failed.
    Archive(std::io::Error),
}

impl fmt::Display for RetrievalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "API request failed: {}", e),
            Self::InvalidFilter(msg) => write!(f, "Invalid filter: {}", msg),
            Self::Archive(e) => write!(f, "Archive read failed: {}", e),
        }
    }
}

impl std::error::Error for RetrievalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Archive(e) => Some(e),
            Self::InvalidFilter(_) => None,
        }
    }
}

impl From<bangumi_api::TransportError> for RetrievalError {
    fn from(e: bangumi_api::TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<std::io::Error> for RetrievalError {
    fn from(e: std::io::Error) -> Self {
        Self::Archive(e)
    }
}
