//! Error Types
//!
//! All fallible registry operations return [`Result<T>`], an alias for
//! `std::result::Result<T, CairnError>`. Errors are handed to the immediate
//! caller; nothing in the registry retries.
//!
//! Collaborators that only need a status code can match on
//! [`CairnError::kind`], which yields the copyable [`ErrorKind`].

use std::path::PathBuf;

use thiserror::Error;

use crate::hash::HashId;

/// The error type for every registry operation.
#[derive(Error, Debug)]
pub enum CairnError {
    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// The file could not be opened.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was opened but could not be read to the end.
    #[error("IO error while reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ========================================================================
    // Registration Errors
    // ========================================================================
    /// A resource with this name is already registered.
    #[error("Resource already registered: {0}")]
    DuplicateName(String),

    /// The pile has no free slot left.
    #[error("Resource limit reached (capacity: {capacity})")]
    CapacityExceeded { capacity: usize },

    /// The name hashes to the same id as a different, already registered name.
    #[error("Hash collision: '{name}' and '{existing}' both map to {id}")]
    HashCollision {
        name: String,
        existing: String,
        id: HashId,
    },

    // ========================================================================
    // Allocation & Configuration Errors
    // ========================================================================
    /// The buffer for a resource could not be allocated.
    #[error("Failed to allocate {size} bytes")]
    OutOfMemory { size: usize },

    /// The registry settings are unusable.
    #[error("Invalid registry settings: {0}")]
    InvalidSettings(String),
}

/// Status code for a [`CairnError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FileNotFound,
    Io,
    DuplicateName,
    CapacityExceeded,
    HashCollision,
    OutOfMemory,
    InvalidSettings,
}

impl CairnError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            CairnError::FileNotFound { .. } => ErrorKind::FileNotFound,
            CairnError::Io { .. } => ErrorKind::Io,
            CairnError::DuplicateName(_) => ErrorKind::DuplicateName,
            CairnError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            CairnError::HashCollision { .. } => ErrorKind::HashCollision,
            CairnError::OutOfMemory { .. } => ErrorKind::OutOfMemory,
            CairnError::InvalidSettings(_) => ErrorKind::InvalidSettings,
        }
    }
}

/// Alias for `Result<T, CairnError>`.
pub type Result<T> = std::result::Result<T, CairnError>;
