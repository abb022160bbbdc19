//! Error types for command execution.
//!
//! All errors from command execution are represented by the [`Error`] enum.
//! These errors are:
//! - **Structured**: Each variant has typed fields for error details
//! - **Serializable**: Can be converted to/from JSON for a transport layer
//! - **Lossless**: No error information is lost in conversion from internal errors

use serde::{Deserialize, Serialize};

/// Command execution errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Not Found | `LibraryNotFound`, `DocumentNotFound`, `ChunkNotFound` | Entity doesn't exist |
/// | State | `LibraryExists`, `DocumentExists` | Identifier already taken |
/// | Constraint | `DimensionMismatch` | Vector length disagrees with the library |
/// | Validation | `InvalidInput` | Bad input |
/// | Upstream | `EmbeddingFailed` | Embedding provider failure |
/// | System | `Internal` | Invariant violation |
///
/// # Example
///
/// ```ignore
/// use ragsearch_executor::{Command, Error, Executor};
///
/// match executor.execute(cmd) {
///     Ok(output) => { /* handle success */ }
///     Err(Error::LibraryNotFound { library }) => {
///         println!("Library '{}' not found", library);
///     }
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Not Found ====================
    /// Library not found
    #[error("library not found: {library}")]
    LibraryNotFound { library: String },

    /// Document not found
    #[error("document not found: {document}")]
    DocumentNotFound { document: String },

    /// Chunk not found
    #[error("chunk not found: {chunk}")]
    ChunkNotFound { chunk: String },

    // ==================== State Errors ====================
    /// Library already exists
    #[error("library already exists: {library}")]
    LibraryExists { library: String },

    /// Document already exists
    #[error("document already exists: {document}")]
    DocumentExists { document: String },

    // ==================== Constraint Errors ====================
    /// Vector dimension mismatch
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    // ==================== Validation Errors ====================
    /// Invalid input
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    // ==================== Upstream Errors ====================
    /// Embedding provider failed; nothing was indexed
    #[error("embedding failed: {reason}")]
    EmbeddingFailed { reason: String },

    // ==================== System Errors ====================
    /// Internal error (bug or invariant violation)
    #[error("internal error: {reason}")]
    Internal { reason: String },
}

impl Error {
    /// Check if this error reports a missing entity
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::LibraryNotFound { .. }
                | Error::DocumentNotFound { .. }
                | Error::ChunkNotFound { .. }
        )
    }

    /// Check if this error reports an identifier conflict
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Error::LibraryExists { .. } | Error::DocumentExists { .. }
        )
    }
}
