//! Error types for the vector index and library layers

use ragsearch_core::{LimitError, RagError, VectorId};
use thiserror::Error;

/// Errors raised by record stores, index backends and library management
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VectorError {
    /// Vector dimension doesn't match library configuration
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected dimension from library config
        expected: usize,
        /// Actual dimension of provided vector
        got: usize,
    },

    /// Record is already present in the index
    #[error("Duplicate vector id: {id}")]
    DuplicateId {
        /// The duplicated id
        id: VectorId,
    },

    /// Record is not present in the store or index
    #[error("Vector not found: {id}")]
    VectorNotFound {
        /// The missing id
        id: VectorId,
    },

    /// Library or index configuration rejected
    #[error("Invalid config: {reason}")]
    InvalidConfig {
        /// Reason why it's invalid
        reason: String,
    },

    /// Library with given id was not found
    #[error("Library not found: {id}")]
    LibraryNotFound {
        /// Library id
        id: String,
    },

    /// Library with given id already exists
    #[error("Library already exists: {id}")]
    LibraryAlreadyExists {
        /// Library id
        id: String,
    },

    /// Document with given id was not found
    #[error("Document not found: {id}")]
    DocumentNotFound {
        /// Document id
        id: String,
    },

    /// Document with given id already exists
    #[error("Document already exists: {id}")]
    DocumentAlreadyExists {
        /// Document id
        id: String,
    },

    /// Chunk with given id was not found
    #[error("Chunk not found: {id}")]
    ChunkNotFound {
        /// Chunk id
        id: String,
    },

    /// Chunk with given id already exists
    #[error("Chunk already exists: {id}")]
    ChunkAlreadyExists {
        /// Chunk id
        id: String,
    },

    /// Library id is invalid
    #[error("Invalid library id: {id} ({reason})")]
    InvalidLibraryId {
        /// The invalid id
        id: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// Document id is invalid
    #[error("Invalid document id: {id} ({reason})")]
    InvalidDocumentId {
        /// The invalid id
        id: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// Metadata value is not a scalar
    #[error("Invalid metadata field '{key}': {reason}")]
    InvalidMetadata {
        /// Offending field
        key: String,
        /// Reason why it's invalid
        reason: String,
    },
}

impl VectorError {
    /// Check if this error indicates an unknown identifier
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            VectorError::VectorNotFound { .. }
                | VectorError::LibraryNotFound { .. }
                | VectorError::DocumentNotFound { .. }
                | VectorError::ChunkNotFound { .. }
        )
    }

    /// Check if this error is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            VectorError::DimensionMismatch { .. }
                | VectorError::InvalidConfig { .. }
                | VectorError::InvalidLibraryId { .. }
                | VectorError::InvalidDocumentId { .. }
                | VectorError::InvalidMetadata { .. }
        )
    }
}

/// Result type alias for vector operations
pub type VectorResult<T> = Result<T, VectorError>;

impl From<LimitError> for VectorError {
    fn from(e: LimitError) -> Self {
        VectorError::InvalidConfig {
            reason: e.to_string(),
        }
    }
}

impl From<VectorError> for RagError {
    fn from(e: VectorError) -> Self {
        match e {
            VectorError::DimensionMismatch { expected, got } => {
                RagError::DimensionMismatch { expected, got }
            }
            VectorError::DuplicateId { id } => RagError::already_exists(format!("vector {}", id)),
            VectorError::VectorNotFound { id } => RagError::not_found(format!("vector {}", id)),
            VectorError::InvalidConfig { reason } => RagError::invalid_input(reason),
            VectorError::LibraryNotFound { id } => RagError::not_found(format!("library '{}'", id)),
            VectorError::LibraryAlreadyExists { id } => {
                RagError::already_exists(format!("library '{}'", id))
            }
            VectorError::DocumentNotFound { id } => {
                RagError::not_found(format!("document '{}'", id))
            }
            VectorError::DocumentAlreadyExists { id } => {
                RagError::already_exists(format!("document '{}'", id))
            }
            VectorError::ChunkNotFound { id } => RagError::not_found(format!("chunk '{}'", id)),
            VectorError::ChunkAlreadyExists { id } => {
                RagError::already_exists(format!("chunk '{}'", id))
            }
            VectorError::InvalidLibraryId { id, reason } => {
                RagError::invalid_input(format!("Invalid library id '{}': {}", id, reason))
            }
            VectorError::InvalidDocumentId { id, reason } => {
                RagError::invalid_input(format!("Invalid document id '{}': {}", id, reason))
            }
            err @ VectorError::InvalidMetadata { .. } => RagError::invalid_input(err.to_string()),
        }
    }
}
