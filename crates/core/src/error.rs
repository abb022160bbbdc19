//! Error types for RAGSearch
//!
//! `RagError` is the taxonomy every layer converts into before an error
//! reaches a caller. We use `thiserror` for `Display` and `Error`.
//!
//! All variants are recoverable: a failed ingest or query never takes down
//! the process or touches another library's state.

use thiserror::Error;

/// Result type alias for RAGSearch operations
pub type RagResult<T> = std::result::Result<T, RagError>;

/// Errors reported to callers of the search engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RagError {
    /// Library, document or chunk identifier is unknown
    #[error("{entity} not found")]
    NotFound {
        /// Human readable entity description, e.g. `library 'docs'`
        entity: String,
    },

    /// Duplicate identifier on create or insert
    #[error("{entity} already exists")]
    AlreadyExists {
        /// Human readable entity description
        entity: String,
    },

    /// Vector length disagrees with the library configuration
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Library dimensionality
        expected: usize,
        /// Length of the offending vector
        got: usize,
    },

    /// The embedding collaborator did not return a usable vector
    #[error("embedding failed: {reason}")]
    EmbeddingFailed {
        /// Provider-supplied failure description
        reason: String,
    },

    /// Input rejected by validation
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Why the input was rejected
        reason: String,
    },

    /// Internal invariant violation
    #[error("internal error: {reason}")]
    Internal {
        /// Description of the violated invariant
        reason: String,
    },
}

impl RagError {
    /// Create a `NotFound` error for an entity
    pub fn not_found(entity: impl Into<String>) -> Self {
        RagError::NotFound {
            entity: entity.into(),
        }
    }

    /// Create an `AlreadyExists` error for an entity
    pub fn already_exists(entity: impl Into<String>) -> Self {
        RagError::AlreadyExists {
            entity: entity.into(),
        }
    }

    /// Create an `InvalidInput` error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        RagError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create an `EmbeddingFailed` error
    pub fn embedding_failed(reason: impl Into<String>) -> Self {
        RagError::EmbeddingFailed {
            reason: reason.into(),
        }
    }

    /// Create an `Internal` error
    pub fn internal(reason: impl Into<String>) -> Self {
        RagError::Internal {
            reason: reason.into(),
        }
    }

    /// Check if this error indicates an unknown identifier
    pub fn is_not_found(&self) -> bool {
        matches!(self, RagError::NotFound { .. })
    }

    /// Check if this error is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            RagError::DimensionMismatch { .. } | RagError::InvalidInput { .. }
        )
    }
}
