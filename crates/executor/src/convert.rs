//! Error conversion from internal error types.
//!
//! Engine, core and embedding errors all map onto the executor's [`Error`]
//! without losing the identifiers they carry.

use ragsearch_core::{LimitError, RagError};
use ragsearch_engine::VectorError;
use ragsearch_intelligence::EmbedError;

use crate::Error;

impl From<VectorError> for Error {
    fn from(err: VectorError) -> Self {
        match err {
            VectorError::DimensionMismatch { expected, got } => Error::DimensionMismatch {
                expected,
                actual: got,
            },
            VectorError::LibraryNotFound { id } => Error::LibraryNotFound { library: id },
            VectorError::LibraryAlreadyExists { id } => Error::LibraryExists { library: id },
            VectorError::DocumentNotFound { id } => Error::DocumentNotFound { document: id },
            VectorError::DocumentAlreadyExists { id } => Error::DocumentExists { document: id },
            VectorError::ChunkNotFound { id } => Error::ChunkNotFound { chunk: id },
            err @ (VectorError::InvalidConfig { .. }
            | VectorError::InvalidLibraryId { .. }
            | VectorError::InvalidDocumentId { .. }
            | VectorError::InvalidMetadata { .. }) => Error::InvalidInput {
                reason: err.to_string(),
            },
            // Record-level conflicts mean the store and index disagree
            err @ (VectorError::DuplicateId { .. }
            | VectorError::VectorNotFound { .. }
            | VectorError::ChunkAlreadyExists { .. }) => Error::Internal {
                reason: err.to_string(),
            },
        }
    }
}

/// Pull the quoted identifier out of an entity like `library 'docs'`.
fn quoted_id(entity: &str, kind: &str) -> Option<String> {
    entity
        .strip_prefix(kind)?
        .trim_start()
        .strip_prefix('\'')?
        .strip_suffix('\'')
        .map(str::to_string)
}

impl From<RagError> for Error {
    fn from(err: RagError) -> Self {
        match err {
            RagError::NotFound { entity } => {
                if let Some(library) = quoted_id(&entity, "library") {
                    Error::LibraryNotFound { library }
                } else if let Some(document) = quoted_id(&entity, "document") {
                    Error::DocumentNotFound { document }
                } else if let Some(chunk) = quoted_id(&entity, "chunk") {
                    Error::ChunkNotFound { chunk }
                } else {
                    Error::Internal {
                        reason: format!("{} not found", entity),
                    }
                }
            }
            RagError::AlreadyExists { entity } => {
                if let Some(library) = quoted_id(&entity, "library") {
                    Error::LibraryExists { library }
                } else if let Some(document) = quoted_id(&entity, "document") {
                    Error::DocumentExists { document }
                } else {
                    Error::Internal {
                        reason: format!("{} already exists", entity),
                    }
                }
            }
            RagError::DimensionMismatch { expected, got } => Error::DimensionMismatch {
                expected,
                actual: got,
            },
            RagError::EmbeddingFailed { reason } => Error::EmbeddingFailed { reason },
            RagError::InvalidInput { reason } => Error::InvalidInput { reason },
            RagError::Internal { reason } => Error::Internal { reason },
        }
    }
}

impl From<EmbedError> for Error {
    fn from(err: EmbedError) -> Self {
        Error::EmbeddingFailed {
            reason: err.to_string(),
        }
    }
}

impl From<LimitError> for Error {
    fn from(err: LimitError) -> Self {
        Error::InvalidInput {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragsearch_core::VectorId;

    #[test]
    fn test_vector_errors_keep_identifiers() {
        assert_eq!(
            Error::from(VectorError::LibraryNotFound { id: "docs".into() }),
            Error::LibraryNotFound {
                library: "docs".into()
            }
        );
        assert_eq!(
            Error::from(VectorError::DocumentAlreadyExists { id: "a".into() }),
            Error::DocumentExists {
                document: "a".into()
            }
        );
        assert_eq!(
            Error::from(VectorError::DimensionMismatch {
                expected: 3,
                got: 2
            }),
            Error::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_record_conflicts_are_internal() {
        let err = Error::from(VectorError::DuplicateId {
            id: VectorId::new(4),
        });
        assert!(matches!(err, Error::Internal { .. }));
    }

    #[test]
    fn test_rag_error_entities_parsed() {
        assert_eq!(
            Error::from(RagError::not_found("library 'docs'")),
            Error::LibraryNotFound {
                library: "docs".into()
            }
        );
        assert_eq!(
            Error::from(RagError::already_exists("document 'x/y'")),
            Error::DocumentExists {
                document: "x/y".into()
            }
        );
        assert!(matches!(
            Error::from(RagError::not_found("something")),
            Error::Internal { .. }
        ));
    }

    #[test]
    fn test_embed_error_becomes_embedding_failed() {
        let err = Error::from(EmbedError::Timeout);
        assert!(matches!(err, Error::EmbeddingFailed { .. }));
    }

    #[test]
    fn test_round_trip_through_rag_error() {
        let original = VectorError::ChunkNotFound { id: "d/0".into() };
        let via_rag = Error::from(RagError::from(original.clone()));
        assert_eq!(via_rag, Error::from(original));
    }
}
