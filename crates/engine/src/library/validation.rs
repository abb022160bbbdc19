//! Library id, document id and metadata validation

use ragsearch_core::{JsonScalar, Limits, Metadata};

use crate::vector::VectorError;

/// Validate a library id
///
/// # Validation Rules
/// - Cannot be empty
/// - Cannot exceed `max_library_id_bytes` (default 256)
/// - Cannot contain '/' (used as chunk id separator)
/// - Cannot contain null bytes
/// - Cannot start with '_' (reserved for system use)
pub fn validate_library_id(id: &str, limits: &Limits) -> Result<(), VectorError> {
    let invalid = |reason: String| VectorError::InvalidLibraryId {
        id: id.to_string(),
        reason,
    };

    if id.is_empty() {
        return Err(invalid("Library id cannot be empty".to_string()));
    }
    if id.len() > limits.max_library_id_bytes {
        return Err(invalid(format!(
            "Library id cannot exceed {} bytes",
            limits.max_library_id_bytes
        )));
    }
    if id.contains('/') {
        return Err(invalid("Library id cannot contain '/'".to_string()));
    }
    if id.contains('\0') {
        return Err(invalid("Library id cannot contain null bytes".to_string()));
    }
    if id.starts_with('_') {
        return Err(invalid(
            "Library ids starting with '_' are reserved".to_string(),
        ));
    }
    Ok(())
}

/// Validate a document id
///
/// # Validation Rules
/// - Cannot be empty
/// - Cannot exceed `max_document_id_bytes` (default 1024)
/// - Cannot contain '/' (chunk ids are `{document_id}/{index}`)
/// - Cannot contain null bytes
pub fn validate_document_id(id: &str, limits: &Limits) -> Result<(), VectorError> {
    let invalid = |reason: String| VectorError::InvalidDocumentId {
        id: id.to_string(),
        reason,
    };

    if id.is_empty() {
        return Err(invalid("Document id cannot be empty".to_string()));
    }
    if id.len() > limits.max_document_id_bytes {
        return Err(invalid(format!(
            "Document id cannot exceed {} bytes",
            limits.max_document_id_bytes
        )));
    }
    if id.contains('/') {
        return Err(invalid("Document id cannot contain '/'".to_string()));
    }
    if id.contains('\0') {
        return Err(invalid("Document id cannot contain null bytes".to_string()));
    }
    Ok(())
}

/// Validate metadata
///
/// Every value must be a scalar (null, bool, number or string); filters
/// cannot match arrays or objects.
pub fn validate_metadata(metadata: &Metadata) -> Result<(), VectorError> {
    for (key, value) in metadata {
        if JsonScalar::from_json(value).is_none() {
            return Err(VectorError::InvalidMetadata {
                key: key.clone(),
                reason: "value must be null, a bool, a number or a string".to_string(),
            });
        }
    }
    Ok(())
}
