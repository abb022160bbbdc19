//! Size limits for identifiers, vectors and text
//!
//! Enforced by the engine on every write and query. Violations return
//! `LimitError`, which callers surface as `InvalidInput`.

use thiserror::Error;

/// Size limits enforced by the engine
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum library id length in bytes (default: 256)
    pub max_library_id_bytes: usize,

    /// Maximum document id length in bytes (default: 1024)
    pub max_document_id_bytes: usize,

    /// Maximum vector dimensions (default: 8192)
    pub max_vector_dim: usize,

    /// Maximum document text length in bytes (default: 16MB)
    pub max_text_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_library_id_bytes: 256,
            max_document_id_bytes: 1024,
            max_vector_dim: 8192,
            max_text_bytes: 16 * 1024 * 1024,
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        Limits {
            max_library_id_bytes: 16,
            max_document_id_bytes: 32,
            max_vector_dim: 64,
            max_text_bytes: 1000,
        }
    }

    /// Validate a vector dimension
    pub fn validate_dimension(&self, dimension: usize) -> Result<(), LimitError> {
        if dimension == 0 || dimension > self.max_vector_dim {
            return Err(LimitError::InvalidDimension {
                dimension,
                max: self.max_vector_dim,
            });
        }
        Ok(())
    }

    /// Validate document text length
    pub fn validate_text(&self, text: &str) -> Result<(), LimitError> {
        if text.len() > self.max_text_bytes {
            return Err(LimitError::TextTooLong {
                actual: text.len(),
                max: self.max_text_bytes,
            });
        }
        Ok(())
    }
}

/// Limit violation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitError {
    /// Dimension is zero or above the maximum
    #[error("invalid dimension {dimension} (must be in 1..={max})")]
    InvalidDimension {
        /// Requested dimension
        dimension: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Document text above the maximum
    #[error("text too long: {actual} bytes exceeds {max}")]
    TextTooLong {
        /// Actual length in bytes
        actual: usize,
        /// Maximum allowed
        max: usize,
    },
}

impl From<LimitError> for crate::RagError {
    fn from(e: LimitError) -> Self {
        crate::RagError::invalid_input(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_vector_dim, 8192);
        assert!(limits.validate_dimension(384).is_ok());
        assert!(limits.validate_dimension(8192).is_ok());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let limits = Limits::default();
        assert!(matches!(
            limits.validate_dimension(0),
            Err(LimitError::InvalidDimension { dimension: 0, .. })
        ));
    }

    #[test]
    fn test_small_limits() {
        let limits = Limits::with_small_limits();
        assert!(limits.validate_dimension(65).is_err());
        assert!(limits.validate_text(&"a".repeat(1001)).is_err());
    }
}
