//! Text embedding providers
//!
//! The [`Embedder`] trait is the only thing the ingestion pipeline knows
//! about an embedding model. Implementations:
//!
//! | Provider | Type | Notes |
//! |----------|------|-------|
//! | `hash` | [`HashEmbedder`] | Deterministic feature hashing, no network |
//! | `cohere` | [`CohereEmbedder`] | Cohere `/v1/embed`, needs the `cohere` feature |

pub mod cohere;
pub mod hash;
pub mod http;

pub use cohere::CohereEmbedder;
pub use hash::HashEmbedder;

use ragsearch_core::RagError;
use thiserror::Error;

/// Errors that can occur while embedding text
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmbedError {
    /// HTTP request failed (network unreachable, connection refused, bad status)
    #[error("network error: {0}")]
    Network(String),

    /// Provider response could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// Provider request timed out
    #[error("embedding request timed out")]
    Timeout,

    /// Provider returned a vector of unexpected length
    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Dimension the embedder advertises
        expected: usize,
        /// Length actually returned
        got: usize,
    },

    /// Required cargo feature is not enabled
    #[error("feature '{0}' not enabled")]
    FeatureDisabled(&'static str),

    /// No API key in config or environment
    #[error("missing API key: set {0}")]
    MissingApiKey(&'static str),

    /// Input text was empty
    #[error("cannot embed empty text")]
    EmptyInput,
}

impl From<EmbedError> for RagError {
    fn from(e: EmbedError) -> Self {
        RagError::embedding_failed(e.to_string())
    }
}

/// Turns text into fixed-length vectors.
///
/// Implementations must be deterministic for a given model and return
/// vectors of exactly [`Embedder::dimension`] entries. The trait is
/// object-safe for use as `Arc<dyn Embedder>`.
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    /// Embed several texts, preserving order.
    ///
    /// The default calls [`Embedder::embed`] once per text and stops at the
    /// first failure.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Length of every vector this embedder returns.
    fn dimension(&self) -> usize;

    /// Short provider name for logs and service info.
    fn name(&self) -> &str;
}
