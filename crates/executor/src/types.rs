//! Supporting types for commands and outputs.
//!
//! These types are used in command parameters and output values.
//! All types are serializable for a transport layer.

use ragsearch_core::Metadata;
use ragsearch_engine::library::merge_metadata;
use ragsearch_engine::{Chunk, Document, ScoredChunk};
use serde::{Deserialize, Serialize};

pub use ragsearch_core::{DistanceMetric, IndexKind, IndexParams, MetadataFilter};
pub use ragsearch_engine::{LibraryInfo, LibraryStats};

// =============================================================================
// Search Types
// =============================================================================

/// What to search for: free text (embedded first) or a raw vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchQuery {
    /// Text embedded with the configured embedder
    Text(String),
    /// Vector of the library's dimension
    Vector(Vec<f32>),
}

impl From<&str> for SearchQuery {
    fn from(s: &str) -> Self {
        SearchQuery::Text(s.to_string())
    }
}

impl From<String> for SearchQuery {
    fn from(s: String) -> Self {
        SearchQuery::Text(s)
    }
}

impl From<Vec<f32>> for SearchQuery {
    fn from(v: Vec<f32>) -> Self {
        SearchQuery::Vector(v)
    }
}

/// One search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Chunk id (`{document_id}/{index}`)
    pub chunk_id: String,
    /// Owning document
    pub document_id: String,
    /// Similarity (cosine, dot product) or L2 distance (euclidean)
    pub score: f32,
    /// Chunk text
    pub text: String,
    /// Document metadata overlaid with chunk metadata
    pub metadata: Metadata,
}

impl From<ScoredChunk> for SearchHit {
    fn from(c: ScoredChunk) -> Self {
        SearchHit {
            chunk_id: c.chunk_id,
            document_id: c.document_id,
            score: c.score,
            text: c.text,
            metadata: c.metadata,
        }
    }
}

// =============================================================================
// Document Types
// =============================================================================

/// Caller-supplied chunk for `IngestChunks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkInput {
    /// Chunk text
    pub text: String,
    /// Precomputed embedding; embedded from `text` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    /// Chunk-level metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl ChunkInput {
    /// Chunk to be embedded from its text
    pub fn text(text: impl Into<String>) -> Self {
        ChunkInput {
            text: text.into(),
            embedding: None,
            metadata: None,
        }
    }

    /// Chunk with a precomputed embedding
    pub fn embedded(text: impl Into<String>, embedding: Vec<f32>) -> Self {
        ChunkInput {
            text: text.into(),
            embedding: Some(embedding),
            metadata: None,
        }
    }

    /// Attach chunk-level metadata
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Chunk as returned by `GetDocument`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkInfo {
    /// Chunk id
    pub id: String,
    /// Position within the document
    pub index: usize,
    /// Chunk text
    pub text: String,
    /// Byte offset of the span start
    pub start: usize,
    /// Byte offset one past the span end
    pub end: usize,
    /// Effective metadata
    pub metadata: Metadata,
}

impl From<Chunk> for ChunkInfo {
    fn from(c: Chunk) -> Self {
        ChunkInfo {
            id: c.id,
            index: c.index,
            text: c.text,
            start: c.start,
            end: c.end,
            metadata: c.metadata,
        }
    }
}

/// Document summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Document id
    pub id: String,
    /// Owning library
    pub library_id: String,
    /// Document metadata
    pub metadata: Metadata,
    /// Chunk ids in document order
    pub chunk_ids: Vec<String>,
    /// Creation time (microseconds since epoch)
    pub created_at: u64,
    /// Last modification (microseconds since epoch)
    pub updated_at: u64,
    /// Chunk contents, filled by `GetDocument` only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chunks: Vec<ChunkInfo>,
}

impl DocumentInfo {
    /// Summary of an engine document
    pub fn from_document(library_id: &str, doc: Document) -> Self {
        DocumentInfo {
            id: doc.id,
            library_id: library_id.to_string(),
            metadata: doc.metadata,
            chunk_ids: doc.chunk_ids,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
            chunks: Vec::new(),
        }
    }

    /// Attach chunk contents, overlaying each chunk's metadata on the
    /// document's
    pub fn with_chunks(mut self, chunks: Vec<Chunk>) -> Self {
        self.chunks = chunks
            .into_iter()
            .map(|c| {
                let metadata = merge_metadata(&self.metadata, &c.metadata);
                ChunkInfo {
                    metadata,
                    ..ChunkInfo::from(c)
                }
            })
            .collect();
        self
    }
}

// =============================================================================
// Service Types
// =============================================================================

/// Service information (backs a transport's health endpoint)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name
    pub name: String,
    /// Crate version
    pub version: String,
    /// Number of libraries
    pub libraries: usize,
    /// Embedding provider name
    pub embedder: String,
    /// Embedding dimension
    pub embedding_dimension: usize,
}
