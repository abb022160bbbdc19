//! Command enum defining all RAGSearch operations.
//!
//! Commands are:
//! - **Self-contained**: All parameters needed for execution are in the variant
//! - **Serializable**: Can be converted to/from JSON by a transport layer
//! - **Pure data**: No closures or executable code

use ragsearch_core::Metadata;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// A command is a self-contained, serializable operation.
///
/// # Command Categories
///
/// | Category | Count | Description |
/// |----------|-------|-------------|
/// | Service | 2 | Health and service info |
/// | Library | 6 | Library lifecycle and maintenance |
/// | Document | 6 | Ingestion, replacement, deletion, reads |
/// | Search | 1 | Nearest-neighbor query |
///
/// # Example
///
/// ```ignore
/// use ragsearch_executor::{Command, SearchQuery};
///
/// let cmd = Command::Search {
///     library: "docs".into(),
///     query: SearchQuery::Text("how do graphs search?".into()),
///     k: 5,
///     filter: None,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    // ==================== Service (2) ====================
    /// Liveness check.
    /// Returns: `Output::Pong`
    Ping,

    /// Service name, version and library count.
    /// Returns: `Output::ServiceInfo`
    Info,

    // ==================== Library (6) ====================
    /// Create a library. Omitted fields use the engine defaults; the
    /// dimension defaults to the embedder's.
    /// Returns: `Output::Library`
    CreateLibrary {
        library: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dimension: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metric: Option<DistanceMetric>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index_kind: Option<IndexKind>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<IndexParams>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    /// Delete a library and everything it owns.
    /// Returns: `Output::Unit`
    DeleteLibrary { library: String },

    /// Get a library's configuration and counts.
    /// Returns: `Output::Library`
    GetLibrary { library: String },

    /// List libraries sorted by id.
    /// Returns: `Output::Libraries`
    ListLibraries,

    /// Get library statistics.
    /// Returns: `Output::Stats`
    LibraryStats { library: String },

    /// Rebuild a library's index from its records.
    /// Returns: `Output::Stats`
    RebuildLibrary { library: String },

    // ==================== Document (6) ====================
    /// Split, embed and index a document atomically. A missing
    /// `document_id` is generated.
    /// Returns: `Output::Document`
    IngestDocument {
        library: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        document_id: Option<String>,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },

    /// Index caller-supplied chunks atomically, embedding those without a
    /// precomputed vector.
    /// Returns: `Output::Document`
    IngestChunks {
        library: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        document_id: Option<String>,
        chunks: Vec<ChunkInput>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },

    /// Replace an existing document's text and metadata atomically.
    /// Returns: `Output::Document`
    ReplaceDocument {
        library: String,
        document_id: String,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Metadata>,
    },

    /// Delete a document and all its chunks.
    /// Returns: `Output::Uint` (chunks removed)
    DeleteDocument {
        library: String,
        document_id: String,
    },

    /// Get a document with its chunks.
    /// Returns: `Output::Document`
    GetDocument {
        library: String,
        document_id: String,
    },

    /// List a library's documents sorted by id.
    /// Returns: `Output::Documents`
    ListDocuments { library: String },

    // ==================== Search (1) ====================
    /// Find the k nearest chunks, optionally restricted by metadata equality.
    /// Returns: `Output::Hits`
    Search {
        library: String,
        query: SearchQuery,
        k: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter: Option<MetadataFilter>,
    },
}

impl Command {
    /// Command name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping => "Ping",
            Command::Info => "Info",
            Command::CreateLibrary { .. } => "CreateLibrary",
            Command::DeleteLibrary { .. } => "DeleteLibrary",
            Command::GetLibrary { .. } => "GetLibrary",
            Command::ListLibraries => "ListLibraries",
            Command::LibraryStats { .. } => "LibraryStats",
            Command::RebuildLibrary { .. } => "RebuildLibrary",
            Command::IngestDocument { .. } => "IngestDocument",
            Command::IngestChunks { .. } => "IngestChunks",
            Command::ReplaceDocument { .. } => "ReplaceDocument",
            Command::DeleteDocument { .. } => "DeleteDocument",
            Command::GetDocument { .. } => "GetDocument",
            Command::ListDocuments { .. } => "ListDocuments",
            Command::Search { .. } => "Search",
        }
    }

    /// Whether the command mutates state
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Command::CreateLibrary { .. }
                | Command::DeleteLibrary { .. }
                | Command::RebuildLibrary { .. }
                | Command::IngestDocument { .. }
                | Command::IngestChunks { .. }
                | Command::ReplaceDocument { .. }
                | Command::DeleteDocument { .. }
        )
    }
}
