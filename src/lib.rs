//! RAGSearch - semantic search engine for retrieval-augmented generation
//!
//! RAGSearch stores documents as embedded chunks in named libraries, each
//! backed by one of three vector indexes (flat, inverted file, proximity
//! graph), and answers k-nearest-neighbor queries with metadata filtering.
//!
//! # Quick Start
//!
//! ```ignore
//! use ragsearch::RagSearch;
//!
//! ragsearch::init_tracing();
//! let rag = RagSearch::in_memory()?;
//! rag.create_library("docs")?;
//! rag.ingest("docs", Some("intro"), "Proximity graphs walk toward the query.", None)?;
//! let hits = rag.search("docs", "graph search", 5)?;
//! ```
//!
//! # Architecture
//!
//! All operations go through the [`Executor`], which dispatches
//! [`Command`]s to the library registry. [`RagSearch`] wraps it with typed
//! methods. Index internals stay in `ragsearch-engine`; only the command
//! surface and the collaborator contracts are re-exported here.

pub use ragsearch_executor::*;

pub use ragsearch_core::{JsonScalar, LibraryConfig, Limits, Metadata, RagError};
pub use ragsearch_intelligence::{
    CohereEmbedder, EmbedError, Embedder, HashEmbedder, TextChunk, TextSplitter,
};

use tracing_subscriber::EnvFilter;

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Falls back to `info` when `RUST_LOG` is unset or invalid. Returns
/// `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
