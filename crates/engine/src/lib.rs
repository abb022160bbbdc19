//! Vector index engine for RAGSearch
//!
//! This crate owns everything below the command surface:
//! - Vector record store and the three index variants (flat, inverted file, graph)
//! - Index Manager: one library's records, index and documents under one lock
//! - Library Registry: the process-scoped map of libraries
//! - Engine configuration (`ragsearch.toml`)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod library;
pub mod vector;

pub use config::{ChunkingSection, EmbeddingSection, EngineConfig, IndexSection, CONFIG_FILE_NAME};
pub use library::{
    Chunk, Document, IndexManager, LibraryInfo, LibraryRegistry, LibraryStats, NewChunk,
    ScoredChunk,
};
pub use vector::{
    DeleteMode, FlatIndex, HnswIndex, IndexBackend, IndexStats, IvfIndex, RecordStore,
    VectorError, VectorIndexBackend, VectorRecord, VectorResult,
};
