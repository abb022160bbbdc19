//! Library, document and chunk management
//!
//! - **LibraryRegistry**: process-scoped map of libraries
//! - **IndexManager**: one library's record store, index and documents
//! - **Document / Chunk**: stored content and chunk id scheme

pub mod document;
pub mod manager;
pub mod registry;
pub mod validation;

pub use document::{chunk_id, merge_metadata, Chunk, Document, NewChunk};
pub use manager::{IndexManager, LibraryInfo, LibraryStats, ScoredChunk};
pub use registry::LibraryRegistry;
pub use validation::{validate_document_id, validate_library_id, validate_metadata};
