//! # RAGSearch Executor
//!
//! The command surface of the RAGSearch engine. A transport layer (HTTP,
//! RPC, CLI) only needs this crate. It provides:
//! - [`RagSearch`] - typed wrapper for library, document and search operations
//! - [`Command`]/[`Output`] - serializable command interface
//! - [`Executor`] - command dispatcher over the library registry
//! - [`IngestPipeline`] - split, embed and index documents atomically
//!
//! ## Quick Start
//!
//! ```text
//! use ragsearch_executor::RagSearch;
//!
//! let rag = RagSearch::in_memory()?;
//! rag.create_library("docs")?;
//! rag.ingest("docs", Some("a"), "A flat index scans every record.", None)?;
//! let hits = rag.search("docs", "exhaustive scan", 5)?;
//! ```

#![warn(missing_docs)]

mod api;
mod command;
mod convert;
mod error;
mod executor;
mod output;
pub mod pipeline;
mod types;

// Handler modules
mod handlers;

// Test modules
#[cfg(test)]
mod tests;

pub use api::RagSearch;
pub use command::Command;
pub use error::Error;
pub use executor::Executor;
pub use output::Output;
pub use pipeline::{build_embedder, IngestPipeline};
pub use types::*;

// Re-export configuration so users don't need ragsearch-engine directly
pub use ragsearch_engine::EngineConfig;

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
