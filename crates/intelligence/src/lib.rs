//! Embedding and text splitting for RAGSearch
//!
//! This crate provides:
//! - `Embedder` trait: the embedding collaborator contract
//! - `HashEmbedder`: deterministic offline embeddings
//! - `CohereEmbedder`: Cohere embed API over HTTP (feature `cohere`)
//! - `TextSplitter`: word-boundary chunking with overlap

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk;
pub mod embed;

pub use chunk::{TextChunk, TextSplitter};
pub use embed::{CohereEmbedder, EmbedError, Embedder, HashEmbedder};
