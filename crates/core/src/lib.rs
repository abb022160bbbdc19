//! Core types for RAGSearch
//!
//! This crate defines the foundational types shared by every layer:
//! - DistanceMetric / IndexKind / IndexParams: per-library index configuration
//! - LibraryConfig: immutable library configuration fixed at creation
//! - VectorId: per-library record identifier encoding insertion order
//! - MetadataFilter / JsonScalar: equality filtering over chunk metadata
//! - Limits: size limits enforced by the engine
//! - RagError: the error taxonomy reported to callers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod filter;
pub mod limits;
pub mod types;

pub use error::{RagError, RagResult};
pub use filter::{JsonScalar, Metadata, MetadataFilter};
pub use limits::{LimitError, Limits};
pub use types::{
    now_micros, DistanceMetric, HnswParams, IndexKind, IndexParams, IvfParams, LibraryConfig,
    VectorId,
};
