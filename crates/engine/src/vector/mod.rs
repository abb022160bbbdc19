//! Vector index subsystem
//!
//! - **RecordStore**: per-library vector records, the single source of truth
//! - **VectorIndexBackend**: contract shared by every index variant
//! - **IndexBackend**: closed set of variants (Flat, InvertedFile, Graph)
//! - **VectorError**: error types for store, index and library operations

pub mod backend;
pub mod distance;
pub mod error;
pub mod flat;
pub mod hnsw;
pub mod ivf;
pub mod record;

pub use backend::{DeleteMode, IndexBackend, IndexStats, VectorIndexBackend};
pub use error::{VectorError, VectorResult};
pub use flat::FlatIndex;
pub use hnsw::HnswIndex;
pub use ivf::IvfIndex;
pub use record::{RecordStore, VectorRecord};
