//! Library configuration and identifier types
//!
//! These types describe how a library's vectors are compared and indexed.
//! The scoring and indexing logic itself lives in the engine crate.

use crate::error::RagError;
use serde::{Deserialize, Serialize};

/// Distance metric for similarity calculation
///
/// Cosine and dot product are similarities (higher = more similar, results
/// ordered descending). Euclidean is a distance (lower = more similar,
/// results ordered ascending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Cosine similarity: dot(a,b) / (||a|| * ||b||)
    /// Range: [-1, 1], higher = more similar
    #[default]
    Cosine,

    /// Euclidean (L2) distance
    /// Range: [0, inf), lower = more similar
    Euclidean,

    /// Dot product (raw value)
    /// Range: unbounded, higher = more similar
    DotProduct,
}

impl DistanceMetric {
    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::DotProduct => "dot_product",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cosine" => Some(DistanceMetric::Cosine),
            "euclidean" | "l2" => Some(DistanceMetric::Euclidean),
            "dot_product" | "dot" | "inner_product" => Some(DistanceMetric::DotProduct),
            _ => None,
        }
    }

    /// True when reported scores are distances (ascending order)
    pub fn is_distance(&self) -> bool {
        matches!(self, DistanceMetric::Euclidean)
    }
}

/// Index algorithm backing a library
///
/// Selected at library creation and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Exact brute-force scan
    #[default]
    Flat,
    /// Inverted file: k-means buckets probed per query
    InvertedFile,
    /// Layered proximity graph (HNSW-style)
    Graph,
}

impl IndexKind {
    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            IndexKind::Flat => "flat",
            IndexKind::InvertedFile => "inverted_file",
            IndexKind::Graph => "graph",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flat" | "brute_force" => Some(IndexKind::Flat),
            "inverted_file" | "ivf" => Some(IndexKind::InvertedFile),
            "graph" | "hnsw" => Some(IndexKind::Graph),
            _ => None,
        }
    }
}

/// Inverted-file parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IvfParams {
    /// Number of clusters (default: 16)
    pub nlist: usize,
    /// Buckets scanned per query (default: 4)
    pub nprobe: usize,
    /// k-means refinement rounds at build time (default: 10)
    pub kmeans_iterations: usize,
}

impl Default for IvfParams {
    fn default() -> Self {
        IvfParams {
            nlist: 16,
            nprobe: 4,
            kmeans_iterations: 10,
        }
    }
}

/// Proximity graph parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HnswParams {
    /// Max neighbors per node on layers > 0; layer 0 allows 2*m (default: 16)
    pub m: usize,
    /// Build-time beam width (default: 200)
    pub ef_construction: usize,
    /// Search-time beam width (default: 50)
    pub ef_search: usize,
}

impl Default for HnswParams {
    fn default() -> Self {
        HnswParams {
            m: 16,
            ef_construction: 200,
            ef_search: 50,
        }
    }
}

/// Tuning parameters for every index kind
///
/// Only the section matching the library's `IndexKind` is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexParams {
    /// Inverted-file parameters
    #[serde(default)]
    pub ivf: IvfParams,
    /// Graph parameters
    #[serde(default)]
    pub hnsw: HnswParams,
}

impl IndexParams {
    /// Validate parameter ranges
    pub fn validate(&self) -> Result<(), RagError> {
        if self.ivf.nlist == 0 || self.ivf.nprobe == 0 || self.ivf.kmeans_iterations == 0 {
            return Err(RagError::invalid_input(
                "nlist, nprobe and kmeans_iterations must be > 0",
            ));
        }
        if self.ivf.nprobe > self.ivf.nlist {
            return Err(RagError::invalid_input(format!(
                "nprobe ({}) cannot exceed nlist ({})",
                self.ivf.nprobe, self.ivf.nlist
            )));
        }
        if self.hnsw.m < 2 {
            return Err(RagError::invalid_input("m must be >= 2"));
        }
        if self.hnsw.ef_construction == 0 || self.hnsw.ef_search == 0 {
            return Err(RagError::invalid_input(
                "ef_construction and ef_search must be > 0",
            ));
        }
        Ok(())
    }
}

/// Library configuration - immutable after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Embedding dimension (e.g., 384, 768, 1024)
    pub dimension: usize,
    /// Distance metric
    pub metric: DistanceMetric,
    /// Index algorithm
    pub index_kind: IndexKind,
    /// Index tuning parameters
    #[serde(default)]
    pub params: IndexParams,
}

impl LibraryConfig {
    /// Create a new LibraryConfig with default index parameters
    ///
    /// Returns an error if dimension is 0.
    pub fn new(
        dimension: usize,
        metric: DistanceMetric,
        index_kind: IndexKind,
    ) -> Result<Self, RagError> {
        if dimension == 0 {
            return Err(RagError::invalid_input(format!(
                "Invalid dimension: {} (must be > 0)",
                dimension
            )));
        }
        Ok(LibraryConfig {
            dimension,
            metric,
            index_kind,
            params: IndexParams::default(),
        })
    }

    /// Replace the index parameters
    pub fn with_params(mut self, params: IndexParams) -> Self {
        self.params = params;
        self
    }

    /// Config for Cohere embed-english-v3.0 (1024 dims)
    pub fn for_cohere_v3(index_kind: IndexKind) -> Self {
        LibraryConfig {
            dimension: 1024,
            metric: DistanceMetric::Cosine,
            index_kind,
            params: IndexParams::default(),
        }
    }

    /// Config for MiniLM (384 dims)
    pub fn for_minilm(index_kind: IndexKind) -> Self {
        LibraryConfig {
            dimension: 384,
            metric: DistanceMetric::Cosine,
            index_kind,
            params: IndexParams::default(),
        }
    }
}

/// Internal record identifier (stable within a library)
///
/// Allocated monotonically per library, so comparing two ids compares
/// insertion order. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VectorId(pub u64);

impl VectorId {
    /// Create a new VectorId
    pub fn new(id: u64) -> Self {
        VectorId(id)
    }

    /// Get the underlying u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for VectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VectorId({})", self.0)
    }
}

/// Current time in microseconds since the Unix epoch
pub fn now_micros() -> u64 {
    chrono::Utc::now().timestamp_micros().max(0) as u64
}
