//! Vector Index Backend trait
//!
//! Defines the interface shared by the index variants:
//! FlatIndex (exact O(n) scan)
//! IvfIndex (k-means buckets, probed per query)
//! HnswIndex (layered proximity graph)
//!
//! Backends never own the records they index. Every operation receives the
//! library's `RecordStore`, which stays the single source of truth.

use std::cmp::Ordering;

use ragsearch_core::{DistanceMetric, IndexKind, LibraryConfig, MetadataFilter, VectorId};
use serde::{Deserialize, Serialize};

use crate::vector::distance::report_score;
use crate::vector::error::{VectorError, VectorResult};
use crate::vector::flat::FlatIndex;
use crate::vector::hnsw::HnswIndex;
use crate::vector::ivf::IvfIndex;
use crate::vector::record::RecordStore;

/// Behavior of `delete` when the id is not indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Absent ids are a no-op success
    IgnoreMissing,
    /// Absent ids fail with `VectorNotFound`
    Strict,
}

/// Point-in-time index statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Index type name
    pub index_type: String,
    /// Live (searchable) records
    pub live: usize,
    /// Lazily deleted records awaiting rebuild
    pub tombstones: usize,
    /// Number of inverted-file centroids
    pub centroids: usize,
    /// Number of graph layers
    pub levels: usize,
}

/// Trait for swappable vector index implementations
///
/// Search results are `(VectorId, score)` pairs, best-first by the library
/// metric with ties broken by VectorId ascending. Scores are reported per
/// metric (see `distance::report_score`).
pub trait VectorIndexBackend: Send + Sync {
    /// Bulk-construct from every record in the store, replacing prior state
    fn build(&mut self, store: &RecordStore);

    /// Index one record already present in the store
    ///
    /// Fails with `DuplicateId` if the id is already indexed and with
    /// `VectorNotFound` if the store has no such record.
    fn insert(&mut self, id: VectorId, store: &RecordStore) -> VectorResult<()>;

    /// Remove a record from the index
    ///
    /// Returns true if the record was indexed.
    fn delete(&mut self, id: VectorId, mode: DeleteMode) -> VectorResult<bool>;

    /// Search for the k best records matching `filter`
    ///
    /// Fails with `DimensionMismatch` before any scoring when the query
    /// length differs from the store dimension.
    fn search(
        &self,
        query: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
        store: &RecordStore,
    ) -> VectorResult<Vec<(VectorId, f32)>>;

    /// Check if a record is indexed and live
    fn contains(&self, id: VectorId) -> bool;

    /// Get number of live indexed records
    fn len(&self) -> usize;

    /// Check if empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index type name (e.g. "flat", "inverted_file", "graph")
    fn index_type_name(&self) -> &'static str;

    /// Current statistics
    fn stats(&self) -> IndexStats;
}

/// Closed set of index variants, selected at library creation
pub enum IndexBackend {
    /// Exact brute-force scan
    Flat(FlatIndex),
    /// Inverted file
    InvertedFile(IvfIndex),
    /// Layered proximity graph
    Graph(HnswIndex),
}

impl IndexBackend {
    /// Create an empty backend for the library's index kind
    pub fn for_config(config: &LibraryConfig) -> Self {
        match config.index_kind {
            IndexKind::Flat => IndexBackend::Flat(FlatIndex::new(config.metric)),
            IndexKind::InvertedFile => {
                IndexBackend::InvertedFile(IvfIndex::new(config.metric, config.params.ivf))
            }
            IndexKind::Graph => IndexBackend::Graph(HnswIndex::new(config.metric, config.params.hnsw)),
        }
    }

    /// Index kind of this backend
    pub fn kind(&self) -> IndexKind {
        match self {
            IndexBackend::Flat(_) => IndexKind::Flat,
            IndexBackend::InvertedFile(_) => IndexKind::InvertedFile,
            IndexBackend::Graph(_) => IndexKind::Graph,
        }
    }

    fn inner(&self) -> &dyn VectorIndexBackend {
        match self {
            IndexBackend::Flat(b) => b,
            IndexBackend::InvertedFile(b) => b,
            IndexBackend::Graph(b) => b,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn VectorIndexBackend {
        match self {
            IndexBackend::Flat(b) => b,
            IndexBackend::InvertedFile(b) => b,
            IndexBackend::Graph(b) => b,
        }
    }
}

impl VectorIndexBackend for IndexBackend {
    fn build(&mut self, store: &RecordStore) {
        self.inner_mut().build(store)
    }

    fn insert(&mut self, id: VectorId, store: &RecordStore) -> VectorResult<()> {
        self.inner_mut().insert(id, store)
    }

    fn delete(&mut self, id: VectorId, mode: DeleteMode) -> VectorResult<bool> {
        self.inner_mut().delete(id, mode)
    }

    fn search(
        &self,
        query: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
        store: &RecordStore,
    ) -> VectorResult<Vec<(VectorId, f32)>> {
        self.inner().search(query, k, filter, store)
    }

    fn contains(&self, id: VectorId) -> bool {
        self.inner().contains(id)
    }

    fn len(&self) -> usize {
        self.inner().len()
    }

    fn index_type_name(&self) -> &'static str {
        self.inner().index_type_name()
    }

    fn stats(&self) -> IndexStats {
        self.inner().stats()
    }
}

/// Fail with `DimensionMismatch` if the query length is wrong
pub(crate) fn check_query(query: &[f32], store: &RecordStore) -> VectorResult<()> {
    if query.len() != store.dimension() {
        return Err(VectorError::DimensionMismatch {
            expected: store.dimension(),
            got: query.len(),
        });
    }
    Ok(())
}

/// Check a record against an optional metadata filter
pub(crate) fn passes_filter(
    id: VectorId,
    filter: Option<&MetadataFilter>,
    store: &RecordStore,
) -> bool {
    match filter {
        None => store.contains(id),
        Some(f) => store.get(id).is_some_and(|r| f.matches(&r.metadata)),
    }
}

/// Order ranked candidates, truncate to k and convert to reported scores
///
/// Sort is (rank desc, VectorId asc) so equal scores resolve to insertion
/// order.
pub(crate) fn finalize(
    mut ranked: Vec<(VectorId, f32)>,
    k: usize,
    metric: DistanceMetric,
) -> Vec<(VectorId, f32)> {
    ranked.sort_by(|(id_a, score_a), (id_b, score_b)| {
        score_b
            .partial_cmp(score_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| id_a.cmp(id_b))
    });
    ranked.truncate(k);
    for (_, score) in ranked.iter_mut() {
        *score = report_score(*score, metric);
    }
    ranked
}
