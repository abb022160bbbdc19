//! Flat (brute-force) index backend
//!
//! Exact O(n) scan over every indexed record. This is the correctness
//! baseline the approximate backends are measured against.

use std::collections::BTreeSet;

use ragsearch_core::{DistanceMetric, MetadataFilter, VectorId};

use crate::vector::backend::{
    check_query, finalize, passes_filter, DeleteMode, IndexStats, VectorIndexBackend,
};
use crate::vector::distance::rank_score;
use crate::vector::error::{VectorError, VectorResult};
use crate::vector::record::RecordStore;

/// Brute-force vector search backend
pub struct FlatIndex {
    metric: DistanceMetric,
    /// BTreeSet so the scan runs in VectorId order
    ids: BTreeSet<VectorId>,
}

impl FlatIndex {
    /// Create an empty flat index
    pub fn new(metric: DistanceMetric) -> Self {
        FlatIndex {
            metric,
            ids: BTreeSet::new(),
        }
    }
}

impl VectorIndexBackend for FlatIndex {
    fn build(&mut self, store: &RecordStore) {
        self.ids = store.iter().map(|(id, _)| id).collect();
    }

    fn insert(&mut self, id: VectorId, store: &RecordStore) -> VectorResult<()> {
        if !store.contains(id) {
            return Err(VectorError::VectorNotFound { id });
        }
        if !self.ids.insert(id) {
            return Err(VectorError::DuplicateId { id });
        }
        Ok(())
    }

    fn delete(&mut self, id: VectorId, mode: DeleteMode) -> VectorResult<bool> {
        let removed = self.ids.remove(&id);
        if !removed && mode == DeleteMode::Strict {
            return Err(VectorError::VectorNotFound { id });
        }
        Ok(removed)
    }

    fn search(
        &self,
        query: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
        store: &RecordStore,
    ) -> VectorResult<Vec<(VectorId, f32)>> {
        check_query(query, store)?;
        if k == 0 || self.ids.is_empty() {
            return Ok(Vec::new());
        }

        let ranked: Vec<(VectorId, f32)> = self
            .ids
            .iter()
            .filter(|id| passes_filter(**id, filter, store))
            .filter_map(|&id| {
                store
                    .vector(id)
                    .map(|v| (id, rank_score(query, v, self.metric)))
            })
            .collect();

        Ok(finalize(ranked, k, self.metric))
    }

    fn contains(&self, id: VectorId) -> bool {
        self.ids.contains(&id)
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    fn index_type_name(&self) -> &'static str {
        "flat"
    }

    fn stats(&self) -> IndexStats {
        IndexStats {
            index_type: self.index_type_name().to_string(),
            live: self.ids.len(),
            ..IndexStats::default()
        }
    }
}
