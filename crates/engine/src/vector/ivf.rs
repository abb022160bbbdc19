//! Inverted-file (IVF) index backend
//!
//! Vectors are partitioned into `nlist` buckets around centroids trained by
//! k-means at `build` time. A query ranks the centroids and scans the
//! `nprobe` closest buckets.
//!
//! ## Behavior
//!
//! - Training is deterministic: seeds are drawn with SplitMix64 from a fixed
//!   seed, then refined for `kmeans_iterations` rounds (or until stable).
//! - `insert` assigns to the nearest existing centroid without reclustering.
//!   While fewer than `nlist` centroids exist, the new vector seeds its own.
//! - When the probed buckets hold fewer than `k` filter-matching records,
//!   further buckets are scanned in centroid order until `k` are found or
//!   every bucket has been scanned.
//! - Delete removes the id from its bucket immediately.

use std::cmp::Ordering;
use std::collections::HashMap;

use ragsearch_core::{DistanceMetric, IvfParams, MetadataFilter, VectorId};

use crate::vector::backend::{
    check_query, finalize, passes_filter, DeleteMode, IndexStats, VectorIndexBackend,
};
use crate::vector::distance::rank_score;
use crate::vector::error::{VectorError, VectorResult};
use crate::vector::hnsw::splitmix64;
use crate::vector::record::RecordStore;

/// Fixed seed for deterministic centroid selection
const KMEANS_SEED: u64 = 42;

/// Inverted-file vector search backend
pub struct IvfIndex {
    metric: DistanceMetric,
    params: IvfParams,
    centroids: Vec<Vec<f32>>,
    /// buckets[c] = ids assigned to centroid c, ascending
    buckets: Vec<Vec<VectorId>>,
    assignment: HashMap<VectorId, usize>,
}

impl IvfIndex {
    /// Create an empty inverted-file index
    pub fn new(metric: DistanceMetric, params: IvfParams) -> Self {
        IvfIndex {
            metric,
            params,
            centroids: Vec::new(),
            buckets: Vec::new(),
            assignment: HashMap::new(),
        }
    }

    /// Number of trained or seeded centroids
    pub fn centroid_count(&self) -> usize {
        self.centroids.len()
    }

    /// Bucket indices ordered by centroid closeness to `query`
    fn probe_order(&self, query: &[f32]) -> Vec<usize> {
        let mut scored: Vec<(usize, f32)> = self
            .centroids
            .iter()
            .enumerate()
            .map(|(i, c)| (i, rank_score(query, c, self.metric)))
            .collect();
        scored.sort_by(|(i_a, s_a), (i_b, s_b)| {
            s_b.partial_cmp(s_a)
                .unwrap_or(Ordering::Equal)
                .then_with(|| i_a.cmp(i_b))
        });
        scored.into_iter().map(|(i, _)| i).collect()
    }
}

/// Index of the closest centroid (lowest index on ties)
fn nearest_centroid(vector: &[f32], centroids: &[Vec<f32>], metric: DistanceMetric) -> usize {
    let mut best = 0;
    let mut best_score = f32::NEG_INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let score = rank_score(vector, c, metric);
        if score > best_score {
            best = i;
            best_score = score;
        }
    }
    best
}

/// Train up to `nlist` centroids with seeded k-means
fn train_centroids(vectors: &[&[f32]], params: &IvfParams, metric: DistanceMetric) -> Vec<Vec<f32>> {
    let n = vectors.len();
    let k = params.nlist.min(n);
    if k == 0 {
        return Vec::new();
    }
    let dim = vectors[0].len();

    // Partial Fisher-Yates over the input order picks k distinct seeds
    let mut order: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let r = (splitmix64(KMEANS_SEED.wrapping_add(i as u64)) % (n - i) as u64) as usize;
        order.swap(i, i + r);
    }
    let mut centroids: Vec<Vec<f32>> = order[..k].iter().map(|&i| vectors[i].to_vec()).collect();

    let mut assignments: Vec<usize> = vec![usize::MAX; n];
    for _ in 0..params.kmeans_iterations {
        let mut changed = false;
        for (slot, v) in assignments.iter_mut().zip(vectors) {
            let c = nearest_centroid(v, &centroids, metric);
            if *slot != c {
                *slot = c;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = vec![vec![0.0f32; dim]; k];
        let mut counts = vec![0usize; k];
        for (&c, v) in assignments.iter().zip(vectors) {
            counts[c] += 1;
            for (acc, x) in sums[c].iter_mut().zip(v.iter()) {
                *acc += x;
            }
        }
        // Empty clusters keep their previous centroid
        for (c, sum) in sums.into_iter().enumerate() {
            if counts[c] > 0 {
                let inv = 1.0 / counts[c] as f32;
                centroids[c] = sum.into_iter().map(|x| x * inv).collect();
            }
        }
    }

    centroids
}

impl VectorIndexBackend for IvfIndex {
    fn build(&mut self, store: &RecordStore) {
        let ids: Vec<VectorId> = store.list();
        let vectors: Vec<&[f32]> = store.iter().map(|(_, r)| &r.vector[..]).collect();

        self.centroids = train_centroids(&vectors, &self.params, self.metric);
        self.buckets = vec![Vec::new(); self.centroids.len()];
        self.assignment.clear();

        for (id, v) in ids.into_iter().zip(vectors) {
            let c = nearest_centroid(v, &self.centroids, self.metric);
            self.buckets[c].push(id);
            self.assignment.insert(id, c);
        }
    }

    fn insert(&mut self, id: VectorId, store: &RecordStore) -> VectorResult<()> {
        if self.assignment.contains_key(&id) {
            return Err(VectorError::DuplicateId { id });
        }
        let vector = store.vector(id).ok_or(VectorError::VectorNotFound { id })?;

        let c = if self.centroids.len() < self.params.nlist {
            self.centroids.push(vector.to_vec());
            self.buckets.push(Vec::new());
            self.centroids.len() - 1
        } else {
            nearest_centroid(vector, &self.centroids, self.metric)
        };
        self.buckets[c].push(id);
        self.assignment.insert(id, c);
        Ok(())
    }

    fn delete(&mut self, id: VectorId, mode: DeleteMode) -> VectorResult<bool> {
        match self.assignment.remove(&id) {
            Some(c) => {
                self.buckets[c].retain(|x| *x != id);
                Ok(true)
            }
            None if mode == DeleteMode::Strict => Err(VectorError::VectorNotFound { id }),
            None => Ok(false),
        }
    }

    fn search(
        &self,
        query: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
        store: &RecordStore,
    ) -> VectorResult<Vec<(VectorId, f32)>> {
        check_query(query, store)?;
        if k == 0 || self.assignment.is_empty() {
            return Ok(Vec::new());
        }

        let nprobe = self.params.nprobe.max(1);
        let mut ranked: Vec<(VectorId, f32)> = Vec::new();
        for (probed, bucket) in self.probe_order(query).into_iter().enumerate() {
            if probed >= nprobe && ranked.len() >= k {
                break;
            }
            for &id in &self.buckets[bucket] {
                if !passes_filter(id, filter, store) {
                    continue;
                }
                if let Some(v) = store.vector(id) {
                    ranked.push((id, rank_score(query, v, self.metric)));
                }
            }
        }

        Ok(finalize(ranked, k, self.metric))
    }

    fn contains(&self, id: VectorId) -> bool {
        self.assignment.contains_key(&id)
    }

    fn len(&self) -> usize {
        self.assignment.len()
    }

    fn index_type_name(&self) -> &'static str {
        "inverted_file"
    }

    fn stats(&self) -> IndexStats {
        IndexStats {
            index_type: self.index_type_name().to_string(),
            live: self.assignment.len(),
            centroids: self.centroids.len(),
            ..IndexStats::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragsearch_core::Metadata;
    use serde_json::json;

    fn params(nlist: usize, nprobe: usize) -> IvfParams {
        IvfParams {
            nlist,
            nprobe,
            kmeans_iterations: 10,
        }
    }

    fn clustered_store() -> RecordStore {
        let mut store = RecordStore::new(2);
        for i in 0..40 {
            let (cx, cy, group) = match i % 4 {
                0 => (10.0, 0.0, "a"),
                1 => (0.0, 10.0, "b"),
                2 => (-10.0, 0.0, "c"),
                _ => (0.0, -10.0, "d"),
            };
            let jitter = (i / 4) as f32 * 0.01;
            let id = store.allocate_id();
            let mut meta = Metadata::new();
            meta.insert("group".into(), json!(group));
            store
                .put(id, format!("d/{}", i), vec![cx + jitter, cy - jitter], meta)
                .unwrap();
        }
        store
    }

    #[test]
    fn test_build_trains_nlist_centroids() {
        let store = clustered_store();
        let mut index = IvfIndex::new(DistanceMetric::Euclidean, params(4, 1));
        index.build(&store);
        assert_eq!(index.centroid_count(), 4);
        assert_eq!(index.len(), 40);
        assert_eq!(index.stats().centroids, 4);
    }

    #[test]
    fn test_build_is_deterministic() {
        let store = clustered_store();
        let mut a = IvfIndex::new(DistanceMetric::Euclidean, params(4, 1));
        let mut b = IvfIndex::new(DistanceMetric::Euclidean, params(4, 1));
        a.build(&store);
        b.build(&store);
        assert_eq!(a.centroids, b.centroids);
        let q = [9.0, 1.0];
        assert_eq!(
            a.search(&q, 5, None, &store).unwrap(),
            b.search(&q, 5, None, &store).unwrap()
        );
    }

    #[test]
    fn test_search_finds_nearest_cluster() {
        let store = clustered_store();
        let mut index = IvfIndex::new(DistanceMetric::Euclidean, params(4, 1));
        index.build(&store);

        let results = index.search(&[10.0, 0.0], 3, None, &store).unwrap();
        assert_eq!(results.len(), 3);
        for (id, _) in &results {
            let meta = &store.get(*id).unwrap().metadata;
            assert_eq!(meta["group"], json!("a"));
        }
    }

    #[test]
    fn test_adaptive_probing_fills_k_under_filter() {
        let store = clustered_store();
        let mut index = IvfIndex::new(DistanceMetric::Euclidean, params(4, 1));
        index.build(&store);

        // Query sits in cluster "a" but the filter only admits cluster "c"
        let filter = MetadataFilter::new().eq("group", "c");
        let results = index
            .search(&[10.0, 0.0], 4, Some(&filter), &store)
            .unwrap();
        assert_eq!(results.len(), 4);

        // More than exist: every matching record comes back
        let results = index
            .search(&[10.0, 0.0], 100, Some(&filter), &store)
            .unwrap();
        assert_eq!(results.len(), 10);
    }

    #[test]
    fn test_insert_seeds_centroids_when_built_empty() {
        let store = clustered_store();
        let mut index = IvfIndex::new(DistanceMetric::Cosine, params(3, 1));
        for id in store.list() {
            index.insert(id, &store).unwrap();
        }
        assert_eq!(index.centroid_count(), 3);
        assert_eq!(index.len(), 40);
        assert_eq!(index.search(&[1.0, 0.0], 40, None, &store).unwrap().len(), 40);
    }

    #[test]
    fn test_delete_removes_from_bucket() {
        let store = clustered_store();
        let mut index = IvfIndex::new(DistanceMetric::Euclidean, params(4, 4));
        index.build(&store);

        let first = index.search(&[10.0, 0.0], 1, None, &store).unwrap()[0].0;
        assert!(index.delete(first, DeleteMode::Strict).unwrap());
        assert!(!index.contains(first));
        let results = index.search(&[10.0, 0.0], 40, None, &store).unwrap();
        assert!(results.iter().all(|(id, _)| *id != first));
        assert_eq!(results.len(), 39);

        assert!(!index.delete(first, DeleteMode::IgnoreMissing).unwrap());
        assert_eq!(
            index.insert(store.list()[1], &store),
            Err(VectorError::DuplicateId {
                id: store.list()[1]
            })
        );
    }
}
