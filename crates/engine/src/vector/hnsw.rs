//! HNSW (Hierarchical Navigable Small World) index backend
//!
//! Approximate nearest neighbor search over a layered proximity graph.
//!
//! ## Design
//! - Nodes live in a dense arena addressed by slot; neighbor lists are slot
//!   sets, so cyclic links need no shared ownership
//! - Each node keeps its own `Arc` of the vector, so tombstoned nodes stay
//!   traversable after their record leaves the store
//! - Delete is lazy: the slot is flagged, traversed but never returned, and
//!   reclaimed only by `build`
//! - Deterministic: fixed-seed level assignment, sorted neighbor sets,
//!   tie-break (score desc, VectorId asc)
//!
//! ## Algorithm
//!
//! - Layer 0 contains all nodes with up to 2*M connections each
//! - Higher layers contain a subset of nodes with up to M connections each
//! - Search starts from the top layer and greedily descends to layer 0
//! - At layer 0, a beam search finds the ef closest neighbors
//!
//! Filtered or tombstone-heavy searches widen ef (x1, x3, x6, x12, capped at
//! the node count) until k matches are found, then fall back to a scan of the
//! arena.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeSet, BinaryHeap, HashMap};
use std::sync::Arc;

use ragsearch_core::{DistanceMetric, HnswParams, MetadataFilter, VectorId};

use crate::vector::backend::{
    check_query, finalize, passes_filter, DeleteMode, IndexStats, VectorIndexBackend,
};
use crate::vector::distance::rank_score;
use crate::vector::error::{VectorError, VectorResult};
use crate::vector::record::RecordStore;

/// ef multipliers tried when a search cannot fill k
const EF_WIDENING: [usize; 4] = [1, 3, 6, 12];

/// SplitMix64 hash function for deterministic PRNG
pub(crate) fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e3779b97f4a7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}

/// A node in the graph arena
#[derive(Debug, Clone)]
struct GraphNode {
    id: VectorId,
    vector: Arc<[f32]>,
    /// neighbors[layer] = neighbor slots, BTreeSet for deterministic order
    neighbors: Vec<BTreeSet<usize>>,
    deleted: bool,
}

/// Scored candidate (max-heap by score, tie-break by VectorId asc)
#[derive(Debug, Clone, PartialEq)]
struct ScoredSlot {
    score: f32,
    id: VectorId,
    slot: usize,
}

impl Eq for ScoredSlot {}

impl PartialOrd for ScoredSlot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredSlot {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap<ScoredSlot> pops the nearest candidate
        // BinaryHeap<Reverse<ScoredSlot>> pops the worst result
        self.score
            .partial_cmp(&other.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.id.cmp(&self.id))
    }
}

fn sort_best_first(v: &mut [ScoredSlot]) {
    v.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Layered proximity graph backend
pub struct HnswIndex {
    metric: DistanceMetric,
    params: HnswParams,
    /// Level multiplier: 1/ln(m)
    ml: f64,
    nodes: Vec<GraphNode>,
    slots: HashMap<VectorId, usize>,
    entry_point: Option<usize>,
    max_level: usize,
    live: usize,
    rng_seed: u64,
    rng_counter: u64,
}

impl HnswIndex {
    /// Create an empty graph
    pub fn new(metric: DistanceMetric, params: HnswParams) -> Self {
        HnswIndex {
            metric,
            params,
            ml: 1.0 / (params.m.max(2) as f64).ln(),
            nodes: Vec::new(),
            slots: HashMap::new(),
            entry_point: None,
            max_level: 0,
            live: 0,
            rng_seed: 42,
            rng_counter: 0,
        }
    }

    /// Number of lazily deleted nodes awaiting `build`
    pub fn tombstones(&self) -> usize {
        self.nodes.len() - self.live
    }

    fn max_connections(&self, layer: usize) -> usize {
        if layer == 0 {
            self.params.m * 2
        } else {
            self.params.m
        }
    }

    /// Assign a level using the seeded counter-based PRNG
    fn assign_level(&mut self) -> usize {
        self.rng_counter += 1;
        let hash = splitmix64(self.rng_seed.wrapping_add(self.rng_counter));
        let uniform = ((hash as f64) / (u64::MAX as f64)).max(1e-15);
        (-uniform.ln() * self.ml) as usize
    }

    fn score(&self, query: &[f32], slot: usize) -> f32 {
        rank_score(query, &self.nodes[slot].vector, self.metric)
    }

    /// Beam search at a single layer
    ///
    /// Returns up to `ef` closest live nodes, best first. Deleted nodes are
    /// traversed as waypoints but excluded from results.
    fn search_layer(&self, query: &[f32], entry: usize, ef: usize, layer: usize) -> Vec<ScoredSlot> {
        let entry_scored = ScoredSlot {
            score: self.score(query, entry),
            id: self.nodes[entry].id,
            slot: entry,
        };

        let mut visited = vec![false; self.nodes.len()];
        visited[entry] = true;

        let mut candidates = BinaryHeap::new();
        candidates.push(entry_scored.clone());

        let mut results: BinaryHeap<Reverse<ScoredSlot>> = BinaryHeap::new();
        if !self.nodes[entry].deleted {
            results.push(Reverse(entry_scored));
        }

        while let Some(nearest) = candidates.pop() {
            let worst = results.peek().map(|r| r.0.score).unwrap_or(f32::NEG_INFINITY);
            if nearest.score < worst && results.len() >= ef {
                break;
            }

            let node = &self.nodes[nearest.slot];
            let Some(neighbors) = node.neighbors.get(layer) else {
                continue;
            };
            for &n in neighbors {
                if visited[n] {
                    continue;
                }
                visited[n] = true;

                let score = self.score(query, n);
                let worst = results.peek().map(|r| r.0.score).unwrap_or(f32::NEG_INFINITY);
                if results.len() < ef || score > worst {
                    let scored = ScoredSlot {
                        score,
                        id: self.nodes[n].id,
                        slot: n,
                    };
                    candidates.push(scored.clone());
                    if !self.nodes[n].deleted {
                        results.push(Reverse(scored));
                        if results.len() > ef {
                            results.pop();
                        }
                    }
                }
            }
        }

        let mut out: Vec<ScoredSlot> = results.into_iter().map(|r| r.0).collect();
        sort_best_first(&mut out);
        out
    }

    /// Greedy descent from `from_layer` to `to_layer`, moving to the best
    /// neighbor at each step
    fn greedy_search_to_layer(
        &self,
        query: &[f32],
        entry: usize,
        from_layer: usize,
        to_layer: usize,
    ) -> usize {
        let mut current = entry;
        for layer in (to_layer..=from_layer).rev() {
            let mut improved = true;
            while improved {
                improved = false;
                let mut best_score = self.score(query, current);
                let mut best = current;
                if let Some(neighbors) = self.nodes[current].neighbors.get(layer) {
                    for &n in neighbors {
                        let score = self.score(query, n);
                        if score > best_score
                            || (score == best_score && self.nodes[n].id < self.nodes[best].id)
                        {
                            best_score = score;
                            best = n;
                        }
                    }
                }
                if best != current {
                    current = best;
                    improved = true;
                }
            }
        }
        current
    }

    /// Prune a node's neighbors at a layer down to `max_connections`
    fn prune_neighbors_for(&mut self, slot: usize, layer: usize, max_connections: usize) {
        let vector = Arc::clone(&self.nodes[slot].vector);
        let mut scored: Vec<ScoredSlot> = self.nodes[slot].neighbors[layer]
            .iter()
            .map(|&n| ScoredSlot {
                score: self.score(&vector, n),
                id: self.nodes[n].id,
                slot: n,
            })
            .collect();
        sort_best_first(&mut scored);
        self.nodes[slot].neighbors[layer] =
            scored.iter().take(max_connections).map(|s| s.slot).collect();
    }

    /// Link a new node into the graph
    fn insert_node(&mut self, id: VectorId, vector: Arc<[f32]>) {
        let level = self.assign_level();
        let slot = self.nodes.len();
        self.nodes.push(GraphNode {
            id,
            vector: Arc::clone(&vector),
            neighbors: (0..=level).map(|_| BTreeSet::new()).collect(),
            deleted: false,
        });
        self.slots.insert(id, slot);
        self.live += 1;

        let Some(entry) = self.entry_point else {
            self.entry_point = Some(slot);
            self.max_level = level;
            return;
        };

        let mut current = entry;
        if self.max_level > level {
            current = self.greedy_search_to_layer(&vector, entry, self.max_level, level + 1);
        }

        for layer in (0..=level.min(self.max_level)).rev() {
            let candidates =
                self.search_layer(&vector, current, self.params.ef_construction, layer);
            let selected: Vec<usize> = candidates
                .iter()
                .filter(|c| c.slot != slot)
                .take(self.params.m)
                .map(|c| c.slot)
                .collect();

            self.nodes[slot].neighbors[layer].extend(selected.iter().copied());

            let max_conn = self.max_connections(layer);
            for &n in &selected {
                let needs_prune = match self.nodes[n].neighbors.get_mut(layer) {
                    Some(set) => {
                        set.insert(slot);
                        set.len() > max_conn
                    }
                    None => false,
                };
                if needs_prune {
                    self.prune_neighbors_for(n, layer, max_conn);
                }
            }

            if let Some(closest) = candidates.first() {
                current = closest.slot;
            }
        }

        if level > self.max_level {
            self.entry_point = Some(slot);
            self.max_level = level;
        }
    }

    /// Beam search at layer 0 with the given ef
    fn beam(&self, query: &[f32], ef: usize) -> Vec<ScoredSlot> {
        let Some(entry) = self.entry_point else {
            return Vec::new();
        };
        let mut current = entry;
        if self.max_level > 0 {
            current = self.greedy_search_to_layer(query, entry, self.max_level, 1);
        }
        self.search_layer(query, current, ef, 0)
    }

    fn admit(&self, s: &ScoredSlot, filter: Option<&MetadataFilter>, store: &RecordStore) -> bool {
        !self.nodes[s.slot].deleted && passes_filter(s.id, filter, store)
    }
}

impl VectorIndexBackend for HnswIndex {
    fn build(&mut self, store: &RecordStore) {
        self.nodes.clear();
        self.slots.clear();
        self.entry_point = None;
        self.max_level = 0;
        self.live = 0;
        // Reset RNG counter to reproduce deterministic levels
        self.rng_counter = 0;

        for (id, record) in store.iter() {
            self.insert_node(id, Arc::clone(&record.vector));
        }
    }

    fn insert(&mut self, id: VectorId, store: &RecordStore) -> VectorResult<()> {
        if self.slots.contains_key(&id) {
            return Err(VectorError::DuplicateId { id });
        }
        let vector = store.vector(id).ok_or(VectorError::VectorNotFound { id })?;
        self.insert_node(id, Arc::clone(vector));
        Ok(())
    }

    fn delete(&mut self, id: VectorId, mode: DeleteMode) -> VectorResult<bool> {
        match self.slots.get(&id) {
            Some(&slot) if !self.nodes[slot].deleted => {
                self.nodes[slot].deleted = true;
                self.live -= 1;
                Ok(true)
            }
            _ if mode == DeleteMode::Strict => Err(VectorError::VectorNotFound { id }),
            _ => Ok(false),
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
        if k == 0 || self.live == 0 {
            return Ok(Vec::new());
        }

        let base = self.params.ef_search.max(k);
        let total = self.nodes.len();
        for factor in EF_WIDENING {
            let ef = (base * factor).min(total);
            let hits: Vec<(VectorId, f32)> = self
                .beam(query, ef)
                .into_iter()
                .filter(|s| self.admit(s, filter, store))
                .map(|s| (s.id, s.score))
                .collect();
            if hits.len() >= k {
                return Ok(finalize(hits, k, self.metric));
            }
            if ef == total {
                break;
            }
        }

        // Beam could not fill k (sparse filter or unreachable nodes)
        let ranked: Vec<(VectorId, f32)> = self
            .nodes
            .iter()
            .filter(|n| !n.deleted && passes_filter(n.id, filter, store))
            .map(|n| (n.id, rank_score(query, &n.vector, self.metric)))
            .collect();
        Ok(finalize(ranked, k, self.metric))
    }

    fn contains(&self, id: VectorId) -> bool {
        self.slots
            .get(&id)
            .is_some_and(|&slot| !self.nodes[slot].deleted)
    }

    fn len(&self) -> usize {
        self.live
    }

    fn index_type_name(&self) -> &'static str {
        "graph"
    }

    fn stats(&self) -> IndexStats {
        IndexStats {
            index_type: self.index_type_name().to_string(),
            live: self.live,
            tombstones: self.tombstones(),
            centroids: 0,
            levels: if self.nodes.is_empty() {
                0
            } else {
                self.max_level + 1
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::flat::FlatIndex;
    use ragsearch_core::Metadata;

    fn pseudo_vector(seed: u64, dim: usize) -> Vec<f32> {
        (0..dim)
            .map(|d| {
                let h = splitmix64(seed * 1000 + d as u64);
                (h as f64 / u64::MAX as f64) as f32 * 2.0 - 1.0
            })
            .collect()
    }

    fn random_store(n: usize, dim: usize) -> RecordStore {
        let mut store = RecordStore::new(dim);
        for i in 0..n {
            let id = store.allocate_id();
            store
                .put(id, format!("d/{}", i), pseudo_vector(i as u64, dim), Metadata::new())
                .unwrap();
        }
        store
    }

    fn small_params() -> HnswParams {
        HnswParams {
            m: 8,
            ef_construction: 100,
            ef_search: 50,
        }
    }

    #[test]
    fn test_basic_insert_search() {
        let store = random_store(50, 8);
        let mut index = HnswIndex::new(DistanceMetric::Cosine, small_params());
        for id in store.list() {
            index.insert(id, &store).unwrap();
        }
        assert_eq!(index.len(), 50);

        let target = store.list()[17];
        let query = store.vector(target).unwrap().to_vec();
        let results = index.search(&query, 5, None, &store).unwrap();
        assert_eq!(results[0].0, target);
        assert!((results[0].1 - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_lazy_delete_excludes_and_counts_tombstones() {
        let mut store = random_store(30, 4);
        let mut index = HnswIndex::new(DistanceMetric::Euclidean, small_params());
        index.build(&store);

        let victim = store.list()[3];
        let query = store.vector(victim).unwrap().to_vec();
        assert!(index.delete(victim, DeleteMode::Strict).unwrap());
        store.delete(victim);

        assert_eq!(index.len(), 29);
        assert_eq!(index.stats().tombstones, 1);
        assert!(!index.contains(victim));

        let results = index.search(&query, 29, None, &store).unwrap();
        assert_eq!(results.len(), 29);
        assert!(results.iter().all(|(id, _)| *id != victim));

        assert!(!index.delete(victim, DeleteMode::IgnoreMissing).unwrap());
        assert!(index.delete(victim, DeleteMode::Strict).is_err());
    }

    #[test]
    fn test_build_reclaims_tombstones() {
        let mut store = random_store(20, 4);
        let mut index = HnswIndex::new(DistanceMetric::Cosine, small_params());
        index.build(&store);
        for id in store.list().into_iter().take(5) {
            index.delete(id, DeleteMode::IgnoreMissing).unwrap();
            store.delete(id);
        }
        assert_eq!(index.tombstones(), 5);

        index.build(&store);
        assert_eq!(index.tombstones(), 0);
        assert_eq!(index.len(), 15);
    }

    #[test]
    fn test_determinism() {
        let store = random_store(60, 6);
        let mut a = HnswIndex::new(DistanceMetric::Cosine, small_params());
        let mut b = HnswIndex::new(DistanceMetric::Cosine, small_params());
        a.build(&store);
        b.build(&store);
        let q = pseudo_vector(999, 6);
        assert_eq!(
            a.search(&q, 10, None, &store).unwrap(),
            b.search(&q, 10, None, &store).unwrap()
        );
    }

    #[test]
    fn test_recall_against_flat() {
        let store = random_store(300, 16);
        let mut graph = HnswIndex::new(DistanceMetric::Cosine, HnswParams::default());
        let mut flat = FlatIndex::new(DistanceMetric::Cosine);
        graph.build(&store);
        flat.build(&store);

        let mut hits = 0;
        let mut total = 0;
        for q in 0..20 {
            let query = pseudo_vector(10_000 + q, 16);
            let truth: BTreeSet<VectorId> = flat
                .search(&query, 10, None, &store)
                .unwrap()
                .into_iter()
                .map(|r| r.0)
                .collect();
            let found = graph.search(&query, 10, None, &store).unwrap();
            total += truth.len();
            hits += found.iter().filter(|(id, _)| truth.contains(id)).count();
        }
        let recall = hits as f64 / total as f64;
        assert!(recall >= 0.9, "recall {} below 0.9", recall);
    }

    #[test]
    fn test_empty_and_k_zero() {
        let store = random_store(5, 3);
        let index = HnswIndex::new(DistanceMetric::Cosine, small_params());
        assert!(index.search(&[1.0, 0.0, 0.0], 3, None, &store).unwrap().is_empty());

        let mut index = index;
        index.build(&store);
        assert!(index.search(&[1.0, 0.0, 0.0], 0, None, &store).unwrap().is_empty());
        assert_eq!(index.search(&[1.0, 0.0, 0.0], 50, None, &store).unwrap().len(), 5);
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let store = random_store(3, 3);
        let mut index = HnswIndex::new(DistanceMetric::Cosine, small_params());
        index.build(&store);
        let id = store.list()[0];
        assert_eq!(
            index.insert(id, &store),
            Err(VectorError::DuplicateId { id })
        );
    }
}
