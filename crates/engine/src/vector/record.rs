//! VectorRecord Store - per-library record storage
//!
//! The store is the single source of truth for a library's vectors. Index
//! backends only ever read from it; the store never triggers an index rebuild.
//!
//! # Invariants
//!
//! - VectorIds are allocated monotonically and NEVER reused
//! - Iteration follows VectorId order, which is insertion order
//! - Every stored vector has exactly `dimension` components
//! - chunk id <-> VectorId mapping is one-to-one

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use ragsearch_core::{Metadata, VectorId};

use crate::vector::error::{VectorError, VectorResult};

/// A stored vector with its chunk id and metadata snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    /// Chunk this vector embeds
    pub chunk_id: String,
    /// Embedding (immutable once stored)
    pub vector: Arc<[f32]>,
    /// Document metadata overlaid with chunk metadata
    pub metadata: Metadata,
}

/// Per-library record store
#[derive(Debug, Clone)]
pub struct RecordStore {
    dimension: usize,
    /// BTreeMap for deterministic iteration order
    records: BTreeMap<VectorId, VectorRecord>,
    chunk_index: HashMap<String, VectorId>,
    /// Next VectorId to allocate (never decremented)
    next_id: u64,
}

impl RecordStore {
    /// Create an empty store for vectors of `dimension` components
    ///
    /// next_id starts at 1 so ids are positive integers.
    pub fn new(dimension: usize) -> Self {
        RecordStore {
            dimension,
            records: BTreeMap::new(),
            chunk_index: HashMap::new(),
            next_id: 1,
        }
    }

    /// Get the dimension of vectors in this store
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Allocate a fresh VectorId
    pub fn allocate_id(&mut self) -> VectorId {
        let id = VectorId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Check a vector against the store dimension
    pub fn check_dimension(&self, vector: &[f32]) -> VectorResult<()> {
        if vector.len() != self.dimension {
            return Err(VectorError::DimensionMismatch {
                expected: self.dimension,
                got: vector.len(),
            });
        }
        Ok(())
    }

    /// Insert or overwrite the record for `id`
    ///
    /// Fails with `DimensionMismatch` before touching any state.
    /// Advances the id allocator past `id` so externally chosen ids are
    /// never handed out again.
    pub fn put(
        &mut self,
        id: VectorId,
        chunk_id: impl Into<String>,
        vector: impl Into<Arc<[f32]>>,
        metadata: Metadata,
    ) -> VectorResult<()> {
        let vector = vector.into();
        self.check_dimension(&vector)?;

        let chunk_id = chunk_id.into();
        if let Some(previous) = self.records.get(&id) {
            if previous.chunk_id != chunk_id {
                self.chunk_index.remove(&previous.chunk_id);
            }
        }
        if let Some(other) = self.chunk_index.insert(chunk_id.clone(), id) {
            if other != id {
                self.records.remove(&other);
            }
        }
        self.records.insert(
            id,
            VectorRecord {
                chunk_id,
                vector,
                metadata,
            },
        );

        if id.as_u64() >= self.next_id {
            self.next_id = id.as_u64() + 1;
        }
        Ok(())
    }

    /// Get a record by id
    pub fn get(&self, id: VectorId) -> Option<&VectorRecord> {
        self.records.get(&id)
    }

    /// Get a vector by id
    pub fn vector(&self, id: VectorId) -> Option<&Arc<[f32]>> {
        self.records.get(&id).map(|r| &r.vector)
    }

    /// Remove a record, returning true if it existed
    pub fn delete(&mut self, id: VectorId) -> bool {
        match self.records.remove(&id) {
            Some(record) => {
                self.chunk_index.remove(&record.chunk_id);
                true
            }
            None => false,
        }
    }

    /// Check if a record exists
    pub fn contains(&self, id: VectorId) -> bool {
        self.records.contains_key(&id)
    }

    /// Look up the VectorId assigned to a chunk
    pub fn id_for_chunk(&self, chunk_id: &str) -> Option<VectorId> {
        self.chunk_index.get(chunk_id).copied()
    }

    /// Iterate records in VectorId (insertion) order
    pub fn iter(&self) -> impl Iterator<Item = (VectorId, &VectorRecord)> {
        self.records.iter().map(|(id, r)| (*id, r))
    }

    /// All VectorIds in ascending order
    pub fn list(&self) -> Vec<VectorId> {
        self.records.keys().copied().collect()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Approximate heap usage in bytes
    pub fn memory_usage(&self) -> usize {
        let per_vector = self.dimension * std::mem::size_of::<f32>();
        self.records
            .values()
            .map(|r| {
                per_vector
                    + r.chunk_id.len() * 2
                    + std::mem::size_of::<VectorRecord>()
                    + std::mem::size_of::<VectorId>() * 2
            })
            .sum()
    }
}
