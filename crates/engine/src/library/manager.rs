//! Index Manager - one library's records, index and documents
//!
//! All state sits behind a single `RwLock`. Mutations (chunk and document
//! writes, rebuild) take the write lock; searches and reads take the read
//! lock, so a reader observes either the pre- or post-mutation state.
//!
//! Document writes are all-or-nothing: if any chunk fails to insert, the
//! chunks already inserted for that call are removed before the lock is
//! released.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use ragsearch_core::{
    now_micros, DistanceMetric, IndexKind, LibraryConfig, Limits, Metadata, MetadataFilter,
    VectorId,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::library::document::{chunk_id, merge_metadata, Chunk, Document, NewChunk};
use crate::library::validation::{validate_document_id, validate_metadata};
use crate::vector::{
    DeleteMode, IndexBackend, IndexStats, RecordStore, VectorError, VectorIndexBackend,
    VectorResult,
};

/// Search hit enriched with chunk data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// Chunk id
    pub chunk_id: String,
    /// Owning document
    pub document_id: String,
    /// Similarity (cosine, dot product) or distance (euclidean)
    pub score: f32,
    /// Chunk text
    pub text: String,
    /// Document metadata overlaid with chunk metadata
    pub metadata: Metadata,
}

/// Library description and counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryInfo {
    /// Library id
    pub id: String,
    /// Immutable configuration
    pub config: LibraryConfig,
    /// Free-form description
    pub description: Option<String>,
    /// Creation time (microseconds since epoch)
    pub created_at: u64,
    /// Number of documents
    pub documents: usize,
    /// Number of chunks
    pub chunks: usize,
}

/// Library statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryStats {
    /// Library id
    pub library_id: String,
    /// Vector dimension
    pub dimension: usize,
    /// Distance metric
    pub metric: DistanceMetric,
    /// Index kind
    pub index_kind: IndexKind,
    /// Number of documents
    pub documents: usize,
    /// Number of stored records
    pub records: usize,
    /// Approximate record store size in bytes
    pub memory_bytes: usize,
    /// Index statistics
    pub index: IndexStats,
}

/// A chunk removed from the library, kept for restoration
struct RemovedChunk {
    chunk: Chunk,
    vector: Arc<[f32]>,
    metadata: Metadata,
}

struct LibraryState {
    store: RecordStore,
    index: IndexBackend,
    documents: BTreeMap<String, Document>,
    chunks: HashMap<String, Chunk>,
}

impl LibraryState {
    /// Store and index one chunk
    fn insert_chunk(
        &mut self,
        chunk: Chunk,
        vector: Arc<[f32]>,
        metadata: Metadata,
    ) -> VectorResult<VectorId> {
        self.store.check_dimension(&vector)?;
        if self.chunks.contains_key(&chunk.id) {
            return Err(VectorError::ChunkAlreadyExists { id: chunk.id });
        }

        let id = self.store.allocate_id();
        self.store.put(id, chunk.id.clone(), vector, metadata)?;
        if let Err(e) = self.index.insert(id, &self.store) {
            self.store.delete(id);
            return Err(e);
        }
        self.chunks.insert(chunk.id.clone(), chunk);
        Ok(id)
    }

    /// Unindex and drop one chunk
    fn remove_chunk(&mut self, chunk_id: &str) -> VectorResult<Option<RemovedChunk>> {
        let Some(chunk) = self.chunks.remove(chunk_id) else {
            return Ok(None);
        };
        let Some(id) = self.store.id_for_chunk(chunk_id) else {
            return Err(VectorError::ChunkNotFound {
                id: chunk_id.to_string(),
            });
        };
        self.index.delete(id, DeleteMode::IgnoreMissing)?;
        let removed = self.store.get(id).map(|r| RemovedChunk {
            chunk,
            vector: Arc::clone(&r.vector),
            metadata: r.metadata.clone(),
        });
        self.store.delete(id);
        Ok(removed)
    }

    /// Insert a document's chunks starting at `first_index`
    ///
    /// On failure every chunk inserted by this call is removed again.
    fn insert_document_chunks(
        &mut self,
        document_id: &str,
        document_metadata: &Metadata,
        first_index: usize,
        chunks: Vec<NewChunk>,
    ) -> VectorResult<Vec<String>> {
        let mut inserted: Vec<String> = Vec::with_capacity(chunks.len());
        for (offset, new) in chunks.into_iter().enumerate() {
            let index = first_index + offset;
            let chunk = Chunk {
                id: chunk_id(document_id, index),
                document_id: document_id.to_string(),
                index,
                text: new.text,
                start: new.start,
                end: new.end,
                metadata: new.metadata,
            };
            let merged = merge_metadata(document_metadata, &chunk.metadata);
            let new_id = chunk.id.clone();

            if let Err(e) = self.insert_chunk(chunk, new.vector.into(), merged) {
                for done in inserted.iter().rev() {
                    self.remove_chunk(done)?;
                }
                warn!(
                    target: "ragsearch::library",
                    document_id,
                    rolled_back = inserted.len(),
                    error = %e,
                    "Chunk insert failed, document rolled back"
                );
                return Err(e);
            }
            inserted.push(new_id);
        }
        Ok(inserted)
    }
}

/// Check document metadata and every chunk's metadata
fn validate_new_metadata(metadata: &Metadata, chunks: &[NewChunk]) -> VectorResult<()> {
    validate_metadata(metadata)?;
    chunks.iter().try_for_each(|c| validate_metadata(&c.metadata))
}

/// Owns one library's record store, index and document table
pub struct IndexManager {
    id: String,
    config: LibraryConfig,
    description: Option<String>,
    created_at: u64,
    limits: Limits,
    state: RwLock<LibraryState>,
}

impl IndexManager {
    /// Create an empty library
    ///
    /// The config is assumed validated by the registry.
    pub fn new(
        id: impl Into<String>,
        config: LibraryConfig,
        description: Option<String>,
        limits: Limits,
    ) -> Self {
        let state = LibraryState {
            store: RecordStore::new(config.dimension),
            index: IndexBackend::for_config(&config),
            documents: BTreeMap::new(),
            chunks: HashMap::new(),
        };
        IndexManager {
            id: id.into(),
            config,
            description,
            created_at: now_micros(),
            limits,
            state: RwLock::new(state),
        }
    }

    /// Library id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Library configuration
    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Creation time (microseconds since epoch)
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Description and counts
    pub fn info(&self) -> LibraryInfo {
        let state = self.state.read();
        LibraryInfo {
            id: self.id.clone(),
            config: self.config.clone(),
            description: self.description.clone(),
            created_at: self.created_at,
            documents: state.documents.len(),
            chunks: state.chunks.len(),
        }
    }

    // ========================================================================
    // Chunks
    // ========================================================================

    /// Append one chunk to an existing document
    pub fn insert_chunk(&self, document_id: &str, new: NewChunk) -> VectorResult<Chunk> {
        validate_metadata(&new.metadata)?;
        let mut guard = self.state.write();
        let state = &mut *guard;

        let (document_metadata, index) = match state.documents.get(document_id) {
            Some(doc) => (doc.metadata.clone(), doc.next_chunk),
            None => {
                return Err(VectorError::DocumentNotFound {
                    id: document_id.to_string(),
                })
            }
        };

        let chunk = Chunk {
            id: chunk_id(document_id, index),
            document_id: document_id.to_string(),
            index,
            text: new.text,
            start: new.start,
            end: new.end,
            metadata: new.metadata,
        };
        let merged = merge_metadata(&document_metadata, &chunk.metadata);
        state.insert_chunk(chunk.clone(), new.vector.into(), merged)?;

        if let Some(doc) = state.documents.get_mut(document_id) {
            doc.chunk_ids.push(chunk.id.clone());
            doc.next_chunk += 1;
            doc.updated_at = now_micros();
        }
        debug!(target: "ragsearch::library", library = %self.id, chunk_id = %chunk.id, "Chunk inserted");
        Ok(chunk)
    }

    /// Remove one chunk from the index, the store and its document
    pub fn delete_chunk(&self, chunk_id: &str) -> VectorResult<()> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let removed = state
            .remove_chunk(chunk_id)?
            .ok_or_else(|| VectorError::ChunkNotFound {
                id: chunk_id.to_string(),
            })?;
        if let Some(doc) = state.documents.get_mut(&removed.chunk.document_id) {
            doc.chunk_ids.retain(|c| c != chunk_id);
            doc.updated_at = now_micros();
        }
        debug!(target: "ragsearch::library", library = %self.id, chunk_id, "Chunk deleted");
        Ok(())
    }

    /// Get a chunk by id
    pub fn get_chunk(&self, chunk_id: &str) -> VectorResult<Chunk> {
        self.state
            .read()
            .chunks
            .get(chunk_id)
            .cloned()
            .ok_or_else(|| VectorError::ChunkNotFound {
                id: chunk_id.to_string(),
            })
    }

    // ========================================================================
    // Documents
    // ========================================================================

    /// Insert a document and all its chunks atomically
    ///
    /// Fails with `DocumentAlreadyExists` if the id is taken. If any chunk
    /// fails (e.g. `DimensionMismatch`) nothing from this call remains.
    pub fn insert_document(
        &self,
        document_id: &str,
        metadata: Metadata,
        chunks: Vec<NewChunk>,
    ) -> VectorResult<Document> {
        validate_document_id(document_id, &self.limits)?;
        validate_new_metadata(&metadata, &chunks)?;

        let mut guard = self.state.write();
        let state = &mut *guard;
        if state.documents.contains_key(document_id) {
            return Err(VectorError::DocumentAlreadyExists {
                id: document_id.to_string(),
            });
        }

        let count = chunks.len();
        let chunk_ids = state.insert_document_chunks(document_id, &metadata, 0, chunks)?;
        let now = now_micros();
        let document = Document {
            id: document_id.to_string(),
            metadata,
            chunk_ids,
            created_at: now,
            updated_at: now,
            next_chunk: count,
        };
        state
            .documents
            .insert(document_id.to_string(), document.clone());

        debug!(target: "ragsearch::library", library = %self.id, document_id, chunks = count, "Document inserted");
        Ok(document)
    }

    /// Replace a document's metadata and chunks atomically
    ///
    /// New chunks continue the document's numbering, so no chunk id is ever
    /// reused. If inserting the new chunks fails, the previous chunks are
    /// restored.
    pub fn replace_document(
        &self,
        document_id: &str,
        metadata: Metadata,
        chunks: Vec<NewChunk>,
    ) -> VectorResult<Document> {
        validate_new_metadata(&metadata, &chunks)?;
        let mut guard = self.state.write();
        let state = &mut *guard;

        let (old_chunk_ids, first_index) = match state.documents.get(document_id) {
            Some(doc) => (doc.chunk_ids.clone(), doc.next_chunk),
            None => {
                return Err(VectorError::DocumentNotFound {
                    id: document_id.to_string(),
                })
            }
        };

        let mut removed = Vec::with_capacity(old_chunk_ids.len());
        for cid in &old_chunk_ids {
            if let Some(r) = state.remove_chunk(cid)? {
                removed.push(r);
            }
        }

        let count = chunks.len();
        let inserted = state.insert_document_chunks(document_id, &metadata, first_index, chunks);
        let chunk_ids = match inserted {
            Ok(ids) => ids,
            Err(e) => {
                for r in removed {
                    state.insert_chunk(r.chunk, r.vector, r.metadata)?;
                }
                return Err(e);
            }
        };

        let now = now_micros();
        let document = match state.documents.get_mut(document_id) {
            Some(doc) => {
                doc.metadata = metadata;
                doc.chunk_ids = chunk_ids;
                doc.next_chunk = first_index + count;
                doc.updated_at = now;
                doc.clone()
            }
            None => {
                return Err(VectorError::DocumentNotFound {
                    id: document_id.to_string(),
                })
            }
        };

        debug!(target: "ragsearch::library", library = %self.id, document_id, chunks = count, "Document replaced");
        Ok(document)
    }

    /// Delete a document and all its chunks
    ///
    /// Returns the number of chunks removed.
    pub fn delete_document(&self, document_id: &str) -> VectorResult<usize> {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let document =
            state
                .documents
                .remove(document_id)
                .ok_or_else(|| VectorError::DocumentNotFound {
                    id: document_id.to_string(),
                })?;
        let mut removed = 0;
        for cid in &document.chunk_ids {
            if state.remove_chunk(cid)?.is_some() {
                removed += 1;
            }
        }

        debug!(target: "ragsearch::library", library = %self.id, document_id, chunks = removed, "Document deleted");
        Ok(removed)
    }

    /// Get a document by id
    pub fn get_document(&self, document_id: &str) -> VectorResult<Document> {
        self.state
            .read()
            .documents
            .get(document_id)
            .cloned()
            .ok_or_else(|| VectorError::DocumentNotFound {
                id: document_id.to_string(),
            })
    }

    /// Chunks of a document in document order
    pub fn document_chunks(&self, document_id: &str) -> VectorResult<Vec<Chunk>> {
        let state = self.state.read();
        let doc = state
            .documents
            .get(document_id)
            .ok_or_else(|| VectorError::DocumentNotFound {
                id: document_id.to_string(),
            })?;
        Ok(doc
            .chunk_ids
            .iter()
            .filter_map(|cid| state.chunks.get(cid).cloned())
            .collect())
    }

    /// All documents sorted by id
    pub fn list_documents(&self) -> Vec<Document> {
        self.state.read().documents.values().cloned().collect()
    }

    // ========================================================================
    // Search and maintenance
    // ========================================================================

    /// Search for the k best chunks matching `filter`
    ///
    /// Any `k` is accepted; at most `min(k, matching)` hits come back. A
    /// ranked id with no stored record is reported as `VectorNotFound`.
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> VectorResult<Vec<ScoredChunk>> {
        let start = Instant::now();

        let state = self.state.read();
        // No k can yield more than every record
        let k = k.min(state.store.len());
        let filter = filter.filter(|f| !f.is_empty());
        let ranked = state.index.search(query, k, filter, &state.store)?;

        let mut hits = Vec::with_capacity(ranked.len());
        for (id, score) in ranked {
            let Some((record, chunk)) = state
                .store
                .get(id)
                .and_then(|r| state.chunks.get(&r.chunk_id).map(|c| (r, c)))
            else {
                warn!(
                    target: "ragsearch::vector",
                    library = %self.id,
                    vector_id = %id,
                    "Index returned a record missing from the store"
                );
                return Err(VectorError::VectorNotFound { id });
            };
            hits.push(ScoredChunk {
                chunk_id: record.chunk_id.clone(),
                document_id: chunk.document_id.clone(),
                score,
                text: chunk.text.clone(),
                metadata: record.metadata.clone(),
            });
        }

        debug!(
            target: "ragsearch::vector",
            library = %self.id,
            k,
            results = hits.len(),
            duration_us = start.elapsed().as_micros() as u64,
            "Vector search completed"
        );
        Ok(hits)
    }

    /// Rebuild the index from the record store
    ///
    /// Reclaims graph tombstones and retrains inverted-file centroids.
    pub fn rebuild(&self) {
        let start = Instant::now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        state.index.build(&state.store);
        info!(
            target: "ragsearch::vector",
            library = %self.id,
            index = state.index.index_type_name(),
            records = state.store.len(),
            duration_us = start.elapsed().as_micros() as u64,
            "Index rebuilt"
        );
    }

    /// Current statistics
    pub fn stats(&self) -> LibraryStats {
        let state = self.state.read();
        LibraryStats {
            library_id: self.id.clone(),
            dimension: self.config.dimension,
            metric: self.config.metric,
            index_kind: self.config.index_kind,
            documents: state.documents.len(),
            records: state.store.len(),
            memory_bytes: state.store.memory_usage(),
            index: state.index.stats(),
        }
    }
}
