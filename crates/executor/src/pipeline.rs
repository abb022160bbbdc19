//! Document/chunk ingestion pipeline
//!
//! Split text, embed every chunk, then hand the whole batch to the Index
//! Manager in one call. Embedding happens before any index lock is taken;
//! if any embedding fails nothing is indexed. The manager's document insert
//! is itself all-or-nothing, so a retry after any failure starts clean.

use std::sync::Arc;
use std::time::Instant;

use ragsearch_core::{Limits, Metadata};
use ragsearch_engine::{Document, EmbeddingSection, IndexManager, NewChunk};
use ragsearch_intelligence::{CohereEmbedder, Embedder, HashEmbedder, TextChunk, TextSplitter};
use tracing::{debug, warn};

use crate::types::ChunkInput;
use crate::{Error, Result};

/// Build the embedder described by the `[embedding]` config section.
///
/// A `cohere` provider without an API key is still built; every embed call
/// will fail with `EmbeddingFailed` until a key is supplied.
pub fn build_embedder(section: &EmbeddingSection) -> Result<Arc<dyn Embedder>> {
    match section.provider.as_str() {
        "hash" => Ok(Arc::new(HashEmbedder::new(section.dimension))),
        "cohere" => {
            let embedder = CohereEmbedder::new(
                section.model.as_deref(),
                section.api_key.as_deref(),
                Some(section.dimension),
                section.timeout_ms,
            );
            if !embedder.has_api_key() {
                warn!(
                    target: "ragsearch::embed",
                    "COHERE_API_KEY not found in config or environment. \
                     Embedding operations will fail at runtime."
                );
            }
            Ok(Arc::new(embedder))
        }
        other => Err(Error::InvalidInput {
            reason: format!(
                "unknown embedding provider '{}': expected \"hash\" or \"cohere\"",
                other
            ),
        }),
    }
}

/// Splits, embeds and indexes documents.
pub struct IngestPipeline {
    embedder: Arc<dyn Embedder>,
    splitter: TextSplitter,
    limits: Limits,
}

impl IngestPipeline {
    /// Create a pipeline
    pub fn new(embedder: Arc<dyn Embedder>, splitter: TextSplitter, limits: Limits) -> Self {
        IngestPipeline {
            embedder,
            splitter,
            limits,
        }
    }

    /// The embedder used for chunks and text queries
    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// The text splitter
    pub fn splitter(&self) -> &TextSplitter {
        &self.splitter
    }

    /// Embed a query string for a library of `dimension`.
    ///
    /// Fails with `DimensionMismatch` before calling the embedder when its
    /// output cannot fit the library.
    pub fn embed_query(&self, text: &str, dimension: usize) -> Result<Vec<f32>> {
        if self.embedder.dimension() != dimension {
            return Err(Error::DimensionMismatch {
                expected: dimension,
                actual: self.embedder.dimension(),
            });
        }
        let vector = self.embedder.embed(text)?;
        check_dimension(dimension, &vector)?;
        Ok(vector)
    }

    /// Split, embed and insert a new document.
    ///
    /// Blank text yields a document with zero chunks.
    pub fn ingest_document(
        &self,
        manager: &IndexManager,
        document_id: &str,
        text: &str,
        metadata: Metadata,
    ) -> Result<Document> {
        self.limits.validate_text(text)?;
        ensure_absent(manager, document_id)?;

        let start = Instant::now();
        let chunks = self.embed_split(manager, document_id, text)?;
        let count = chunks.len();
        let document = manager.insert_document(document_id, metadata, chunks)?;

        debug!(
            target: "ragsearch::pipeline",
            library = manager.id(),
            document_id,
            chunks = count,
            duration_us = start.elapsed().as_micros() as u64,
            "Document ingested"
        );
        Ok(document)
    }

    /// Insert caller-supplied chunks, embedding those without a vector.
    pub fn ingest_chunks(
        &self,
        manager: &IndexManager,
        document_id: &str,
        chunks: Vec<ChunkInput>,
        metadata: Metadata,
    ) -> Result<Document> {
        for chunk in &chunks {
            self.limits.validate_text(&chunk.text)?;
        }
        ensure_absent(manager, document_id)?;

        let start = Instant::now();
        let dimension = manager.config().dimension;

        let missing: Vec<&str> = chunks
            .iter()
            .filter(|c| c.embedding.is_none())
            .map(|c| c.text.as_str())
            .collect();
        let mut embedded = self
            .embed_all(manager, document_id, &missing)?
            .into_iter();
        let missing_count = missing.len();

        let mut new_chunks = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let vector = match chunk.embedding {
                Some(v) => v,
                None => embedded.next().ok_or_else(|| Error::Internal {
                    reason: "embedder returned fewer vectors than requested".into(),
                })?,
            };
            check_dimension(dimension, &vector)?;
            let mut new = NewChunk::new(chunk.text, vector);
            if let Some(m) = chunk.metadata {
                new = new.with_metadata(m);
            }
            new_chunks.push(new);
        }

        let count = new_chunks.len();
        let document = manager.insert_document(document_id, metadata, new_chunks)?;
        debug!(
            target: "ragsearch::pipeline",
            library = manager.id(),
            document_id,
            chunks = count,
            precomputed = count - missing_count,
            duration_us = start.elapsed().as_micros() as u64,
            "Chunks ingested"
        );
        Ok(document)
    }

    /// Re-split and re-embed an existing document, swapping its chunks
    /// atomically.
    pub fn replace_document(
        &self,
        manager: &IndexManager,
        document_id: &str,
        text: &str,
        metadata: Metadata,
    ) -> Result<Document> {
        self.limits.validate_text(text)?;
        // Fail fast before paying for embeddings
        manager.get_document(document_id)?;

        let start = Instant::now();
        let chunks = self.embed_split(manager, document_id, text)?;
        let count = chunks.len();
        let document = manager.replace_document(document_id, metadata, chunks)?;

        debug!(
            target: "ragsearch::pipeline",
            library = manager.id(),
            document_id,
            chunks = count,
            duration_us = start.elapsed().as_micros() as u64,
            "Document replaced"
        );
        Ok(document)
    }

    fn embed_split(
        &self,
        manager: &IndexManager,
        document_id: &str,
        text: &str,
    ) -> Result<Vec<NewChunk>> {
        let pieces: Vec<TextChunk> = self.splitter.split(text);
        let texts: Vec<&str> = pieces.iter().map(|p| p.text.as_str()).collect();
        let vectors = self.embed_all(manager, document_id, &texts)?;

        let dimension = manager.config().dimension;
        pieces
            .into_iter()
            .zip(vectors)
            .map(|(piece, vector)| {
                check_dimension(dimension, &vector)?;
                Ok(NewChunk::new(piece.text, vector).with_span(piece.start, piece.end))
            })
            .collect()
    }

    fn embed_all(
        &self,
        manager: &IndexManager,
        document_id: &str,
        texts: &[&str],
    ) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let vectors = self.embedder.embed_batch(texts).map_err(|e| {
            warn!(
                target: "ragsearch::pipeline",
                library = manager.id(),
                document_id,
                embedder = self.embedder.name(),
                error = %e,
                "Embedding failed, nothing indexed"
            );
            Error::from(e)
        })?;
        if vectors.len() != texts.len() {
            return Err(Error::EmbeddingFailed {
                reason: format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    vectors.len()
                ),
            });
        }
        Ok(vectors)
    }
}

fn ensure_absent(manager: &IndexManager, document_id: &str) -> Result<()> {
    if manager.get_document(document_id).is_ok() {
        return Err(Error::DocumentExists {
            document: document_id.to_string(),
        });
    }
    Ok(())
}

fn check_dimension(expected: usize, vector: &[f32]) -> Result<()> {
    if vector.len() != expected {
        return Err(Error::DimensionMismatch {
            expected,
            actual: vector.len(),
        });
    }
    Ok(())
}
