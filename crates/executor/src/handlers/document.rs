//! Document command handlers.
//!
//! Text ingestion goes through the pipeline; reads and deletes go straight
//! to the library's Index Manager.

use ragsearch_core::Metadata;

use crate::types::{ChunkInput, DocumentInfo};
use crate::{Executor, Output, Result};

/// Use the given id or generate one.
fn resolve_document_id(document_id: Option<String>) -> String {
    document_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Handle IngestDocument command.
pub fn ingest_document(
    ex: &Executor,
    library: String,
    document_id: Option<String>,
    text: String,
    metadata: Option<Metadata>,
) -> Result<Output> {
    let manager = ex.registry().get(&library)?;
    let document_id = resolve_document_id(document_id);
    let doc = ex.pipeline().ingest_document(
        &manager,
        &document_id,
        &text,
        metadata.unwrap_or_default(),
    )?;
    Ok(Output::Document(DocumentInfo::from_document(&library, doc)))
}

/// Handle IngestChunks command.
pub fn ingest_chunks(
    ex: &Executor,
    library: String,
    document_id: Option<String>,
    chunks: Vec<ChunkInput>,
    metadata: Option<Metadata>,
) -> Result<Output> {
    let manager = ex.registry().get(&library)?;
    let document_id = resolve_document_id(document_id);
    let doc = ex.pipeline().ingest_chunks(
        &manager,
        &document_id,
        chunks,
        metadata.unwrap_or_default(),
    )?;
    Ok(Output::Document(DocumentInfo::from_document(&library, doc)))
}

/// Handle ReplaceDocument command.
pub fn replace_document(
    ex: &Executor,
    library: String,
    document_id: String,
    text: String,
    metadata: Option<Metadata>,
) -> Result<Output> {
    let manager = ex.registry().get(&library)?;
    let doc = ex.pipeline().replace_document(
        &manager,
        &document_id,
        &text,
        metadata.unwrap_or_default(),
    )?;
    Ok(Output::Document(DocumentInfo::from_document(&library, doc)))
}

/// Handle DeleteDocument command.
pub fn delete_document(ex: &Executor, library: String, document_id: String) -> Result<Output> {
    let manager = ex.registry().get(&library)?;
    let removed = manager.delete_document(&document_id)?;
    Ok(Output::Uint(removed as u64))
}

/// Handle GetDocument command.
pub fn get_document(ex: &Executor, library: String, document_id: String) -> Result<Output> {
    let manager = ex.registry().get(&library)?;
    let doc = manager.get_document(&document_id)?;
    let chunks = manager.document_chunks(&document_id)?;
    Ok(Output::Document(
        DocumentInfo::from_document(&library, doc).with_chunks(chunks),
    ))
}

/// Handle ListDocuments command.
pub fn list_documents(ex: &Executor, library: String) -> Result<Output> {
    let manager = ex.registry().get(&library)?;
    let docs = manager
        .list_documents()
        .into_iter()
        .map(|d| DocumentInfo::from_document(&library, d))
        .collect();
    Ok(Output::Documents(docs))
}
