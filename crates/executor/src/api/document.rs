//! Document operations.

use ragsearch_core::Metadata;

use super::RagSearch;
use crate::types::*;
use crate::{Command, Error, Output, Result};

impl RagSearch {
    /// Split, embed and index a document. A missing id is generated.
    pub fn ingest(
        &self,
        library: &str,
        document_id: Option<&str>,
        text: &str,
        metadata: Option<Metadata>,
    ) -> Result<DocumentInfo> {
        self.expect_document(
            Command::IngestDocument {
                library: library.to_string(),
                document_id: document_id.map(str::to_string),
                text: text.to_string(),
                metadata,
            },
            "IngestDocument",
        )
    }

    /// Index caller-supplied chunks, embedding those without a vector.
    pub fn ingest_chunks(
        &self,
        library: &str,
        document_id: Option<&str>,
        chunks: Vec<ChunkInput>,
        metadata: Option<Metadata>,
    ) -> Result<DocumentInfo> {
        self.expect_document(
            Command::IngestChunks {
                library: library.to_string(),
                document_id: document_id.map(str::to_string),
                chunks,
                metadata,
            },
            "IngestChunks",
        )
    }

    /// Replace a document's text and metadata.
    pub fn replace_document(
        &self,
        library: &str,
        document_id: &str,
        text: &str,
        metadata: Option<Metadata>,
    ) -> Result<DocumentInfo> {
        self.expect_document(
            Command::ReplaceDocument {
                library: library.to_string(),
                document_id: document_id.to_string(),
                text: text.to_string(),
                metadata,
            },
            "ReplaceDocument",
        )
    }

    /// Delete a document. Returns the number of chunks removed.
    pub fn delete_document(&self, library: &str, document_id: &str) -> Result<u64> {
        match self.executor.execute(Command::DeleteDocument {
            library: library.to_string(),
            document_id: document_id.to_string(),
        })? {
            Output::Uint(n) => Ok(n),
            _ => Err(Error::Internal {
                reason: "Unexpected output for DeleteDocument".into(),
            }),
        }
    }

    /// Get a document with its chunks.
    pub fn get_document(&self, library: &str, document_id: &str) -> Result<DocumentInfo> {
        self.expect_document(
            Command::GetDocument {
                library: library.to_string(),
                document_id: document_id.to_string(),
            },
            "GetDocument",
        )
    }

    /// List a library's documents sorted by id.
    pub fn list_documents(&self, library: &str) -> Result<Vec<DocumentInfo>> {
        match self.executor.execute(Command::ListDocuments {
            library: library.to_string(),
        })? {
            Output::Documents(docs) => Ok(docs),
            _ => Err(Error::Internal {
                reason: "Unexpected output for ListDocuments".into(),
            }),
        }
    }

    fn expect_document(&self, cmd: Command, name: &str) -> Result<DocumentInfo> {
        match self.executor.execute(cmd)? {
            Output::Document(doc) => Ok(doc),
            _ => Err(Error::Internal {
                reason: format!("Unexpected output for {}", name),
            }),
        }
    }
}
