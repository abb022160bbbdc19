//! Documents and chunks
//!
//! A document is an ordered list of chunks. Each chunk carries a text span,
//! its own metadata and one embedding. Chunk ids are `{document_id}/{index}`
//! where `index` never repeats within a document.

use ragsearch_core::Metadata;
use serde::{Deserialize, Serialize};

/// Chunk submitted for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewChunk {
    /// Source text
    pub text: String,
    /// Byte offset of the span start in the document text
    pub start: usize,
    /// Byte offset one past the span end
    pub end: usize,
    /// Embedding
    pub vector: Vec<f32>,
    /// Chunk-level metadata (overlays the document metadata)
    pub metadata: Metadata,
}

impl NewChunk {
    /// Chunk whose span covers all of `text`
    pub fn new(text: impl Into<String>, vector: Vec<f32>) -> Self {
        let text = text.into();
        NewChunk {
            start: 0,
            end: text.len(),
            text,
            vector,
            metadata: Metadata::new(),
        }
    }

    /// Set the byte span
    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Set chunk-level metadata
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Stored chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// `{document_id}/{index}`
    pub id: String,
    /// Owning document
    pub document_id: String,
    /// Position within the document
    pub index: usize,
    /// Source text
    pub text: String,
    /// Byte offset of the span start
    pub start: usize,
    /// Byte offset one past the span end
    pub end: usize,
    /// Chunk-level metadata
    pub metadata: Metadata,
}

/// Stored document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier unique within the library
    pub id: String,
    /// Document metadata
    pub metadata: Metadata,
    /// Chunk ids in document order
    pub chunk_ids: Vec<String>,
    /// Creation time (microseconds since epoch)
    pub created_at: u64,
    /// Last replace or chunk change (microseconds since epoch)
    pub updated_at: u64,
    #[serde(skip)]
    pub(crate) next_chunk: usize,
}

/// Build the chunk id for a document position
pub fn chunk_id(document_id: &str, index: usize) -> String {
    format!("{}/{}", document_id, index)
}

/// Document metadata overlaid with chunk metadata
pub fn merge_metadata(document: &Metadata, chunk: &Metadata) -> Metadata {
    let mut merged = document.clone();
    for (k, v) in chunk {
        merged.insert(k.clone(), v.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chunk_id_format() {
        assert_eq!(chunk_id("doc", 0), "doc/0");
        assert_eq!(chunk_id("report.pdf", 12), "report.pdf/12");
    }

    #[test]
    fn test_chunk_metadata_overlays_document() {
        let doc = json!({"lang": "en", "source": "web"})
            .as_object()
            .cloned()
            .unwrap();
        let chunk = json!({"source": "pdf", "page": 2})
            .as_object()
            .cloned()
            .unwrap();
        let merged = merge_metadata(&doc, &chunk);
        assert_eq!(merged["lang"], json!("en"));
        assert_eq!(merged["source"], json!("pdf"));
        assert_eq!(merged["page"], json!(2));
    }

    #[test]
    fn test_new_chunk_span_defaults_to_text() {
        let c = NewChunk::new("hello", vec![1.0]);
        assert_eq!((c.start, c.end), (0, 5));
        let c = c.with_span(10, 15);
        assert_eq!((c.start, c.end), (10, 15));
    }
}
