//! Text splitting on word boundaries
//!
//! Text is cut into UAX#29 word-boundary segments, which are packed greedily
//! into chunks of at most `chunk_size` characters. Each chunk after the first
//! starts far enough back to share at most `chunk_overlap` characters with
//! its predecessor. A single segment longer than `chunk_size` becomes a chunk
//! of its own. Chunks are trimmed of surrounding whitespace and carry byte
//! offsets into the source text.

use ragsearch_core::{RagError, RagResult};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// One piece of split text with its byte span in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Chunk text, `source[start..end]`
    pub text: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

/// Word-boundary splitter with overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

struct Segment {
    start: usize,
    end: usize,
    chars: usize,
    blank: bool,
}

impl TextSplitter {
    /// Create a splitter.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `chunk_size` is zero or `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> RagResult<Self> {
        if chunk_size == 0 {
            return Err(RagError::invalid_input("chunk_size must be > 0"));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::invalid_input(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(TextSplitter {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Maximum characters per chunk (unless a single word is longer)
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Maximum characters shared by consecutive chunks
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into chunks. Blank input yields no chunks.
    pub fn split(&self, text: &str) -> Vec<TextChunk> {
        let segments: Vec<Segment> = text
            .split_word_bound_indices()
            .map(|(start, s)| Segment {
                start,
                end: start + s.len(),
                chars: s.chars().count(),
                blank: s.trim().is_empty(),
            })
            .collect();

        let mut chunks = Vec::new();
        let mut first = 0;
        while first < segments.len() {
            // Never open a chunk on whitespace
            while first < segments.len() && segments[first].blank {
                first += 1;
            }
            if first == segments.len() {
                break;
            }

            let mut last = first;
            let mut chars = segments[first].chars;
            while last + 1 < segments.len() && chars + segments[last + 1].chars <= self.chunk_size
            {
                last += 1;
                chars += segments[last].chars;
            }

            let start = segments[first].start;
            let end = segments[last].end;
            let piece = &text[start..end];
            let trimmed_start = start + (piece.len() - piece.trim_start().len());
            let trimmed_end = end - (piece.len() - piece.trim_end().len());
            chunks.push(TextChunk {
                text: text[trimmed_start..trimmed_end].to_string(),
                start: trimmed_start,
                end: trimmed_end,
            });

            if last + 1 >= segments.len() {
                break;
            }

            // Walk back from the end while the tail fits in the overlap
            let mut next = last + 1;
            let mut tail = 0;
            while next - 1 > first && tail + segments[next - 1].chars <= self.chunk_overlap {
                next -= 1;
                tail += segments[next].chars;
            }
            // Skip the overlap when the following segment would not fit after it
            if tail + segments[last + 1].chars > self.chunk_size {
                next = last + 1;
            }
            first = next;
        }
        chunks
    }
}
