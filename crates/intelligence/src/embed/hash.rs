//! Deterministic feature-hashing embedder
//!
//! Each lowercased UAX#29 word, plus each adjacent word pair, is hashed
//! (FNV-1a) into a signed bucket. The bucket counts are L2-normalised, so
//! texts sharing vocabulary get high cosine similarity. No model, no
//! network, identical output across runs and platforms.

use unicode_segmentation::UnicodeSegmentation;

use super::{EmbedError, Embedder};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Bigram features count half as much as single words.
const BIGRAM_WEIGHT: f32 = 0.5;

fn fnv1a(bytes: &[u8], seed: u64) -> u64 {
    let mut hash = FNV_OFFSET ^ seed;
    for b in bytes {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Offline embedder based on feature hashing.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// Create an embedder producing vectors of `dimension` entries.
    ///
    /// A zero dimension is bumped to 1.
    pub fn new(dimension: usize) -> Self {
        HashEmbedder {
            dimension: dimension.max(1),
        }
    }

    fn add_feature(&self, out: &mut [f32], feature: &str, weight: f32) {
        let h = fnv1a(feature.as_bytes(), 0);
        let bucket = (h % self.dimension as u64) as usize;
        // Sign from an independent bit keeps collisions from only adding up
        let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
        out[bucket] += sign * weight;
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(EmbedError::EmptyInput);
        }

        let words: Vec<String> = trimmed.unicode_words().map(|w| w.to_lowercase()).collect();
        let mut out = vec![0.0f32; self.dimension];
        if words.is_empty() {
            // Punctuation-only input still gets a stable, non-zero vector
            self.add_feature(&mut out, trimmed, 1.0);
        } else {
            for w in &words {
                self.add_feature(&mut out, w, 1.0);
            }
            for pair in words.windows(2) {
                self.add_feature(&mut out, &format!("{} {}", pair[0], pair[1]), BIGRAM_WEIGHT);
            }
        }

        let norm = out.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut out {
                *x /= norm;
            }
        } else {
            // Every feature cancelled out; fall back to a unit basis vector
            let bucket = (fnv1a(trimmed.as_bytes(), 1) % self.dimension as u64) as usize;
            out[bucket] = 1.0;
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hash"
    }
}
