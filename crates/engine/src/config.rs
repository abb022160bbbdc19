//! Engine configuration via `ragsearch.toml`
//!
//! A default file can be written on first start; to change settings, edit
//! the file and restart.

use serde::{Deserialize, Serialize};
use std::path::Path;

use ragsearch_core::{HnswParams, IndexKind, IndexParams, IvfParams, RagError, RagResult};

/// Config file name
pub const CONFIG_FILE_NAME: &str = "ragsearch.toml";

/// Defaults for libraries created without explicit index settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSection {
    /// Default index kind
    #[serde(default)]
    pub kind: IndexKind,
    /// Inverted-file cluster count
    #[serde(default = "default_nlist")]
    pub nlist: usize,
    /// Inverted-file buckets probed per query
    #[serde(default = "default_nprobe")]
    pub nprobe: usize,
    /// k-means refinement rounds
    #[serde(default = "default_kmeans_iterations")]
    pub kmeans_iterations: usize,
    /// Graph degree
    #[serde(default = "default_m")]
    pub m: usize,
    /// Graph build beam width
    #[serde(default = "default_ef_construction")]
    pub ef_construction: usize,
    /// Graph search beam width
    #[serde(default = "default_ef_search")]
    pub ef_search: usize,
}

fn default_nlist() -> usize {
    IvfParams::default().nlist
}
fn default_nprobe() -> usize {
    IvfParams::default().nprobe
}
fn default_kmeans_iterations() -> usize {
    IvfParams::default().kmeans_iterations
}
fn default_m() -> usize {
    HnswParams::default().m
}
fn default_ef_construction() -> usize {
    HnswParams::default().ef_construction
}
fn default_ef_search() -> usize {
    HnswParams::default().ef_search
}

impl Default for IndexSection {
    fn default() -> Self {
        IndexSection {
            kind: IndexKind::default(),
            nlist: default_nlist(),
            nprobe: default_nprobe(),
            kmeans_iterations: default_kmeans_iterations(),
            m: default_m(),
            ef_construction: default_ef_construction(),
            ef_search: default_ef_search(),
        }
    }
}

impl IndexSection {
    /// Index parameters described by this section
    pub fn params(&self) -> IndexParams {
        IndexParams {
            ivf: IvfParams {
                nlist: self.nlist,
                nprobe: self.nprobe,
                kmeans_iterations: self.kmeans_iterations,
            },
            hnsw: HnswParams {
                m: self.m,
                ef_construction: self.ef_construction,
                ef_search: self.ef_search,
            },
        }
    }
}

/// Text splitting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkingSection {
    /// Target chunk length in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_chunk_size() -> usize {
    512
}
fn default_chunk_overlap() -> usize {
    64
}

impl Default for ChunkingSection {
    fn default() -> Self {
        ChunkingSection {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

/// Embedding provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingSection {
    /// `"hash"` (deterministic, offline) or `"cohere"`
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Output dimension of the hash provider
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    /// Provider model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// API key (falls back to `COHERE_API_KEY`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_provider() -> String {
    "hash".to_string()
}
fn default_dimension() -> usize {
    384
}
fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for EmbeddingSection {
    fn default() -> Self {
        EmbeddingSection {
            provider: default_provider(),
            dimension: default_dimension(),
            model: None,
            api_key: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Engine configuration loaded from `ragsearch.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Index defaults
    #[serde(default)]
    pub index: IndexSection,
    /// Text splitting
    #[serde(default)]
    pub chunking: ChunkingSection,
    /// Embedding provider
    #[serde(default)]
    pub embedding: EmbeddingSection,
}

impl EngineConfig {
    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a count is zero, `nprobe > nlist`, or
    /// `chunk_overlap >= chunk_size`.
    pub fn validate(&self) -> RagResult<()> {
        self.index.params().validate()?;
        if self.chunking.chunk_size == 0 {
            return Err(RagError::invalid_input("chunk_size must be > 0"));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(RagError::invalid_input(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.embedding.dimension == 0 {
            return Err(RagError::invalid_input("embedding dimension must be > 0"));
        }
        match self.embedding.provider.as_str() {
            "hash" | "cohere" => Ok(()),
            other => Err(RagError::invalid_input(format!(
                "Invalid embedding provider '{}' in ragsearch.toml. Expected \"hash\" or \"cohere\".",
                other
            ))),
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# RAGSearch engine configuration

[index]
# Default index for libraries created without one: "flat", "inverted_file" or "graph"
kind = "flat"
# Inverted file: clusters, buckets probed per query, k-means rounds
nlist = 16
nprobe = 4
kmeans_iterations = 10
# Graph: degree, build beam width, search beam width
m = 16
ef_construction = 200
ef_search = 50

[chunking]
# Characters per chunk and overlap between consecutive chunks
chunk_size = 512
chunk_overlap = 64

[embedding]
# "hash" (deterministic, offline) or "cohere" (requires the cohere feature)
provider = "hash"
dimension = 384
# model = "embed-english-v3.0"
# api_key = "..."          # falls back to COHERE_API_KEY
timeout_ms = 30000
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> RagResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RagError::internal(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: EngineConfig = toml::from_str(&content).map_err(|e| {
            RagError::invalid_input(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> RagResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                RagError::internal(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> RagResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RagError::internal(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            RagError::internal(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_toml_parses_to_default() {
        let parsed: EngineConfig = toml::from_str(EngineConfig::default_toml()).unwrap();
        assert_eq!(parsed, EngineConfig::default());
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn partial_file_uses_defaults() {
        let config: EngineConfig = toml::from_str("[index]\nkind = \"graph\"\nm = 8\n").unwrap();
        assert_eq!(config.index.kind, IndexKind::Graph);
        assert_eq!(config.index.m, 8);
        assert_eq!(config.index.ef_search, 50);
        assert_eq!(config.chunking.chunk_size, 512);
        assert_eq!(config.embedding.provider, "hash");
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.index.nprobe = config.index.nlist + 1;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.embedding.provider = "openai".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("openai"));
    }

    #[test]
    fn write_default_if_missing_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        EngineConfig::write_default_if_missing(&path).unwrap();
        assert!(path.exists());
        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn write_default_if_missing_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[chunking]\nchunk_size = 100\nchunk_overlap = 10\n").unwrap();
        EngineConfig::write_default_if_missing(&path).unwrap();
        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.chunking.chunk_size, 100);
    }

    #[test]
    fn write_to_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut config = EngineConfig::default();
        config.index.kind = IndexKind::InvertedFile;
        config.embedding.model = Some("embed-english-v3.0".into());
        config.write_to_file(&path).unwrap();
        assert_eq!(EngineConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn from_file_reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[index]\nkind = \"lsh\"\n").unwrap();
        let err = EngineConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
