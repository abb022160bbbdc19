//! High-level typed wrapper for the Executor.
//!
//! The [`RagSearch`] struct provides a convenient Rust API that wraps the
//! [`Executor`] and [`Command`]/[`Output`] enums with typed method calls.
//!
//! # Example
//!
//! ```text
//! use ragsearch_executor::RagSearch;
//!
//! let rag = RagSearch::in_memory()?;
//! rag.create_library("docs")?;
//! rag.ingest("docs", Some("intro"), "Graphs walk toward the query.", None)?;
//! let hits = rag.search("docs", "how do graphs search", 3)?;
//! ```

mod document;
mod library;
mod search;

use std::path::Path;
use std::sync::Arc;

use ragsearch_engine::{EngineConfig, CONFIG_FILE_NAME};
use ragsearch_intelligence::Embedder;

use crate::{Command, Error, Executor, Output, Result};

/// High-level typed wrapper for engine operations.
pub struct RagSearch {
    executor: Executor,
}

impl RagSearch {
    /// Create an engine with default configuration.
    pub fn in_memory() -> Result<Self> {
        Self::with_config(&EngineConfig::default())
    }

    /// Create an engine from explicit configuration.
    pub fn with_config(config: &EngineConfig) -> Result<Self> {
        Ok(RagSearch {
            executor: Executor::new(config)?,
        })
    }

    /// Create an engine with a caller-supplied embedder.
    pub fn with_embedder(config: &EngineConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        Ok(RagSearch {
            executor: Executor::with_embedder(config, embedder)?,
        })
    }

    /// Create an engine configured from `ragsearch.toml` in `dir`.
    ///
    /// Writes the default config file first if none exists.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        EngineConfig::write_default_if_missing(&path)?;
        let config = EngineConfig::from_file(&path)?;
        Self::with_config(&config)
    }

    /// Wrap an existing executor.
    pub fn from_executor(executor: Executor) -> Self {
        RagSearch { executor }
    }

    /// The underlying executor, for raw command access.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Check the engine is alive. Returns the version string.
    pub fn ping(&self) -> Result<String> {
        match self.executor.execute(Command::Ping)? {
            Output::Pong { version } => Ok(version),
            _ => Err(Error::Internal {
                reason: "Unexpected output for Ping".into(),
            }),
        }
    }

    /// Service name, version and library count.
    pub fn info(&self) -> Result<crate::types::ServiceInfo> {
        match self.executor.execute(Command::Info)? {
            Output::ServiceInfo(info) => Ok(info),
            _ => Err(Error::Internal {
                reason: "Unexpected output for Info".into(),
            }),
        }
    }
}
