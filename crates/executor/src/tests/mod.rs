//! Test modules for the executor crate.

pub mod execute_many;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ragsearch_engine::EngineConfig;
use ragsearch_intelligence::{EmbedError, Embedder};

use crate::{Command, Executor, Output};

/// Embedder with a fixed text → vector table; unknown text fails.
pub(crate) struct TableEmbedder {
    pub table: HashMap<String, Vec<f32>>,
    pub dimension: usize,
    pub calls: AtomicUsize,
}

impl TableEmbedder {
    pub fn new(dimension: usize, entries: &[(&str, Vec<f32>)]) -> Self {
        TableEmbedder {
            table: entries
                .iter()
                .map(|(t, v)| (t.to_string(), v.clone()))
                .collect(),
            dimension,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Embedder for TableEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table
            .get(text)
            .cloned()
            .ok_or_else(|| EmbedError::Network(format!("no embedding for '{}'", text)))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "table"
    }
}

/// Small chunks so multi-sentence text splits into several pieces.
pub(crate) fn small_chunk_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.chunking.chunk_size = 40;
    config.chunking.chunk_overlap = 0;
    config.embedding.dimension = 64;
    config
}

pub(crate) fn hash_executor() -> Executor {
    Executor::new(&small_chunk_config()).unwrap()
}

pub(crate) fn table_executor(embedder: Arc<TableEmbedder>) -> Executor {
    Executor::with_embedder(&small_chunk_config(), embedder).unwrap()
}

pub(crate) fn create_library(executor: &Executor, library: &str, dimension: Option<usize>) {
    match executor.execute(Command::CreateLibrary {
        library: library.into(),
        dimension,
        metric: None,
        index_kind: None,
        params: None,
        description: None,
    }) {
        Ok(Output::Library(info)) => assert_eq!(info.id, library),
        other => panic!("Expected Library output, got {:?}", other),
    }
}
