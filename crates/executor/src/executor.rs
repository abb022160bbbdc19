//! The Executor - single entry point to the RAGSearch engine.
//!
//! The Executor routes commands to the library registry and the ingestion
//! pipeline and converts results to outputs. All library state lives in the
//! registry; the executor itself holds only configuration.

use std::sync::Arc;

use ragsearch_engine::{EngineConfig, IndexSection, LibraryRegistry};
use ragsearch_intelligence::{Embedder, TextSplitter};
use tracing::info;

use crate::pipeline::{build_embedder, IngestPipeline};
use crate::{Command, Output, Result};

/// The command executor.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across threads. Commands on
/// different libraries never contend on a shared lock.
///
/// # Example
///
/// ```ignore
/// use ragsearch_executor::{Command, Executor};
/// use ragsearch_engine::EngineConfig;
///
/// let executor = Executor::new(&EngineConfig::default())?;
/// executor.execute(Command::CreateLibrary {
///     library: "docs".into(),
///     dimension: None,
///     metric: None,
///     index_kind: None,
///     params: None,
///     description: None,
/// })?;
/// ```
pub struct Executor {
    registry: Arc<LibraryRegistry>,
    pipeline: IngestPipeline,
    index_defaults: IndexSection,
}

impl Executor {
    /// Create an executor from engine configuration.
    ///
    /// Builds the configured embedder and an empty registry.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let embedder = build_embedder(&config.embedding)?;
        Self::with_embedder(config, embedder)
    }

    /// Create an executor with a caller-supplied embedder.
    pub fn with_embedder(config: &EngineConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        Self::from_parts(Arc::new(LibraryRegistry::default()), config, embedder)
    }

    /// Create an executor over an existing registry.
    pub fn from_parts(
        registry: Arc<LibraryRegistry>,
        config: &EngineConfig,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        config.validate()?;
        let splitter =
            TextSplitter::new(config.chunking.chunk_size, config.chunking.chunk_overlap)?;
        info!(
            target: "ragsearch::pipeline",
            embedder = embedder.name(),
            dimension = embedder.dimension(),
            chunk_size = splitter.chunk_size(),
            chunk_overlap = splitter.chunk_overlap(),
            "Executor ready"
        );
        let pipeline = IngestPipeline::new(embedder, splitter, registry.limits().clone());
        Ok(Executor {
            registry,
            pipeline,
            index_defaults: config.index.clone(),
        })
    }

    /// The library registry
    pub fn registry(&self) -> &Arc<LibraryRegistry> {
        &self.registry
    }

    /// The embedder used for ingestion and text queries
    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        self.pipeline.embedder()
    }

    pub(crate) fn pipeline(&self) -> &IngestPipeline {
        &self.pipeline
    }

    pub(crate) fn index_defaults(&self) -> &IndexSection {
        &self.index_defaults
    }

    /// Execute a single command.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        use crate::handlers::{document, library, search};

        match cmd {
            // Service commands
            Command::Ping => Ok(Output::Pong {
                version: env!("CARGO_PKG_VERSION").to_string(),
            }),
            Command::Info => library::service_info(self),

            // Library commands
            Command::CreateLibrary {
                library,
                dimension,
                metric,
                index_kind,
                params,
                description,
            } => library::create_library(
                self,
                library,
                dimension,
                metric,
                index_kind,
                params,
                description,
            ),
            Command::DeleteLibrary { library } => library::delete_library(self, library),
            Command::GetLibrary { library } => library::get_library(self, library),
            Command::ListLibraries => library::list_libraries(self),
            Command::LibraryStats { library } => library::library_stats(self, library),
            Command::RebuildLibrary { library } => library::rebuild_library(self, library),

            // Document commands
            Command::IngestDocument {
                library,
                document_id,
                text,
                metadata,
            } => document::ingest_document(self, library, document_id, text, metadata),
            Command::IngestChunks {
                library,
                document_id,
                chunks,
                metadata,
            } => document::ingest_chunks(self, library, document_id, chunks, metadata),
            Command::ReplaceDocument {
                library,
                document_id,
                text,
                metadata,
            } => document::replace_document(self, library, document_id, text, metadata),
            Command::DeleteDocument {
                library,
                document_id,
            } => document::delete_document(self, library, document_id),
            Command::GetDocument {
                library,
                document_id,
            } => document::get_document(self, library, document_id),
            Command::ListDocuments { library } => document::list_documents(self, library),

            // Search
            Command::Search {
                library,
                query,
                k,
                filter,
            } => search::search(self, library, query, k, filter),
        }
    }

    /// Execute multiple commands sequentially.
    ///
    /// Each command runs independently; a failure does not stop the batch.
    pub fn execute_many(&self, cmds: Vec<Command>) -> Vec<Result<Output>> {
        cmds.into_iter().map(|cmd| self.execute(cmd)).collect()
    }
}
