//! Library and service command handlers.

use ragsearch_core::{DistanceMetric, IndexKind, IndexParams, LibraryConfig};

use crate::types::ServiceInfo;
use crate::{Executor, Output, Result};

/// Handle Info command.
pub fn service_info(ex: &Executor) -> Result<Output> {
    Ok(Output::ServiceInfo(ServiceInfo {
        name: "ragsearch".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        libraries: ex.registry().len(),
        embedder: ex.embedder().name().to_string(),
        embedding_dimension: ex.embedder().dimension(),
    }))
}

/// Handle CreateLibrary command.
///
/// Omitted settings come from the `[index]` config section; the dimension
/// defaults to the embedder's so text ingestion works out of the box.
pub fn create_library(
    ex: &Executor,
    library: String,
    dimension: Option<usize>,
    metric: Option<DistanceMetric>,
    index_kind: Option<IndexKind>,
    params: Option<IndexParams>,
    description: Option<String>,
) -> Result<Output> {
    let defaults = ex.index_defaults();
    let dimension = dimension.unwrap_or_else(|| ex.embedder().dimension());
    let config = LibraryConfig::new(
        dimension,
        metric.unwrap_or_default(),
        index_kind.unwrap_or(defaults.kind),
    )?
    .with_params(params.unwrap_or_else(|| defaults.params()));

    let manager = ex.registry().create(&library, config, description)?;
    Ok(Output::Library(manager.info()))
}

/// Handle DeleteLibrary command.
pub fn delete_library(ex: &Executor, library: String) -> Result<Output> {
    ex.registry().delete(&library)?;
    Ok(Output::Unit)
}

/// Handle GetLibrary command.
pub fn get_library(ex: &Executor, library: String) -> Result<Output> {
    let manager = ex.registry().get(&library)?;
    Ok(Output::Library(manager.info()))
}

/// Handle ListLibraries command.
pub fn list_libraries(ex: &Executor) -> Result<Output> {
    Ok(Output::Libraries(ex.registry().list()))
}

/// Handle LibraryStats command.
pub fn library_stats(ex: &Executor, library: String) -> Result<Output> {
    let manager = ex.registry().get(&library)?;
    Ok(Output::Stats(manager.stats()))
}

/// Handle RebuildLibrary command.
pub fn rebuild_library(ex: &Executor, library: String) -> Result<Output> {
    let manager = ex.registry().get(&library)?;
    manager.rebuild();
    Ok(Output::Stats(manager.stats()))
}
