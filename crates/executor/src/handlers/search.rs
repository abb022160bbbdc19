//! Search command handler.
//!
//! Text queries are embedded with the executor's embedder before the index
//! lock is taken; vector queries go straight to the library.

use ragsearch_core::MetadataFilter;

use crate::types::{SearchHit, SearchQuery};
use crate::{Executor, Output, Result};

/// Handle Search command.
pub fn search(
    ex: &Executor,
    library: String,
    query: SearchQuery,
    k: usize,
    filter: Option<MetadataFilter>,
) -> Result<Output> {
    let manager = ex.registry().get(&library)?;
    let vector = match query {
        SearchQuery::Vector(v) => v,
        SearchQuery::Text(text) => ex
            .pipeline()
            .embed_query(&text, manager.config().dimension)?,
    };
    let hits = manager
        .search(&vector, k, filter.as_ref())?
        .into_iter()
        .map(SearchHit::from)
        .collect();
    Ok(Output::Hits(hits))
}
