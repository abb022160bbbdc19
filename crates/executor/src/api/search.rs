//! Search operations.

use super::RagSearch;
use crate::types::*;
use crate::{Command, Error, Output, Result};

impl RagSearch {
    /// Search a library with free text or a vector.
    pub fn search(
        &self,
        library: &str,
        query: impl Into<SearchQuery>,
        k: usize,
    ) -> Result<Vec<SearchHit>> {
        self.search_filtered(library, query, k, None)
    }

    /// Search a library, keeping only chunks whose metadata matches `filter`.
    pub fn search_filtered(
        &self,
        library: &str,
        query: impl Into<SearchQuery>,
        k: usize,
        filter: Option<MetadataFilter>,
    ) -> Result<Vec<SearchHit>> {
        match self.executor.execute(Command::Search {
            library: library.to_string(),
            query: query.into(),
            k,
            filter,
        })? {
            Output::Hits(hits) => Ok(hits),
            _ => Err(Error::Internal {
                reason: "Unexpected output for Search".into(),
            }),
        }
    }
}
