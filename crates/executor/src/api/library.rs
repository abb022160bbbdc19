//! Library operations.

use super::RagSearch;
use crate::types::*;
use crate::{Command, Error, Output, Result};

impl RagSearch {
    /// Create a library with default settings and the embedder's dimension.
    pub fn create_library(&self, library: &str) -> Result<LibraryInfo> {
        self.create_library_with(library, None, None, None, None)
    }

    /// Create a library with explicit settings.
    pub fn create_library_with(
        &self,
        library: &str,
        dimension: Option<usize>,
        metric: Option<DistanceMetric>,
        index_kind: Option<IndexKind>,
        description: Option<&str>,
    ) -> Result<LibraryInfo> {
        match self.executor.execute(Command::CreateLibrary {
            library: library.to_string(),
            dimension,
            metric,
            index_kind,
            params: None,
            description: description.map(str::to_string),
        })? {
            Output::Library(info) => Ok(info),
            _ => Err(Error::Internal {
                reason: "Unexpected output for CreateLibrary".into(),
            }),
        }
    }

    /// Delete a library and everything it owns.
    pub fn delete_library(&self, library: &str) -> Result<()> {
        match self.executor.execute(Command::DeleteLibrary {
            library: library.to_string(),
        })? {
            Output::Unit => Ok(()),
            _ => Err(Error::Internal {
                reason: "Unexpected output for DeleteLibrary".into(),
            }),
        }
    }

    /// Get a library's configuration and counts.
    pub fn get_library(&self, library: &str) -> Result<LibraryInfo> {
        match self.executor.execute(Command::GetLibrary {
            library: library.to_string(),
        })? {
            Output::Library(info) => Ok(info),
            _ => Err(Error::Internal {
                reason: "Unexpected output for GetLibrary".into(),
            }),
        }
    }

    /// List libraries sorted by id.
    pub fn list_libraries(&self) -> Result<Vec<LibraryInfo>> {
        match self.executor.execute(Command::ListLibraries)? {
            Output::Libraries(infos) => Ok(infos),
            _ => Err(Error::Internal {
                reason: "Unexpected output for ListLibraries".into(),
            }),
        }
    }

    /// Get library statistics.
    pub fn library_stats(&self, library: &str) -> Result<LibraryStats> {
        match self.executor.execute(Command::LibraryStats {
            library: library.to_string(),
        })? {
            Output::Stats(stats) => Ok(stats),
            _ => Err(Error::Internal {
                reason: "Unexpected output for LibraryStats".into(),
            }),
        }
    }

    /// Rebuild a library's index. Returns the stats after rebuild.
    pub fn rebuild_library(&self, library: &str) -> Result<LibraryStats> {
        match self.executor.execute(Command::RebuildLibrary {
            library: library.to_string(),
        })? {
            Output::Stats(stats) => Ok(stats),
            _ => Err(Error::Internal {
                reason: "Unexpected output for RebuildLibrary".into(),
            }),
        }
    }
}
