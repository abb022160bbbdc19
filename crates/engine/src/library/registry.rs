//! Library Registry - the process-scoped map of libraries
//!
//! Constructed once and passed explicitly to whatever needs library lookup.
//! Each library lives behind its own `Arc<IndexManager>`, so operations on
//! different libraries never contend on a shared lock. Deleting a library
//! detaches it; in-flight queries holding the `Arc` finish against the
//! detached state.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ragsearch_core::{LibraryConfig, Limits, MetadataFilter};
use tracing::info;

use crate::library::manager::{IndexManager, LibraryInfo, ScoredChunk};
use crate::library::validation::validate_library_id;
use crate::vector::{VectorError, VectorResult};

/// Registry of libraries keyed by id
pub struct LibraryRegistry {
    libraries: DashMap<String, Arc<IndexManager>>,
    limits: Limits,
}

impl Default for LibraryRegistry {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

impl LibraryRegistry {
    /// Create an empty registry enforcing `limits`
    pub fn new(limits: Limits) -> Self {
        LibraryRegistry {
            libraries: DashMap::new(),
            limits,
        }
    }

    /// Limits enforced by this registry
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Create a library
    ///
    /// Fails with `LibraryAlreadyExists` if the id is taken and with
    /// `InvalidConfig` if the dimension or index parameters are out of range.
    pub fn create(
        &self,
        id: &str,
        config: LibraryConfig,
        description: Option<String>,
    ) -> VectorResult<Arc<IndexManager>> {
        validate_library_id(id, &self.limits)?;
        self.limits.validate_dimension(config.dimension)?;
        config
            .params
            .validate()
            .map_err(|e| VectorError::InvalidConfig {
                reason: e.to_string(),
            })?;

        let manager = match self.libraries.entry(id.to_string()) {
            Entry::Occupied(_) => {
                return Err(VectorError::LibraryAlreadyExists { id: id.to_string() })
            }
            Entry::Vacant(slot) => {
                let manager = Arc::new(IndexManager::new(
                    id,
                    config.clone(),
                    description,
                    self.limits.clone(),
                ));
                slot.insert(Arc::clone(&manager));
                manager
            }
        };

        info!(
            target: "ragsearch::library",
            library = id,
            dimension = config.dimension,
            metric = config.metric.name(),
            index = config.index_kind.name(),
            "Library created"
        );
        Ok(manager)
    }

    /// Delete a library and everything it owns
    pub fn delete(&self, id: &str) -> VectorResult<()> {
        match self.libraries.remove(id) {
            Some(_) => {
                info!(target: "ragsearch::library", library = id, "Library deleted");
                Ok(())
            }
            None => Err(VectorError::LibraryNotFound { id: id.to_string() }),
        }
    }

    /// Get a library's manager
    pub fn get(&self, id: &str) -> VectorResult<Arc<IndexManager>> {
        self.libraries
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| VectorError::LibraryNotFound { id: id.to_string() })
    }

    /// Get a library's configuration
    pub fn config(&self, id: &str) -> VectorResult<LibraryConfig> {
        self.get(id).map(|m| m.config().clone())
    }

    /// Check if a library exists
    pub fn contains(&self, id: &str) -> bool {
        self.libraries.contains_key(id)
    }

    /// All libraries sorted by id
    pub fn list(&self) -> Vec<LibraryInfo> {
        let mut managers: Vec<Arc<IndexManager>> = self
            .libraries
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        managers.sort_by(|a, b| a.id().cmp(b.id()));
        managers.iter().map(|m| m.info()).collect()
    }

    /// Search one library
    ///
    /// Fails with `LibraryNotFound` for unknown ids.
    pub fn search(
        &self,
        id: &str,
        query: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> VectorResult<Vec<ScoredChunk>> {
        self.get(id)?.search(query, k, filter)
    }

    /// Number of libraries
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragsearch_core::{DistanceMetric, IndexKind, IndexParams, Metadata};

    use crate::library::document::NewChunk;

    fn config(dimension: usize) -> LibraryConfig {
        LibraryConfig::new(dimension, DistanceMetric::Cosine, IndexKind::Flat).unwrap()
    }

    #[test]
    fn test_create_get_delete() {
        let registry = LibraryRegistry::default();
        registry
            .create("docs", config(3), Some("manuals".into()))
            .unwrap();
        assert!(registry.contains("docs"));
        assert_eq!(registry.config("docs").unwrap().dimension, 3);
        assert_eq!(
            registry.get("docs").unwrap().info().description.as_deref(),
            Some("manuals")
        );

        registry.delete("docs").unwrap();
        assert!(matches!(
            registry.get("docs"),
            Err(VectorError::LibraryNotFound { .. })
        ));
        assert!(matches!(
            registry.delete("docs"),
            Err(VectorError::LibraryNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_create_rejected() {
        let registry = LibraryRegistry::default();
        registry.create("docs", config(3), None).unwrap();
        assert_eq!(
            registry.create("docs", config(4), None).err(),
            Some(VectorError::LibraryAlreadyExists { id: "docs".into() })
        );
        assert_eq!(registry.config("docs").unwrap().dimension, 3);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let registry = LibraryRegistry::new(Limits::with_small_limits());
        assert!(matches!(
            registry.create("big", config(65), None),
            Err(VectorError::InvalidConfig { .. })
        ));
        assert!(matches!(
            registry.create("_hidden", config(3), None),
            Err(VectorError::InvalidLibraryId { .. })
        ));

        let mut params = IndexParams::default();
        params.ivf.nprobe = 100;
        let bad = config(3).with_params(params);
        assert!(matches!(
            registry.create("ivf", bad, None),
            Err(VectorError::InvalidConfig { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_list_sorted_by_id() {
        let registry = LibraryRegistry::default();
        for id in ["zeta", "alpha", "mid"] {
            registry.create(id, config(2), None).unwrap();
        }
        let ids: Vec<String> = registry.list().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_search_unknown_library() {
        let registry = LibraryRegistry::default();
        assert!(matches!(
            registry.search("nope", &[1.0], 1, None),
            Err(VectorError::LibraryNotFound { .. })
        ));
    }

    #[test]
    fn test_detached_library_still_answers() {
        let registry = LibraryRegistry::default();
        let lib = registry.create("docs", config(2), None).unwrap();
        lib.insert_document("d", Metadata::new(), vec![NewChunk::new("x", vec![1.0, 0.0])])
            .unwrap();

        registry.delete("docs").unwrap();
        assert_eq!(lib.search(&[1.0, 0.0], 1, None).unwrap().len(), 1);
    }
}
