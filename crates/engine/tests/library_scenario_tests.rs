//! End-to-end library scenarios through the registry and index manager

use ragsearch_core::{DistanceMetric, IndexKind, LibraryConfig, Metadata, MetadataFilter};
use ragsearch_engine::{LibraryRegistry, NewChunk, VectorError};
use serde_json::json;

const ALL_KINDS: [IndexKind; 3] = [IndexKind::Flat, IndexKind::InvertedFile, IndexKind::Graph];

fn registry_with(kind: IndexKind, metric: DistanceMetric) -> LibraryRegistry {
    let registry = LibraryRegistry::default();
    let config = LibraryConfig::new(3, metric, kind).unwrap();
    registry.create("L", config, None).unwrap();
    registry
}

fn ingest_abc(registry: &LibraryRegistry) {
    let lib = registry.get("L").unwrap();
    for (doc, v) in [
        ("A", vec![1.0, 0.0, 0.0]),
        ("B", vec![0.0, 1.0, 0.0]),
        ("C", vec![0.9, 0.1, 0.0]),
    ] {
        lib.insert_document(doc, Metadata::new(), vec![NewChunk::new(doc, v)])
            .unwrap();
    }
}

fn documents_of(registry: &LibraryRegistry, query: &[f32], k: usize) -> Vec<String> {
    registry
        .search("L", query, k, None)
        .unwrap()
        .into_iter()
        .map(|h| h.document_id)
        .collect()
}

#[test]
fn cosine_scenario_returns_a_then_c() {
    for kind in ALL_KINDS {
        let registry = registry_with(kind, DistanceMetric::Cosine);
        ingest_abc(&registry);
        assert_eq!(
            documents_of(&registry, &[1.0, 0.0, 0.0], 2),
            vec!["A", "C"],
            "index kind {:?}",
            kind
        );
    }
}

#[test]
fn deleting_document_a_returns_c_then_b() {
    for kind in ALL_KINDS {
        let registry = registry_with(kind, DistanceMetric::Cosine);
        ingest_abc(&registry);
        registry.get("L").unwrap().delete_document("A").unwrap();
        assert_eq!(
            documents_of(&registry, &[1.0, 0.0, 0.0], 2),
            vec!["C", "B"],
            "index kind {:?}",
            kind
        );
    }
}

#[test]
fn euclidean_scores_are_ascending_distances() {
    let registry = registry_with(IndexKind::Flat, DistanceMetric::Euclidean);
    ingest_abc(&registry);
    let hits = registry.search("L", &[1.0, 0.0, 0.0], 3, None).unwrap();
    assert_eq!(hits[0].document_id, "A");
    assert_eq!(hits[0].score, 0.0);
    assert!(hits.windows(2).all(|w| w[0].score <= w[1].score));
}

#[test]
fn wrong_dimension_leaves_library_unchanged() {
    for kind in ALL_KINDS {
        let registry = registry_with(kind, DistanceMetric::Cosine);
        ingest_abc(&registry);
        let lib = registry.get("L").unwrap();
        let before = lib.stats();

        let err = lib
            .insert_document(
                "D",
                Metadata::new(),
                vec![NewChunk::new("bad", vec![1.0, 0.0])],
            )
            .unwrap_err();
        assert_eq!(
            err,
            VectorError::DimensionMismatch {
                expected: 3,
                got: 2
            }
        );

        let after = lib.stats();
        assert_eq!(before.records, after.records);
        assert_eq!(before.index.live, after.index.live);
        assert_eq!(lib.list_documents().len(), 3);
    }
}

#[test]
fn metadata_filter_restricts_results() {
    for kind in ALL_KINDS {
        let registry = registry_with(kind, DistanceMetric::Cosine);
        let lib = registry.get("L").unwrap();
        for i in 0..30 {
            let lang = if i % 3 == 0 { "fr" } else { "en" };
            let v = vec![1.0, i as f32 * 0.1, 0.0];
            lib.insert_document(
                &format!("doc{}", i),
                json!({ "lang": lang }).as_object().cloned().unwrap(),
                vec![NewChunk::new(format!("text {}", i), v)],
            )
            .unwrap();
        }

        let filter = MetadataFilter::new().eq("lang", "fr");
        let hits = registry
            .search("L", &[1.0, 0.0, 0.0], 20, Some(&filter))
            .unwrap();
        assert_eq!(hits.len(), 10, "index kind {:?}", kind);
        assert!(hits.iter().all(|h| h.metadata["lang"] == json!("fr")));
    }
}

#[test]
fn deleting_library_releases_everything() {
    let registry = registry_with(IndexKind::Graph, DistanceMetric::Cosine);
    ingest_abc(&registry);
    registry.delete("L").unwrap();
    assert!(matches!(
        registry.search("L", &[1.0, 0.0, 0.0], 1, None),
        Err(VectorError::LibraryNotFound { .. })
    ));

    // Recreating with the same id starts empty
    let config = LibraryConfig::new(3, DistanceMetric::Cosine, IndexKind::Graph).unwrap();
    registry.create("L", config, None).unwrap();
    assert!(documents_of(&registry, &[1.0, 0.0, 0.0], 5).is_empty());
}
