//! Property tests over every index kind

use std::collections::BTreeSet;

use proptest::prelude::*;
use ragsearch_core::{DistanceMetric, IndexKind, LibraryConfig, Limits, MetadataFilter};
use ragsearch_engine::{IndexManager, NewChunk};
use serde_json::json;

const DIM: usize = 4;

fn arb_vector() -> impl Strategy<Value = Vec<f32>> {
    // Keep away from the zero vector so cosine is well defined
    proptest::collection::vec(-10.0f32..10.0, DIM).prop_filter("non-zero", |v| {
        v.iter().map(|x| x * x).sum::<f32>() > 1e-3
    })
}

fn arb_kind() -> impl Strategy<Value = IndexKind> {
    prop_oneof![
        Just(IndexKind::Flat),
        Just(IndexKind::InvertedFile),
        Just(IndexKind::Graph),
    ]
}

fn arb_metric() -> impl Strategy<Value = DistanceMetric> {
    prop_oneof![
        Just(DistanceMetric::Cosine),
        Just(DistanceMetric::Euclidean),
        Just(DistanceMetric::DotProduct),
    ]
}

fn manager_with(kind: IndexKind, metric: DistanceMetric, vectors: &[Vec<f32>]) -> IndexManager {
    let config = LibraryConfig::new(DIM, metric, kind).unwrap();
    let manager = IndexManager::new("props", config, None, Limits::default());
    for (i, v) in vectors.iter().enumerate() {
        let group = if i % 2 == 0 { "even" } else { "odd" };
        manager
            .insert_document(
                &format!("d{}", i),
                json!({ "group": group }).as_object().cloned().unwrap(),
                vec![NewChunk::new(format!("chunk {}", i), v.clone())],
            )
            .unwrap();
    }
    manager
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// An exact duplicate of a stored vector is its own nearest neighbor.
    #[test]
    fn prop_exact_match_first_under_flat(
        vectors in proptest::collection::vec(arb_vector(), 1..30),
        pick in any::<prop::sample::Index>(),
    ) {
        let manager = manager_with(IndexKind::Flat, DistanceMetric::Euclidean, &vectors);
        let target = pick.index(vectors.len());
        let hits = manager.search(&vectors[target], 1, None).unwrap();
        prop_assert_eq!(hits.len(), 1);
        // Duplicates of the target tie at distance 0; the earliest wins
        let first_equal = vectors.iter().position(|v| *v == vectors[target]).unwrap();
        prop_assert_eq!(&hits[0].document_id, &format!("d{}", first_equal));
        prop_assert_eq!(hits[0].score, 0.0);
    }

    /// Every search returns min(k, matching records) results.
    #[test]
    fn prop_result_count_is_min_k_matching(
        kind in arb_kind(),
        metric in arb_metric(),
        vectors in proptest::collection::vec(arb_vector(), 0..40),
        query in arb_vector(),
        k in 0usize..50,
        filtered in any::<bool>(),
    ) {
        let manager = manager_with(kind, metric, &vectors);
        let filter = MetadataFilter::new().eq("group", "odd");
        let (filter, matching) = if filtered {
            (Some(&filter), vectors.len() / 2)
        } else {
            (None, vectors.len())
        };
        let hits = manager.search(&query, k, filter).unwrap();
        prop_assert_eq!(hits.len(), k.min(matching));
    }

    /// Deleted chunks never appear in results, with or without a rebuild.
    #[test]
    fn prop_deleted_chunks_absent(
        kind in arb_kind(),
        vectors in proptest::collection::vec(arb_vector(), 1..30),
        deletions in proptest::collection::btree_set(0usize..30, 0..15),
        query in arb_vector(),
        rebuild in any::<bool>(),
    ) {
        let manager = manager_with(kind, DistanceMetric::Cosine, &vectors);
        let deleted: BTreeSet<String> = deletions
            .into_iter()
            .filter(|i| *i < vectors.len())
            .map(|i| format!("d{}", i))
            .collect();
        for doc in &deleted {
            manager.delete_document(doc).unwrap();
        }
        if rebuild {
            manager.rebuild();
        }

        let hits = manager.search(&query, vectors.len(), None).unwrap();
        prop_assert_eq!(hits.len(), vectors.len() - deleted.len());
        for hit in &hits {
            prop_assert!(!deleted.contains(&hit.document_id));
        }
    }

    /// Results are ordered best-first for the metric.
    #[test]
    fn prop_results_ordered_by_metric(
        kind in arb_kind(),
        metric in arb_metric(),
        vectors in proptest::collection::vec(arb_vector(), 1..30),
        query in arb_vector(),
    ) {
        let manager = manager_with(kind, metric, &vectors);
        let hits = manager.search(&query, 10, None).unwrap();
        for pair in hits.windows(2) {
            if metric.is_distance() {
                prop_assert!(pair[0].score <= pair[1].score);
            } else {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }
    }
}

/// After rebuild, the graph index agrees with an exact scan on small k.
#[test]
fn graph_rebuild_matches_flat_after_churn() {
    let vectors: Vec<Vec<f32>> = (0..200)
        .map(|i| {
            let t = i as f32 * 0.37;
            vec![t.sin(), t.cos(), (t * 0.5).sin(), (t * 1.7).cos()]
        })
        .collect();
    let graph = manager_with(IndexKind::Graph, DistanceMetric::Cosine, &vectors);
    let flat = manager_with(IndexKind::Flat, DistanceMetric::Cosine, &vectors);
    for i in (0..200).step_by(3) {
        let doc = format!("d{}", i);
        graph.delete_document(&doc).unwrap();
        flat.delete_document(&doc).unwrap();
    }
    graph.rebuild();
    assert_eq!(graph.stats().index.tombstones, 0);

    let mut hits = 0;
    let mut total = 0;
    for q in 0..20 {
        let t = q as f32 * 1.13 + 0.05;
        let query = vec![t.cos(), t.sin(), (t * 0.3).cos(), (t * 0.9).sin()];
        let truth: BTreeSet<String> = flat
            .search(&query, 5, None)
            .unwrap()
            .into_iter()
            .map(|h| h.chunk_id)
            .collect();
        let found = graph.search(&query, 5, None).unwrap();
        total += truth.len();
        hits += found.iter().filter(|h| truth.contains(&h.chunk_id)).count();
    }
    let recall = hits as f64 / total as f64;
    assert!(recall >= 0.95, "recall {} below 0.95", recall);
}

#[test]
fn empty_library_searches_return_nothing() {
    let manager = manager_with(IndexKind::Graph, DistanceMetric::Cosine, &[]);
    assert!(manager.search(&[1.0, 0.0, 0.0, 0.0], 5, None).unwrap().is_empty());
    assert_eq!(manager.stats().records, 0);
    assert!(manager.list_documents().is_empty());
}
