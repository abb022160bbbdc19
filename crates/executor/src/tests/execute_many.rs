//! Tests for the execute_many batch execution method.

use super::hash_executor;
use crate::types::*;
use crate::{Command, Error, Output};

#[test]
fn test_execute_many_empty() {
    let executor = hash_executor();
    assert!(executor.execute_many(vec![]).is_empty());
}

#[test]
fn test_execute_many_preserves_order_and_isolates_failures() {
    let executor = hash_executor();
    let results = executor.execute_many(vec![
        Command::Ping,
        Command::CreateLibrary {
            library: "docs".into(),
            dimension: Some(2),
            metric: None,
            index_kind: None,
            params: None,
            description: Some("test".into()),
        },
        // Duplicate create fails without stopping the batch
        Command::CreateLibrary {
            library: "docs".into(),
            dimension: Some(2),
            metric: None,
            index_kind: None,
            params: None,
            description: None,
        },
        Command::IngestChunks {
            library: "docs".into(),
            document_id: Some("a".into()),
            chunks: vec![ChunkInput::embedded("x", vec![1.0, 0.0])],
            metadata: None,
        },
        Command::ListDocuments {
            library: "docs".into(),
        },
    ]);

    assert_eq!(results.len(), 5);
    assert!(matches!(results[0], Ok(Output::Pong { .. })));
    match &results[1] {
        Ok(Output::Library(info)) => {
            assert_eq!(info.description.as_deref(), Some("test"));
            assert_eq!(info.config.dimension, 2);
        }
        other => panic!("Expected Library, got {:?}", other),
    }
    assert_eq!(
        results[2],
        Err(Error::LibraryExists {
            library: "docs".into()
        })
    );
    assert!(matches!(results[3], Ok(Output::Document(_))));
    match &results[4] {
        Ok(Output::Documents(docs)) => assert_eq!(docs.len(), 1),
        other => panic!("Expected Documents, got {:?}", other),
    }
}

#[test]
fn test_library_lifecycle_commands() {
    let executor = hash_executor();
    for name in ["b", "a"] {
        executor
            .execute(Command::CreateLibrary {
                library: name.into(),
                dimension: None,
                metric: Some(DistanceMetric::Euclidean),
                index_kind: Some(IndexKind::Graph),
                params: None,
                description: None,
            })
            .unwrap();
    }

    match executor.execute(Command::ListLibraries).unwrap() {
        Output::Libraries(libs) => {
            let ids: Vec<&str> = libs.iter().map(|l| l.id.as_str()).collect();
            assert_eq!(ids, vec!["a", "b"]);
            assert_eq!(libs[0].config.dimension, 64);
            assert_eq!(libs[0].config.index_kind, IndexKind::Graph);
        }
        other => panic!("Expected Libraries, got {:?}", other),
    }

    match executor.execute(Command::Info).unwrap() {
        Output::ServiceInfo(info) => {
            assert_eq!(info.libraries, 2);
            assert_eq!(info.embedder, "hash");
            assert_eq!(info.embedding_dimension, 64);
        }
        other => panic!("Expected ServiceInfo, got {:?}", other),
    }

    match executor
        .execute(Command::RebuildLibrary {
            library: "a".into(),
        })
        .unwrap()
    {
        Output::Stats(stats) => {
            assert_eq!(stats.library_id, "a");
            assert_eq!(stats.index.tombstones, 0);
        }
        other => panic!("Expected Stats, got {:?}", other),
    }

    assert_eq!(
        executor
            .execute(Command::DeleteLibrary {
                library: "a".into()
            })
            .unwrap(),
        Output::Unit
    );
    assert!(executor
        .execute(Command::GetLibrary {
            library: "a".into()
        })
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_invalid_library_id_rejected() {
    let executor = hash_executor();
    let err = executor
        .execute(Command::CreateLibrary {
            library: "bad/id".into(),
            dimension: None,
            metric: None,
            index_kind: None,
            params: None,
            description: None,
        })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput { .. }));
}

#[test]
fn test_delete_document_reports_chunk_count() {
    let executor = hash_executor();
    executor
        .execute(Command::CreateLibrary {
            library: "docs".into(),
            dimension: None,
            metric: None,
            index_kind: None,
            params: None,
            description: None,
        })
        .unwrap();
    executor
        .execute(Command::IngestDocument {
            library: "docs".into(),
            document_id: Some("d".into()),
            text: "Proximity graphs walk toward the query. Flat indexes scan every record.".into(),
            metadata: None,
        })
        .unwrap();
    assert_eq!(
        executor
            .execute(Command::DeleteDocument {
                library: "docs".into(),
                document_id: "d".into(),
            })
            .unwrap(),
        Output::Uint(2)
    );
}
