mod common;

use common::{article, init_tracing, temp_store, Scripted, ScriptedSource, SequenceLabels};
use election_signal::types::{Article, Inference, PipelineError, TrainerConfig};
use election_signal::{DatasetBuilder, PipelineOrchestrator, Scorer};
use interfaces::RandomLabelPolicy;
use std::sync::Arc;
use tracing::info;

fn debate_batch() -> Vec<Article> {
    vec![article("A wins debate"), article("B wins debate"), article("C ties")]
}

#[tokio::test]
async fn test_update_then_inference_end_to_end() {
    init_tracing();
    let (_dir, store) = temp_store();
    let source = Arc::new(ScriptedSource::new(
        store.clone(),
        vec![
            Scripted::Articles(debate_batch()),
            Scripted::Articles(vec![article("A wins again")]),
        ],
    ));
    let orchestrator = PipelineOrchestrator::new(
        source.clone(),
        store.clone(),
        Arc::new(SequenceLabels::new(&[1, 0, 1])),
        TrainerConfig::default(),
    );

    let report = orchestrator.update().await.unwrap();
    assert_eq!(report.articles_fetched, 3);
    assert_eq!(report.rows_built, 3);
    assert!(report.model_path.exists());

    let inference = orchestrator.inference().await.unwrap();
    info!("End-to-end inference: {:?}", inference);
    let likelihood = inference.likelihood().expect("a numeric likelihood");
    assert!((0.0..=1.0).contains(&likelihood));

    assert_eq!(source.requested_windows(), vec![30, 1]);
    assert!(store.paths().model.exists());
    // Scoring refreshes the raw batch as a side effect.
    assert_eq!(store.load_raw_batch().unwrap(), vec![article("A wins again")]);
}

#[tokio::test]
async fn test_inference_without_model_is_model_missing() {
    init_tracing();
    let (_dir, store) = temp_store();
    let source = Arc::new(ScriptedSource::new(store.clone(), vec![Scripted::Articles(debate_batch())]));

    let err = Scorer::new(store, source.clone()).infer().await.unwrap_err();
    assert!(matches!(err, PipelineError::ModelMissing { .. }));
    // The model is checked before any fetch happens.
    assert!(source.requested_windows().is_empty());
}

#[tokio::test]
async fn test_inference_with_no_recent_articles_is_unavailable() {
    init_tracing();
    let (_dir, store) = temp_store();
    let source = Arc::new(ScriptedSource::new(
        store.clone(),
        vec![Scripted::Articles(debate_batch()), Scripted::Articles(Vec::new())],
    ));
    let orchestrator = PipelineOrchestrator::new(
        source,
        store,
        Arc::new(SequenceLabels::new(&[1, 0])),
        TrainerConfig::default(),
    );

    orchestrator.update().await.unwrap();
    assert_eq!(orchestrator.inference().await.unwrap(), Inference::Unavailable);
}

#[tokio::test]
async fn test_rejected_inference_fetch_is_unavailable() {
    init_tracing();
    let (_dir, store) = temp_store();
    let source = Arc::new(ScriptedSource::new(
        store.clone(),
        vec![Scripted::Articles(debate_batch()), Scripted::Status(429, "rate limited")],
    ));
    let orchestrator = PipelineOrchestrator::new(
        source,
        store,
        Arc::new(SequenceLabels::new(&[0, 1])),
        TrainerConfig::default(),
    );

    orchestrator.update().await.unwrap();
    assert_eq!(orchestrator.inference().await.unwrap(), Inference::Unavailable);
}

#[tokio::test]
async fn test_transport_failure_during_inference_propagates() {
    init_tracing();
    let (_dir, store) = temp_store();
    let source = Arc::new(ScriptedSource::new(
        store.clone(),
        vec![Scripted::Articles(debate_batch()), Scripted::Transport],
    ));
    let orchestrator = PipelineOrchestrator::new(
        source,
        store,
        Arc::new(SequenceLabels::new(&[0, 1])),
        TrainerConfig::default(),
    );

    orchestrator.update().await.unwrap();
    let err = orchestrator.inference().await.unwrap_err();
    assert!(matches!(err, PipelineError::Fetch { status: None, .. }));
}

#[tokio::test]
async fn test_update_stops_at_failed_fetch_and_keeps_previous_batch() {
    init_tracing();
    let (_dir, store) = temp_store();
    store.save_raw_batch(&debate_batch()).unwrap();
    let source = Arc::new(ScriptedSource::new(store.clone(), vec![Scripted::Status(401, "bad key")]));
    let orchestrator = PipelineOrchestrator::new(
        source,
        store.clone(),
        Arc::new(RandomLabelPolicy),
        TrainerConfig::default(),
    );

    let err = orchestrator.update().await.unwrap_err();
    match err {
        PipelineError::Fetch { status, detail } => {
            assert_eq!(status, Some(401));
            assert_eq!(detail, "bad key");
        }
        other => panic!("expected fetch failure, got {:?}", other),
    }
    assert_eq!(store.load_raw_batch().unwrap(), debate_batch());
    assert!(!store.paths().training_table.exists());
    assert!(!store.paths().model.exists());
}

#[tokio::test]
async fn test_update_with_single_class_labels_is_training_failure() {
    init_tracing();
    let (_dir, store) = temp_store();
    let source = Arc::new(ScriptedSource::new(store.clone(), vec![Scripted::Articles(debate_batch())]));
    let orchestrator = PipelineOrchestrator::new(
        source,
        store.clone(),
        Arc::new(SequenceLabels::new(&[1])),
        TrainerConfig::default(),
    );

    let err = orchestrator.update().await.unwrap_err();
    assert_eq!(err.kind(), "training_failure");
    assert!(!store.paths().model.exists());
}

#[tokio::test]
async fn test_dataset_build_is_repeatable_on_text() {
    init_tracing();
    let (_dir, store) = temp_store();
    let mut batch = debate_batch();
    batch.push(Article::new("D surges", Some("late poll".to_string())));
    store.save_raw_batch(&batch).unwrap();

    let builder = DatasetBuilder::new(store, Arc::new(RandomLabelPolicy));
    let first = builder.build().unwrap();
    let second = builder.build().unwrap();

    let texts = |table: &Vec<election_signal::types::TrainingRow>| {
        table.iter().map(|row| row.text.clone()).collect::<Vec<_>>()
    };
    assert_eq!(texts(&first), texts(&second));
    assert_eq!(
        texts(&first),
        vec!["A wins debate ", "B wins debate ", "C ties ", "D surges late poll"]
    );
    // Labels come from a coin flip and may legitimately differ between builds.
}
