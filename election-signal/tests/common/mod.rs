// Shared fixtures for the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use election_signal::types::{Article, ArtifactPaths, Label, LabelPolicy, PipelineError, RawArticleBatch, Result};
use election_signal::{ArtifactStore, NewsSource};
use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use tempfile::TempDir;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn temp_store() -> (TempDir, ArtifactStore) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = ArtifactStore::new(ArtifactPaths::in_dir(dir.path().join("data")));
    (dir, store)
}

pub fn article(title: &str) -> Article {
    Article::new(title, None)
}

/// One scripted response from [`ScriptedSource`].
pub enum Scripted {
    Articles(RawArticleBatch),
    Status(u16, &'static str),
    Transport,
}

/// News source answering from a script, persisting successful batches the
/// way a real source does.
pub struct ScriptedSource {
    store: ArtifactStore,
    responses: Mutex<VecDeque<Scripted>>,
    requested: Mutex<Vec<u32>>,
}

impl ScriptedSource {
    pub fn new(store: ArtifactStore, responses: Vec<Scripted>) -> Self {
        Self {
            store,
            responses: Mutex::new(responses.into()),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested_windows(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsSource for ScriptedSource {
    fn source_name(&self) -> String {
        "Scripted news".to_string()
    }

    async fn fetch(&self, lookback_days: NonZeroU32) -> Result<RawArticleBatch> {
        self.requested.lock().unwrap().push(lookback_days.get());
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Articles(articles)) => {
                self.store.save_raw_batch(&articles)?;
                Ok(articles)
            }
            Some(Scripted::Status(status, body)) => Err(PipelineError::Fetch {
                status: Some(status),
                detail: body.to_string(),
            }),
            Some(Scripted::Transport) | None => Err(PipelineError::Fetch {
                status: None,
                detail: "connection refused".to_string(),
            }),
        }
    }
}

/// Hands out labels from a fixed sequence, cycling when exhausted.
pub struct SequenceLabels {
    labels: Vec<Label>,
    next: AtomicUsize,
}

impl SequenceLabels {
    pub fn new(bits: &[u8]) -> Self {
        Self {
            labels: bits.iter().map(|b| Label::try_from(*b).expect("0 or 1")).collect(),
            next: AtomicUsize::new(0),
        }
    }
}

impl LabelPolicy for SequenceLabels {
    fn assign(&self, _article: &Article) -> Label {
        let idx = self.next.fetch_add(1, Ordering::SeqCst);
        self.labels[idx % self.labels.len()]
    }
}
