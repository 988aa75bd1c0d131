use crate::store::ArtifactStore;
use crate::types::{LabelPolicy, RawArticleBatch, Result, TrainingRow, TrainingTable};
use std::sync::Arc;
use tracing::info;

/// Turns the persisted raw batch into a text/label table.
#[derive(Clone)]
pub struct DatasetBuilder {
    store: ArtifactStore,
    labels: Arc<dyn LabelPolicy>,
}

impl DatasetBuilder {
    pub fn new(store: ArtifactStore, labels: Arc<dyn LabelPolicy>) -> Self {
        Self { store, labels }
    }

    /// Build from the most recently persisted batch and persist the table.
    pub fn build(&self) -> Result<TrainingTable> {
        let articles = self.store.load_raw_batch()?;
        let table = self.rows_for(&articles);
        self.store.save_training_table(&table)?;
        info!("Prepared training data with {} samples", table.len());
        Ok(table)
    }

    /// One row per article, in batch order.
    pub fn rows_for(&self, articles: &RawArticleBatch) -> TrainingTable {
        articles
            .iter()
            .map(|article| TrainingRow {
                text: article.training_text(),
                label: self.labels.assign(article),
            })
            .collect()
    }
}
