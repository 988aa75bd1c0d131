use crate::dataset::DatasetBuilder;
use crate::scorer::Scorer;
use crate::store::ArtifactStore;
use crate::trainer::Trainer;
use crate::traits::NewsSource;
use crate::types::{
    Inference, LabelPolicy, PipelineError, Result, TrainerConfig, UpdateReport, TRAINING_WINDOW_DAYS,
};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{error, info};

/// Sequences fetch, dataset build and training for the update cycle, and
/// hands the inference cycle to the scorer.
pub struct PipelineOrchestrator {
    source: Arc<dyn NewsSource>,
    builder: DatasetBuilder,
    trainer: Trainer,
    scorer: Scorer,
    store: ArtifactStore,
}

impl PipelineOrchestrator {
    pub fn new(
        source: Arc<dyn NewsSource>,
        store: ArtifactStore,
        labels: Arc<dyn LabelPolicy>,
        trainer_config: TrainerConfig,
    ) -> Self {
        Self {
            builder: DatasetBuilder::new(store.clone(), labels),
            trainer: Trainer::new(store.clone(), trainer_config),
            scorer: Scorer::new(store.clone(), source.clone()),
            source,
            store,
        }
    }

    /// Fetch the last 30 days, rebuild the table, retrain. Stops at the first
    /// failing step and returns its error unchanged.
    pub async fn update(&self) -> Result<UpdateReport> {
        info!("Starting update cycle via {}", self.source.source_name());

        let window = NonZeroU32::new(TRAINING_WINDOW_DAYS).unwrap_or(NonZeroU32::MIN);
        let articles = self.source.fetch(window).await?;
        let table = self.builder.build()?;

        let trainer = self.trainer.clone();
        tokio::task::spawn_blocking(move || trainer.train())
            .await
            .map_err(|e| {
                error!("Training task did not complete: {}", e);
                PipelineError::Io(std::io::Error::other(e))
            })??;

        let report = UpdateReport {
            articles_fetched: articles.len(),
            rows_built: table.len(),
            model_path: self.store.paths().model.clone(),
        };
        info!(
            "Update cycle finished: {} articles, {} rows, model at {}",
            report.articles_fetched,
            report.rows_built,
            report.model_path.display()
        );
        Ok(report)
    }

    pub async fn inference(&self) -> Result<Inference> {
        self.scorer.infer().await
    }
}
