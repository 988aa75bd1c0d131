use crate::model::{LogisticConfig, TextClassifier};
use crate::store::ArtifactStore;
use crate::types::{Label, Result, TrainerConfig, TrainingRow};
use tracing::{info, warn};

/// Fits the text classifier on the persisted training table.
#[derive(Debug, Clone)]
pub struct Trainer {
    store: ArtifactStore,
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(store: ArtifactStore, config: TrainerConfig) -> Self {
        Self { store, config }
    }

    /// Fit on the latest table and replace the persisted model.
    pub fn train(&self) -> Result<TextClassifier> {
        let table = self.store.load_training_table()?;
        let (fit_rows, holdout) = split_holdout(&table, self.config.holdout_fraction);

        let (texts, labels) = columns(fit_rows);
        let logistic = LogisticConfig {
            c: self.config.inverse_regularization.unwrap_or(1.0),
            ..Default::default()
        };
        let model = TextClassifier::fit(&texts, &labels, logistic)?;

        if !holdout.is_empty() {
            let (texts, labels) = columns(holdout);
            let correct = model
                .predict(&texts)
                .iter()
                .zip(&labels)
                .filter(|(predicted, actual)| predicted == actual)
                .count();
            info!(
                "Holdout accuracy {:.3} on {} rows",
                correct as f64 / labels.len() as f64,
                labels.len()
            );
        }

        self.store.save_model(&model)?;
        let summary = model.summary();
        info!(
            "Trained model {} on {} samples ({} terms, {} iterations)",
            summary.run_id, summary.samples, summary.vocabulary_size, summary.iterations
        );
        Ok(model)
    }
}

/// Trailing `ceil(n * fraction)` rows form the holdout; at least one row is
/// always kept for fitting.
fn split_holdout(table: &[TrainingRow], fraction: Option<f64>) -> (&[TrainingRow], &[TrainingRow]) {
    let Some(fraction) = fraction.filter(|f| *f > 0.0 && *f < 1.0) else {
        if fraction.is_some() {
            warn!("Ignoring holdout fraction outside (0, 1): {:?}", fraction);
        }
        return (table, &[]);
    };
    let held = ((table.len() as f64) * fraction).ceil() as usize;
    let held = held.min(table.len().saturating_sub(1));
    table.split_at(table.len() - held)
}

fn columns(rows: &[TrainingRow]) -> (Vec<String>, Vec<Label>) {
    rows.iter().map(|row| (row.text.clone(), row.label)).unzip()
}
