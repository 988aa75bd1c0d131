use crate::store::ArtifactStore;
use crate::traits::NewsSource;
use crate::types::{Inference, Result, INFERENCE_WINDOW_DAYS};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{info, warn};

/// Scores the latest day of articles with the persisted model.
#[derive(Clone)]
pub struct Scorer {
    store: ArtifactStore,
    source: Arc<dyn NewsSource>,
}

impl Scorer {
    pub fn new(store: ArtifactStore, source: Arc<dyn NewsSource>) -> Self {
        Self { store, source }
    }

    /// Mean positive-class probability over the last day's articles.
    ///
    /// A missing model is an error. A non-2xx fetch or an empty day yields
    /// [`Inference::Unavailable`]; an undecodable success body stays an error.
    /// The fetch replaces the persisted raw batch.
    pub async fn infer(&self) -> Result<Inference> {
        let model = self.store.load_model()?;

        let window = NonZeroU32::new(INFERENCE_WINDOW_DAYS).unwrap_or(NonZeroU32::MIN);
        let articles = match self.source.fetch(window).await {
            Ok(articles) => articles,
            Err(e) if e.is_rejected_fetch() => {
                warn!("No recent articles to score: {}", e);
                return Ok(Inference::Unavailable);
            }
            Err(e) => return Err(e),
        };

        if articles.is_empty() {
            info!("No articles published in the last {} day(s)", INFERENCE_WINDOW_DAYS);
            return Ok(Inference::Unavailable);
        }

        let texts: Vec<String> = articles.iter().map(|article| article.training_text()).collect();
        let probabilities = model.predict_proba(&texts);
        let likelihood = mean(&probabilities);

        info!("Scored {} articles, likelihood {:.4}", texts.len(), likelihood);
        Ok(Inference::Likelihood(likelihood))
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
