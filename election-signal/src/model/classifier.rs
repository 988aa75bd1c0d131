use super::logistic::{LogisticConfig, LogisticRegression};
use super::vectorizer::TfidfVectorizer;
use super::ModelError;
use crate::types::Label;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    pub run_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub samples: usize,
    pub vocabulary_size: usize,
    pub iterations: usize,
}

/// The fitted artifact: TF-IDF vectorizer followed by a logistic regression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextClassifier {
    vectorizer: TfidfVectorizer,
    classifier: LogisticRegression,
    summary: FitSummary,
}

impl TextClassifier {
    pub fn fit(texts: &[String], labels: &[Label], config: LogisticConfig) -> Result<Self, ModelError> {
        if texts.len() != labels.len() {
            return Err(ModelError::LengthMismatch { samples: texts.len(), labels: labels.len() });
        }
        let Some(first) = labels.first() else {
            return Err(ModelError::EmptyTrainingSet);
        };
        if labels.iter().all(|label| label == first) {
            return Err(ModelError::SingleClass(u8::from(*first)));
        }

        let vectorizer = TfidfVectorizer::fit(texts)?;
        let features = vectorizer.transform_all(texts);
        let targets: Vec<f64> = labels.iter().map(|label| label.as_f64()).collect();
        let classifier = LogisticRegression::fit(&features, &targets, vectorizer.n_features(), config)?;

        let summary = FitSummary {
            run_id: Uuid::new_v4(),
            trained_at: Utc::now(),
            samples: texts.len(),
            vocabulary_size: vectorizer.n_features(),
            iterations: classifier.iterations(),
        };

        Ok(Self { vectorizer, classifier, summary })
    }

    /// Positive-class probability for every text, in input order.
    pub fn predict_proba(&self, texts: &[String]) -> Vec<f64> {
        let features = self.vectorizer.transform_all(texts);
        self.classifier.predict_proba(&features)
    }

    pub fn predict(&self, texts: &[String]) -> Vec<Label> {
        self.predict_proba(texts)
            .into_iter()
            .map(|p| if p >= 0.5 { Label::Positive } else { Label::Negative })
            .collect()
    }

    pub fn summary(&self) -> &FitSummary {
        &self.summary
    }
}
