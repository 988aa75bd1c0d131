//! Text classification: tokenizer, TF-IDF features, logistic regression.

pub mod classifier;
pub mod logistic;
pub mod tokenizer;
pub mod vectorizer;

pub use classifier::{FitSummary, TextClassifier};
pub use logistic::{LogisticConfig, LogisticRegression};
pub use vectorizer::TfidfVectorizer;

/// Sorted `(column, value)` pairs.
pub type SparseVector = Vec<(usize, f64)>;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("training table is empty")]
    EmptyTrainingSet,

    #[error("training labels contain a single class ({0}); need both 0 and 1")]
    SingleClass(u8),

    #[error("vocabulary is empty; every document contained only stop words")]
    EmptyVocabulary,

    #[error("{samples} samples but {labels} labels")]
    LengthMismatch { samples: usize, labels: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
