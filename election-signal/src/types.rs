use crate::model::ModelError;
use std::path::PathBuf;
use url::Url;

// Use the interfaces crate for core types
pub use interfaces::defs::{Article, Inference, Label, LabelPolicy, RawArticleBatch};
pub use interfaces::defs::{TrainingRow, TrainingTable};

pub const DEFAULT_NEWS_ENDPOINT: &str = "https://newsapi.org/v2/everything";
pub const DEFAULT_TOPIC_QUERY: &str = "US presidential election";

/// Lookback used by the update cycle when refreshing training data.
pub const TRAINING_WINDOW_DAYS: u32 = 30;
/// Lookback used when scoring the latest articles.
pub const INFERENCE_WINDOW_DAYS: u32 = 1;

#[derive(Debug, Clone)]
pub struct NewsQuery {
    pub endpoint: Url,
    pub topic: String,
    pub language: String,
    pub sort_by: String,
    pub api_key: String,
}

impl NewsQuery {
    pub fn new(endpoint: Url, api_key: impl Into<String>) -> Self {
        Self {
            endpoint,
            topic: DEFAULT_TOPIC_QUERY.to_string(),
            language: "en".to_string(),
            sort_by: "relevancy".to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_millis: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Election-Signal/0.1".to_string(),
            timeout_seconds: 30,
            max_retries: 2,
            retry_delay_millis: 500,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrainerConfig {
    /// Fraction of trailing rows held out from fitting. `None` fits on every
    /// row.
    pub holdout_fraction: Option<f64>,
    /// Inverse L2 strength `C` for the classifier. `None` uses 1.0.
    pub inverse_regularization: Option<f64>,
}

/// Locations of the three persisted artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub raw_batch: PathBuf,
    pub training_table: PathBuf,
    pub model: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            raw_batch: data_dir.join("news_data.json"),
            training_table: data_dir.join("training_data.csv"),
            model: data_dir.join("model.json"),
        }
    }

    pub fn with_model_path(mut self, model: impl Into<PathBuf>) -> Self {
        self.model = model.into();
        self
    }
}

/// Summary of a completed update cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReport {
    pub articles_fetched: usize,
    pub rows_built: usize,
    pub model_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{}", fetch_message(.status, .detail))]
    Fetch { status: Option<u16>, detail: String },

    #[error("Data missing at {path}: {reason}")]
    DataMissing { path: PathBuf, reason: String },

    #[error("No trained model at {path}")]
    ModelMissing { path: PathBuf },

    #[error("Model at {path} could not be read: {reason}")]
    ModelCorrupt { path: PathBuf, reason: String },

    #[error("Training failed: {0}")]
    Training(#[from] ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn fetch_message(status: &Option<u16>, detail: &str) -> String {
    match status {
        Some(code) => format!("News fetch failed with HTTP {}: {}", code, detail),
        None => format!("News fetch failed: {}", detail),
    }
}

impl PipelineError {
    /// Stable snake_case name used in error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Fetch { .. } => "fetch_failure",
            PipelineError::DataMissing { .. } => "data_missing",
            PipelineError::ModelMissing { .. } => "model_missing",
            PipelineError::ModelCorrupt { .. } => "model_corrupt",
            PipelineError::Training(_) => "training_failure",
            PipelineError::Io(_) => "io",
            PipelineError::Serialization(_) => "serialization",
            PipelineError::Csv(_) => "csv",
        }
    }

    /// True for a fetch that reached the server and got a non-success status.
    /// A success status with an undecodable body is not a rejection.
    pub fn is_rejected_fetch(&self) -> bool {
        matches!(self, PipelineError::Fetch { status: Some(code), .. } if !(200..300).contains(code))
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(e: reqwest::Error) -> Self {
        let detail = if e.is_timeout() {
            format!("request timed out: {}", e)
        } else {
            e.to_string()
        };
        PipelineError::Fetch {
            status: e.status().map(|s| s.as_u16()),
            detail,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
