use crate::types::{ArtifactPaths, FetchConfig, NewsQuery, TrainerConfig, DEFAULT_NEWS_ENDPOINT, DEFAULT_TOPIC_QUERY};
use chrono::NaiveTime;
use clap::Parser;
use std::path::PathBuf;
use url::Url;

/// Command line and environment configuration for the service.
#[derive(Debug, Clone, Parser)]
#[command(name = "election-signal", about = "Scores recent election news with a daily-retrained classifier")]
pub struct Config {
    /// API key for the news search endpoint.
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: String,

    #[arg(long, env = "NEWS_ENDPOINT", default_value = DEFAULT_NEWS_ENDPOINT)]
    pub news_endpoint: Url,

    #[arg(long, env = "NEWS_QUERY", default_value = DEFAULT_TOPIC_QUERY)]
    pub news_query: String,

    /// Directory for the raw batch and training table.
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Model file; defaults to `<data-dir>/model.json`.
    #[arg(long, env = "MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8060)]
    pub port: u16,

    /// Daily update time, HH:MM in UTC.
    #[arg(long, env = "UPDATE_AT", default_value = "00:00", value_parser = parse_time_of_day)]
    pub update_at: NaiveTime,

    #[arg(long, env = "NO_SCHEDULE")]
    pub no_schedule: bool,

    #[arg(long, env = "FETCH_TIMEOUT_SECONDS", default_value_t = 30)]
    pub fetch_timeout_seconds: u64,

    #[arg(long, env = "FETCH_MAX_RETRIES", default_value_t = 2)]
    pub fetch_max_retries: u32,

    /// Hold out this fraction of trailing rows when training.
    #[arg(long, env = "HOLDOUT_FRACTION")]
    pub holdout_fraction: Option<f64>,

    /// Inverse regularization strength `C` of the classifier.
    #[arg(long, env = "INVERSE_REGULARIZATION")]
    pub inverse_regularization: Option<f64>,

    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

impl Config {
    pub fn artifact_paths(&self) -> ArtifactPaths {
        let paths = ArtifactPaths::in_dir(&self.data_dir);
        match &self.model_path {
            Some(model) => paths.with_model_path(model),
            None => paths,
        }
    }

    pub fn news_query(&self) -> NewsQuery {
        NewsQuery::new(self.news_endpoint.clone(), self.news_api_key.clone()).with_topic(self.news_query.clone())
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout_seconds: self.fetch_timeout_seconds,
            max_retries: self.fetch_max_retries,
            ..FetchConfig::default()
        }
    }

    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig {
            holdout_fraction: self.holdout_fraction,
            inverse_regularization: self.inverse_regularization,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_time_of_day(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| format!("expected HH:MM: {}", e))
}
