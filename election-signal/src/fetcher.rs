use crate::store::ArtifactStore;
use crate::traits::NewsSource;
use crate::types::{FetchConfig, NewsQuery, PipelineError, RawArticleBatch, Result};
use async_trait::async_trait;
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    articles: RawArticleBatch,
}

/// News search client for the `everything` endpoint.
pub struct NewsApiClient {
    client: Client,
    query: NewsQuery,
    config: FetchConfig,
    store: ArtifactStore,
}

impl NewsApiClient {
    pub fn new(query: NewsQuery, config: FetchConfig, store: ArtifactStore) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()?;

        Ok(Self { client, query, config, store })
    }

    /// Query parameters for the window ending today.
    pub fn query_params(&self, lookback_days: NonZeroU32) -> Vec<(&'static str, String)> {
        let (from, to) = date_window(Utc::now().date_naive(), lookback_days);
        vec![
            ("q", self.query.topic.clone()),
            ("from", from.format("%Y-%m-%d").to_string()),
            ("to", to.format("%Y-%m-%d").to_string()),
            ("language", self.query.language.clone()),
            ("sortBy", self.query.sort_by.clone()),
            ("apiKey", self.query.api_key.clone()),
        ]
    }

    async fn request(&self, params: &[(&'static str, String)]) -> Result<RawArticleBatch> {
        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_millis(self.config.retry_delay_millis),
            initial_interval: Duration::from_millis(self.config.retry_delay_millis),
            max_interval: Duration::from_millis(self.config.retry_delay_millis * 16),
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        };

        let mut attempt = 0;
        loop {
            let error = match self.attempt(params).await {
                Ok(articles) => return Ok(articles),
                Err(e) => e,
            };

            if attempt >= self.config.max_retries || !is_retryable(&error) {
                return Err(error);
            }
            attempt += 1;
            let delay = backoff
                .next_backoff()
                .unwrap_or_else(|| Duration::from_millis(self.config.retry_delay_millis));
            warn!("Attempt {} failed for {}: {}; retrying in {:?}", attempt, self.source_name(), error, delay);
            tokio::time::sleep(delay).await;
        }
    }

    async fn attempt(&self, params: &[(&'static str, String)]) -> Result<RawArticleBatch> {
        let response = self
            .client
            .get(self.query.endpoint.clone())
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("News search answered HTTP {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(PipelineError::Fetch { status: Some(status.as_u16()), detail: body });
        }

        let parsed: SearchResponse = serde_json::from_str(&body).map_err(|e| PipelineError::Fetch {
            status: Some(status.as_u16()),
            detail: format!("unexpected response body: {}", e),
        })?;
        Ok(parsed.articles)
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    fn source_name(&self) -> String {
        match self.query.endpoint.host_str() {
            Some(host) => format!("News search ({})", host),
            None => "News search".to_string(),
        }
    }

    async fn fetch(&self, lookback_days: NonZeroU32) -> Result<RawArticleBatch> {
        info!("Fetching '{}' articles for the last {} day(s)", self.query.topic, lookback_days);
        let params = self.query_params(lookback_days);

        let articles = match self.request(&params).await {
            Ok(articles) => articles,
            Err(e) => {
                error!("Failed to download news data: {}", e);
                return Err(e);
            }
        };

        self.store.save_raw_batch(&articles)?;
        info!("Downloaded {} news articles", articles.len());
        Ok(articles)
    }
}

/// `[today - lookback_days, today]` as calendar dates.
pub fn date_window(today: NaiveDate, lookback_days: NonZeroU32) -> (NaiveDate, NaiveDate) {
    let from = today - ChronoDuration::days(i64::from(lookback_days.get()));
    (from, today)
}

fn is_retryable(error: &PipelineError) -> bool {
    match error {
        PipelineError::Fetch { status: None, .. } => true,
        PipelineError::Fetch { status: Some(code), .. } => StatusCode::from_u16(*code)
            .map(|s| s.is_server_error() || s == StatusCode::TOO_MANY_REQUESTS)
            .unwrap_or(false),
        _ => false,
    }
}
