use crate::types::{RawArticleBatch, Result};
use async_trait::async_trait;
use std::num::NonZeroU32;

/// Source of recent articles for the fixed topic.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Human-readable name for this source
    fn source_name(&self) -> String;

    /// Fetch articles published within the last `lookback_days` days.
    ///
    /// On success the batch has already been persisted, replacing the
    /// previous one. A rejected request is an `Err` carrying the status, so a
    /// failed fetch is never confused with an empty batch, and leaves the
    /// persisted batch untouched.
    async fn fetch(&self, lookback_days: NonZeroU32) -> Result<RawArticleBatch>;
}
