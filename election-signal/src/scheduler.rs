use crate::server::AppState;
use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Run the update cycle once a day at `at` (UTC), forever.
pub async fn run_daily(state: Arc<AppState>, at: NaiveTime) {
    loop {
        let wait = until_next(Utc::now(), at);
        info!("Next scheduled update at {} UTC (in {:?})", at, wait);
        tokio::time::sleep(wait).await;

        match state.run_update().await {
            Ok(report) => info!(
                "Daily update result: {} articles, {} rows",
                report.articles_fetched, report.rows_built
            ),
            Err(e) => error!("Daily update failed ({}): {}", e.kind(), e),
        }
    }
}

/// Time from `now` until the next occurrence of `at`. An exact match waits a
/// full day so one tick never runs twice.
pub fn until_next(now: DateTime<Utc>, at: NaiveTime) -> Duration {
    let today = now.date_naive().and_time(at).and_utc();
    let next = if today > now { today } else { today + ChronoDuration::days(1) };
    (next - now).to_std().unwrap_or_default()
}
