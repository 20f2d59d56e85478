//! Network utilities
//!
//! Deadline helpers shared by the control and data connections.

use std::future::Future;
use std::time::Duration;

use tokio::time::error::Elapsed;

/// Runs `fut` to completion, bounded by `limit` when one is configured.
pub async fn with_deadline<F: Future>(
    limit: Option<Duration>,
    fut: F,
) -> Result<F::Output, Elapsed> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await,
        None => Ok(fut.await),
    }
}

/// Maps a seconds setting to a deadline; zero disables it.
pub fn deadline_from_secs(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}
