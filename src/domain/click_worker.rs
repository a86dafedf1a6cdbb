//! Background worker that applies click increments.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::application::services::with_deadline;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Base delay of the exponential backoff between increment attempts.
const RETRY_BASE_DELAY_MS: u64 = 10;

/// Upper bound for a single backoff delay.
const RETRY_MAX_DELAY: Duration = Duration::from_secs(1);

/// Consumes click events until every sender is dropped.
///
/// Each event becomes one `increment_clicks` call bounded by
/// `operation_timeout`, retried up to `retry_attempts` extra times with
/// jittered exponential backoff. An elapsed deadline counts as a storage
/// failure and is retried like one. Click accounting is best-effort: a final
/// failure is logged and counted in `link_click_increment_failures_total`,
/// then the worker moves on.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<dyn LinkRepository>,
    retry_attempts: usize,
    operation_timeout: Duration,
) {
    while let Some(event) = rx.recv().await {
        let strategy = ExponentialBackoff::from_millis(RETRY_BASE_DELAY_MS)
            .max_delay(RETRY_MAX_DELAY)
            .map(jitter)
            .take(retry_attempts);

        let attempt = || {
            with_deadline(
                operation_timeout,
                repository.increment_clicks(&event.code),
            )
        };

        match Retry::spawn(strategy, attempt).await {
            Ok(true) => {
                tracing::debug!(code = %event.code, "Click recorded");
            }
            Ok(false) => {
                tracing::debug!(code = %event.code, "Click for unknown code ignored");
            }
            Err(e) => {
                metrics::counter!("link_click_increment_failures_total").increment(1);
                tracing::warn!(code = %event.code, error = %e, "Failed to record click");
            }
        }
    }

    tracing::info!("Click worker stopped");
}
