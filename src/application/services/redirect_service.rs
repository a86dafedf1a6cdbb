//! Short code resolution with best-effort click accounting.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::application::services::{DEFAULT_OPERATION_TIMEOUT, with_deadline};
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::is_valid_code;

/// Resolves short codes to their targets and schedules click increments.
///
/// The increment is handed to [`crate::domain::click_worker::run_click_worker`]
/// through a bounded channel. Resolution never waits for it and never fails
/// because of it.
pub struct RedirectService {
    repository: Arc<dyn LinkRepository>,
    click_sender: mpsc::Sender<ClickEvent>,
    operation_timeout: Duration,
}

impl RedirectService {
    pub fn new(repository: Arc<dyn LinkRepository>, click_sender: mpsc::Sender<ClickEvent>) -> Self {
        Self {
            repository,
            click_sender,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Returns the target URL for `code` and records a click.
    ///
    /// The URL is returned exactly as stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or malformed.
    /// Returns [`AppError::Storage`] if the lookup fails.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        if !is_valid_code(code) {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "code": code }),
            ));
        }

        let link = with_deadline(self.operation_timeout, self.repository.find_by_code(code))
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))?;

        self.record_click(code);
        metrics::counter!("link_redirects_total").increment(1);

        Ok(link.long_url)
    }

    /// Queues a click increment without waiting.
    ///
    /// A full or closed queue drops the click and logs it.
    fn record_click(&self, code: &str) {
        match self.click_sender.try_send(ClickEvent::new(code)) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                metrics::counter!("link_clicks_dropped_total").increment(1);
                tracing::warn!(code = %event.code, "Click queue full, click dropped");
            }
            Err(TrySendError::Closed(event)) => {
                metrics::counter!("link_clicks_dropped_total").increment(1);
                tracing::error!(code = %event.code, "Click queue closed, click dropped");
            }
        }
    }

    /// Whether the click worker has stopped receiving.
    pub fn click_queue_closed(&self) -> bool {
        self.click_sender.is_closed()
    }

    /// Free slots currently available in the click queue.
    pub fn click_queue_capacity(&self) -> usize {
        self.click_sender.capacity()
    }
}
