//! Link creation, allocation and retrieval service.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{DEFAULT_OPERATION_TIMEOUT, with_deadline};
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{
    CodeGenerator, DEFAULT_CODE_LENGTH, is_reserved_code, validate_code,
};
use crate::utils::url_normalizer::normalize_url;
use serde_json::json;

/// Number of links returned by [`LinkService::list_recent`] when no limit is given.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Largest page [`LinkService::list_recent`] will return.
pub const MAX_LIST_LIMIT: i64 = 1000;

/// Retry and escalation settings for code allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationPolicy {
    /// Length of the first candidates.
    pub code_length: usize,
    /// Attempts made at `code_length` before escalating.
    pub max_retries: usize,
    /// Escalated lengths tried, one attempt each, after the retries collide.
    pub escalation_steps: usize,
    /// How many times a `Conflict` on insert restarts the whole allocation.
    ///
    /// Each restart means another writer took the code between the check and
    /// the insert. The cap keeps a caller from looping forever under sustained
    /// contention; once reached, creation fails with
    /// [`AppError::AllocationExhausted`] (`reason: insert_conflicts`).
    pub max_conflict_restarts: usize,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            max_retries: 5,
            escalation_steps: 4,
            max_conflict_restarts: 3,
        }
    }
}

impl AllocationPolicy {
    /// Candidate lengths in the order they are attempted.
    ///
    /// With the defaults this is `6, 6, 6, 6, 6, 7, 8, 9, 10`.
    pub fn attempt_lengths(&self) -> impl Iterator<Item = usize> + use<> {
        let base = self.code_length;
        std::iter::repeat_n(base, self.max_retries).chain(base + 1..=base + self.escalation_steps)
    }

    /// Total number of candidates checked per allocation round.
    pub fn attempts_per_round(&self) -> usize {
        self.max_retries + self.escalation_steps
    }
}

/// Service for allocating short codes and managing links.
///
/// Holds only injected handles, so one instance can be shared across any
/// number of concurrent requests.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    generator: Arc<dyn CodeGenerator>,
    policy: AllocationPolicy,
    operation_timeout: Duration,
}

impl LinkService {
    /// Creates a link service with the default allocation policy.
    pub fn new(repository: Arc<dyn LinkRepository>, generator: Arc<dyn CodeGenerator>) -> Self {
        Self {
            repository,
            generator,
            policy: AllocationPolicy::default(),
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_policy(mut self, policy: AllocationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn policy(&self) -> &AllocationPolicy {
        &self.policy
    }

    /// Shortens a URL under a freshly allocated code.
    ///
    /// # Allocation
    ///
    /// Candidates are checked against the store first (see
    /// [`Self::allocate_code`]). That check and the insert are separate
    /// statements, so another writer may take the code in between; the store
    /// then reports [`AppError::Conflict`] and the allocation restarts from
    /// scratch, up to `max_conflict_restarts` times.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is invalid.
    /// Returns [`AppError::AllocationExhausted`] if no free code was found.
    /// Returns [`AppError::RandomSource`] or [`AppError::Storage`] unchanged
    /// from the generator and the store.
    pub async fn create_link(&self, long_url: &str) -> Result<Link, AppError> {
        let long_url = normalize_url(long_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let mut restarts = 0;
        loop {
            let code = self.allocate_code().await?;
            let new_link = NewLink {
                code: code.clone(),
                long_url: long_url.clone(),
            };

            match with_deadline(self.operation_timeout, self.repository.create(new_link)).await {
                Ok(link) => {
                    metrics::counter!("links_created_total").increment(1);
                    tracing::info!(code = %link.code, id = link.id, "Short link created");
                    return Ok(link);
                }
                Err(e) if e.is_conflict() => {
                    metrics::counter!("link_allocation_conflicts_total").increment(1);
                    if restarts >= self.policy.max_conflict_restarts {
                        tracing::error!(%code, restarts, "Allocation lost every insert race");
                        return Err(AppError::exhausted(
                            "Failed to allocate a unique short code",
                            json!({ "reason": "insert_conflicts", "restarts": restarts }),
                        ));
                    }
                    restarts += 1;
                    tracing::warn!(%code, restarts, "Code taken concurrently, restarting allocation");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Finds a code that is not yet allocated.
    ///
    /// Tries `max_retries` candidates at the base length, then one candidate
    /// at each escalated length. Candidates that shadow a fixed route (see
    /// [`crate::utils::code_generator::RESERVED_CODES`]) count as collisions.
    /// The result is only a hint: the insert in [`Self::create_link`] is the
    /// authoritative uniqueness check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AllocationExhausted`] if every candidate exists.
    pub async fn allocate_code(&self) -> Result<String, AppError> {
        for length in self.policy.attempt_lengths() {
            if length > self.policy.code_length {
                metrics::counter!("link_code_escalations_total").increment(1);
            }

            let candidate = self.generator.generate(length)?;

            if !is_reserved_code(&candidate) && !self.exists_unchecked(&candidate).await? {
                return Ok(candidate);
            }

            metrics::counter!("link_code_collisions_total").increment(1);
            tracing::debug!(%candidate, length, "Short code collision");
        }

        metrics::counter!("link_allocation_exhausted_total").increment(1);
        let max_length = self.policy.code_length + self.policy.escalation_steps;
        tracing::error!(
            attempts = self.policy.attempts_per_round(),
            max_length,
            "Short code space exhausted"
        );

        Err(AppError::exhausted(
            "Failed to allocate a unique short code",
            json!({
                "reason": "too_many_collisions",
                "attempts": self.policy.attempts_per_round(),
                "max_length": max_length,
            }),
        ))
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed code.
    /// Returns [`AppError::NotFound`] if no link matches.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        validate_code(code)?;

        with_deadline(self.operation_timeout, self.repository.find_by_code(code))
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    /// Retrieves a link by its surrogate id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn get_link_by_id(&self, id: i64) -> Result<Link, AppError> {
        with_deadline(self.operation_timeout, self.repository.find_by_id(id))
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))
    }

    /// Lists the newest links.
    ///
    /// `None` means [`DEFAULT_LIST_LIMIT`]; explicit limits are clamped to
    /// `1..=MAX_LIST_LIMIT`.
    pub async fn list_recent(&self, limit: Option<i64>) -> Result<Vec<Link>, AppError> {
        let limit = limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);

        with_deadline(self.operation_timeout, self.repository.list_recent(limit)).await
    }

    /// Points an existing code at a new target URL.
    ///
    /// The new URL goes through the same normalization as creation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed code or URL.
    /// Returns [`AppError::NotFound`] if the code is not allocated.
    pub async fn update_link_target(&self, code: &str, new_url: &str) -> Result<Link, AppError> {
        validate_code(code)?;

        let new_url = normalize_url(new_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let link = with_deadline(
            self.operation_timeout,
            self.repository.update_long_url(code, &new_url),
        )
        .await?;

        tracing::info!(code = %link.code, "Short link target updated");
        Ok(link)
    }

    /// Reports whether a short code is allocated.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed code.
    /// Returns [`AppError::Storage`] if the read fails.
    pub async fn link_exists(&self, code: &str) -> Result<bool, AppError> {
        validate_code(code)?;
        self.exists_unchecked(code).await
    }

    /// Verifies the store is reachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        with_deadline(self.operation_timeout, self.repository.ping()).await
    }

    async fn exists_unchecked(&self, code: &str) -> Result<bool, AppError> {
        with_deadline(self.operation_timeout, self.repository.exists(code)).await
    }
}
