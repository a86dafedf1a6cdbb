#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{Barrier, mpsc};
use tokio::task::JoinHandle;
use short_links::application::services::{
    AllocationPolicy, DEFAULT_OPERATION_TIMEOUT, LinkService, RedirectService,
};
use short_links::domain::click_event::ClickEvent;
use short_links::domain::click_worker::run_click_worker;
use short_links::domain::entities::{Link, NewLink};
use short_links::domain::repositories::LinkRepository;
use short_links::error::AppError;
use short_links::infrastructure::persistence::InMemoryLinkRepository;
use short_links::state::AppState;
use short_links::utils::code_generator::{CodeGenerator, RandomCodeGenerator};

pub const TEST_BASE_URL: &str = "http://sho.rt";

/// Services over an in-memory store, with the click queue receiver handed
/// back so a test can decide whether to run the worker.
pub struct TestApp {
    pub repository: Arc<InMemoryLinkRepository>,
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub click_rx: mpsc::Receiver<ClickEvent>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_generator(Arc::new(RandomCodeGenerator::new()))
    }

    pub fn with_generator(generator: Arc<dyn CodeGenerator>) -> Self {
        Self::with_parts(Arc::new(InMemoryLinkRepository::new()), generator, 64)
    }

    pub fn with_parts(
        repository: Arc<InMemoryLinkRepository>,
        generator: Arc<dyn CodeGenerator>,
        click_capacity: usize,
    ) -> Self {
        let (click_tx, click_rx) = mpsc::channel(click_capacity);
        let link_service = LinkService::new(repository.clone(), generator);
        let redirect_service = RedirectService::new(repository.clone(), click_tx);

        Self {
            repository,
            link_service: Arc::new(link_service),
            redirect_service: Arc::new(redirect_service),
            click_rx,
        }
    }

    pub fn state(&self) -> AppState {
        AppState::new(
            self.link_service.clone(),
            self.redirect_service.clone(),
            TEST_BASE_URL,
        )
    }

    /// Starts the click worker. The returned handle finishes once every
    /// sender (held by the redirect service) is dropped.
    pub fn spawn_worker(self) -> (Arc<InMemoryLinkRepository>, AppState, JoinHandle<()>) {
        let state = self.state();
        let worker = tokio::spawn(run_click_worker(
            self.click_rx,
            self.repository.clone(),
            3,
            DEFAULT_OPERATION_TIMEOUT,
        ));
        (self.repository, state, worker)
    }
}

/// Returns the given codes in order, then falls back to random ones.
pub struct SequenceCodeGenerator {
    codes: Mutex<VecDeque<String>>,
    lengths: Mutex<Vec<usize>>,
}

impl SequenceCodeGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            lengths: Mutex::new(Vec::new()),
        }
    }

    /// Lengths requested so far, in call order.
    pub fn requested_lengths(&self) -> Vec<usize> {
        self.lengths.lock().unwrap().clone()
    }
}

impl CodeGenerator for SequenceCodeGenerator {
    fn generate(&self, length: usize) -> Result<String, AppError> {
        self.lengths.lock().unwrap().push(length);
        match self.codes.lock().unwrap().pop_front() {
            Some(code) => Ok(code),
            None => RandomCodeGenerator::new().generate(length),
        }
    }
}

/// Makes the first two existence checks wait for each other, so two
/// allocations see the same free code before either inserts it.
pub struct RacingRepository {
    inner: InMemoryLinkRepository,
    barrier: Barrier,
    gated: Mutex<usize>,
}

impl RacingRepository {
    pub fn new() -> Self {
        Self {
            inner: InMemoryLinkRepository::new(),
            barrier: Barrier::new(2),
            gated: Mutex::new(0),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.len().await
    }
}

#[async_trait]
impl LinkRepository for RacingRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.inner.create(new_link).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        self.inner.find_by_code(code).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        self.inner.find_by_id(id).await
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Link>, AppError> {
        self.inner.list_recent(limit).await
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        let gate = {
            let mut gated = self.gated.lock().unwrap();
            *gated += 1;
            *gated <= 2
        };

        let exists = self.inner.exists(code).await?;
        if gate {
            self.barrier.wait().await;
        }
        Ok(exists)
    }

    async fn increment_clicks(&self, code: &str) -> Result<bool, AppError> {
        self.inner.increment_clicks(code).await
    }

    async fn update_long_url(&self, code: &str, long_url: &str) -> Result<Link, AppError> {
        self.inner.update_long_url(code, long_url).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.inner.ping().await
    }
}

/// Policy with no conflict restarts, for tests that expect the first
/// insert race to surface.
pub fn no_restart_policy() -> AllocationPolicy {
    AllocationPolicy {
        max_conflict_restarts: 0,
        ..AllocationPolicy::default()
    }
}
