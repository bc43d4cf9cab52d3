pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::authors::{AuthorSet, AuthorsUseCase};
use crate::application::sample::SampleUseCase;
use crate::application::search::SearchUseCase;
use crate::config::SearchConfig;
use crate::domain::entities::record::SearchOutcome;
use crate::domain::entities::search_spec::SearchSpec;
use crate::domain::error::DomainError;
use crate::domain::ports::http_port::HttpPort;
use crate::domain::ports::observer::SearchObserver;
use crate::domain::ports::search_backend::SearchBackend;
use crate::domain::values::count_estimate::CountEstimate;
use crate::domain::values::predicate::Predicate;
use crate::domain::values::resource_kind::ResourceKind;
use crate::domain::values::time_window::{PartialWindow, TimeWindow};
use crate::infrastructure::http::reqwest_http::ReqwestHttp;
use crate::infrastructure::observers::tracing_observer::TracingObserver;
use crate::infrastructure::pushshift::PushshiftBackend;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Handle over the archive. Cheap to clone; every search builds its own
/// call-scoped state, while the request admission limit is process-wide.
#[derive(Clone)]
pub struct PushshiftSearch {
    search_uc: Arc<SearchUseCase>,
    sample_uc: Arc<SampleUseCase>,
    authors_uc: Arc<AuthorsUseCase>,
    config: SearchConfig,
}

impl PushshiftSearch {
    /// Configuration from `PUSHSHIFT_*` variables, HTTP via reqwest,
    /// progress via `tracing`.
    pub fn new() -> Result<Self, DomainError> {
        Self::with_config(SearchConfig::from_env())
    }

    pub fn with_config(config: SearchConfig) -> Result<Self, DomainError> {
        let http: Arc<dyn HttpPort> =
            Arc::new(ReqwestHttp::new(&config.user_agent, config.timeout)?);
        Ok(Self::with_http(http, Arc::new(TracingObserver), config))
    }

    pub fn with_http(
        http: Arc<dyn HttpPort>,
        observer: Arc<dyn SearchObserver>,
        config: SearchConfig,
    ) -> Self {
        let backend: Arc<dyn SearchBackend> =
            Arc::new(PushshiftBackend::new(http, observer.clone(), &config));
        Self::with_backend(backend, observer, config)
    }

    pub fn with_backend(
        backend: Arc<dyn SearchBackend>,
        observer: Arc<dyn SearchObserver>,
        config: SearchConfig,
    ) -> Self {
        let search_uc = Arc::new(SearchUseCase::new(backend, observer, &config));
        Self {
            sample_uc: Arc::new(SampleUseCase::new(search_uc.clone())),
            authors_uc: Arc::new(AuthorsUseCase::new(search_uc.clone())),
            search_uc,
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub async fn search_submissions(
        &self,
        spec: &SearchSpec,
    ) -> Result<SearchOutcome, DomainError> {
        self.search_uc
            .search_submissions(spec, &CancellationToken::new())
            .await
    }

    pub async fn search_comments(&self, spec: &SearchSpec) -> Result<SearchOutcome, DomainError> {
        self.search_uc
            .search_comments(spec, &CancellationToken::new())
            .await
    }

    /// Search that stops when `cancel` fires, per the configured policy.
    pub async fn search(
        &self,
        kind: ResourceKind,
        spec: &SearchSpec,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, DomainError> {
        self.search_uc.search(kind, spec, cancel).await
    }

    pub async fn count(
        &self,
        kind: ResourceKind,
        predicate: &Predicate,
        window: &PartialWindow,
        cancel: &CancellationToken,
    ) -> Result<CountEstimate, DomainError> {
        self.search_uc.count(kind, predicate, window, cancel).await
    }

    pub async fn sample(
        &self,
        kind: ResourceKind,
        spec: &SearchSpec,
        count: usize,
        seed: Option<u64>,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, DomainError> {
        self.sample_uc.sample(kind, spec, count, seed, cancel).await
    }

    pub async fn distinct_authors(
        &self,
        subreddit: &str,
        window: TimeWindow,
        cancel: &CancellationToken,
    ) -> Result<AuthorSet, DomainError> {
        self.authors_uc
            .distinct_authors(subreddit, window, cancel)
            .await
    }
}
