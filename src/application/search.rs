use crate::application::range_search::{on_cancel, RangeSearcher};
use crate::config::SearchConfig;
use crate::domain::entities::record::SearchOutcome;
use crate::domain::entities::search_spec::SearchSpec;
use crate::domain::error::{DomainError, FetchError};
use crate::domain::ports::observer::SearchObserver;
use crate::domain::ports::search_backend::SearchBackend;
use crate::domain::values::cancel_policy::CancelPolicy;
use crate::domain::values::count_estimate::CountEstimate;
use crate::domain::values::frequency::{Bucket, Frequency};
use crate::domain::values::predicate::Predicate;
use crate::domain::values::resource_kind::ResourceKind;
use crate::domain::values::time_window::{PartialWindow, TimeWindow};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Entry point for both collections: normalizes the request, then either
/// makes one direct call or hands over to the range searcher.
pub struct SearchUseCase {
    backend: Arc<dyn SearchBackend>,
    observer: Arc<dyn SearchObserver>,
    range_searcher: RangeSearcher,
    per_call_cap: usize,
    max_results: usize,
    cancel_policy: CancelPolicy,
}

impl SearchUseCase {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        observer: Arc<dyn SearchObserver>,
        config: &SearchConfig,
    ) -> Self {
        Self {
            range_searcher: RangeSearcher::new(
                backend.clone(),
                observer.clone(),
                config.per_call_cap,
                config.cancel_policy,
            ),
            backend,
            observer,
            per_call_cap: config.per_call_cap.max(1),
            max_results: config.max_results,
            cancel_policy: config.cancel_policy,
        }
    }

    pub async fn search_submissions(
        &self,
        spec: &SearchSpec,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, DomainError> {
        self.search(ResourceKind::Submissions, spec, cancel).await
    }

    pub async fn search_comments(
        &self,
        spec: &SearchSpec,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, DomainError> {
        self.search(ResourceKind::Comments, spec, cancel).await
    }

    pub async fn search(
        &self,
        kind: ResourceKind,
        spec: &SearchSpec,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, DomainError> {
        spec.predicate.validate_for(kind)?;
        let desired = self.desired_count(spec.count);
        let window = resolve_window(&spec.window, Utc::now())?;

        if desired == 0 {
            return Ok(SearchOutcome::default());
        }
        if desired > self.per_call_cap {
            return self
                .range_searcher
                .search(kind, spec, desired, window, cancel)
                .await;
        }

        if cancel.is_cancelled() {
            return on_cancel(self.cancel_policy, self.observer.as_ref(), kind, Vec::new());
        }
        match self.backend.fetch(kind, spec, &window, desired, cancel).await {
            Ok(mut records) => {
                records.truncate(desired);
                Ok(SearchOutcome::complete(records))
            }
            Err(FetchError::Cancelled) => {
                on_cancel(self.cancel_policy, self.observer.as_ref(), kind, Vec::new())
            }
            Err(e) => Err(DomainError::fetch(kind, window, e)),
        }
    }

    /// Approximate match count over the window.
    pub async fn count(
        &self,
        kind: ResourceKind,
        predicate: &Predicate,
        window: &PartialWindow,
        cancel: &CancellationToken,
    ) -> Result<CountEstimate, DomainError> {
        predicate.validate_for(kind)?;
        let window = resolve_window(window, Utc::now())?;
        self.backend
            .count(kind, predicate, &window, cancel)
            .await
            .map_err(|e| DomainError::fetch(kind, window, e))
    }

    pub async fn histogram(
        &self,
        kind: ResourceKind,
        predicate: &Predicate,
        window: &TimeWindow,
        frequency: Frequency,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<Bucket>>, DomainError> {
        predicate.validate_for(kind)?;
        self.backend
            .histogram(kind, predicate, window, frequency, cancel)
            .await
            .map_err(|e| DomainError::fetch(kind, *window, e))
    }

    /// `None` becomes the sanity ceiling; explicit counts are clamped to it.
    pub fn desired_count(&self, requested: Option<usize>) -> usize {
        requested.map_or(self.max_results, |n| n.min(self.max_results))
    }
}

pub fn resolve_window(
    window: &PartialWindow,
    now: DateTime<Utc>,
) -> Result<TimeWindow, DomainError> {
    window.resolve(now).map_err(DomainError::InvalidInput)
}
