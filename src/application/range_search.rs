use crate::domain::entities::record::{Record, SearchOutcome};
use crate::domain::entities::search_spec::SearchSpec;
use crate::domain::error::{DomainError, FetchError};
use crate::domain::ports::observer::{SearchEvent, SearchObserver};
use crate::domain::ports::search_backend::SearchBackend;
use crate::domain::values::cancel_policy::CancelPolicy;
use crate::domain::values::resource_kind::ResourceKind;
use crate::domain::values::time_window::TimeWindow;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Fetches up to `desired` records from a window of any size by bisecting
/// it until each piece fits in one call.
///
/// Windows are processed depth-first from an explicit stack, earlier half
/// first (later half first for newest-first sorts). The budget of the
/// window being processed is always `desired - collected`, which is the
/// count a recursive left-then-right bisection would hand it. Once the
/// budget hits zero every pending window is dropped without a call.
pub struct RangeSearcher {
    backend: Arc<dyn SearchBackend>,
    observer: Arc<dyn SearchObserver>,
    per_call_cap: usize,
    cancel_policy: CancelPolicy,
}

impl RangeSearcher {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        observer: Arc<dyn SearchObserver>,
        per_call_cap: usize,
        cancel_policy: CancelPolicy,
    ) -> Self {
        Self {
            backend,
            observer,
            per_call_cap: per_call_cap.max(1),
            cancel_policy,
        }
    }

    pub async fn search(
        &self,
        kind: ResourceKind,
        spec: &SearchSpec,
        desired: usize,
        window: TimeWindow,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, DomainError> {
        let mut collected: Vec<Record> = Vec::new();
        if desired == 0 {
            return Ok(SearchOutcome::complete(collected));
        }

        let newest_first = spec.is_newest_first();
        let cap = self.per_call_cap as u64;
        let mut degraded = 0;
        let mut pending = vec![window];

        while let Some(window) = pending.pop() {
            if cancel.is_cancelled() {
                return self.cancelled(kind, collected, degraded);
            }
            if window.is_empty() {
                continue;
            }
            let remaining = desired - collected.len();

            let count = match self
                .backend
                .count(kind, &spec.predicate, &window, cancel)
                .await
            {
                Ok(count) => count,
                Err(FetchError::Cancelled) => return self.cancelled(kind, collected, degraded),
                Err(e) => return Err(DomainError::fetch(kind, window, e)),
            };
            if count.degraded {
                degraded += 1;
            }
            if count.is_zero() {
                continue;
            }

            if count.total > cap {
                if window.can_split() {
                    self.observer.on_event(&SearchEvent::Bisect {
                        kind,
                        window,
                        count: count.total,
                    });
                    let (earlier, later) = window.split();
                    if newest_first {
                        pending.push(earlier);
                        pending.push(later);
                    } else {
                        pending.push(later);
                        pending.push(earlier);
                    }
                    continue;
                }
                self.observer.on_event(&SearchEvent::Unsplittable {
                    kind,
                    window,
                    count: count.total,
                });
            }

            let size = (remaining as u64).min(count.total).min(cap) as usize;
            self.observer
                .on_event(&SearchEvent::Download { kind, window, size });

            let mut page = match self.backend.fetch(kind, spec, &window, size, cancel).await {
                Ok(page) => page,
                Err(FetchError::Cancelled) => return self.cancelled(kind, collected, degraded),
                Err(e) => return Err(DomainError::fetch(kind, window, e)),
            };
            page.truncate(remaining);
            collected.extend(page);

            if collected.len() >= desired {
                if !pending.is_empty() {
                    self.observer.on_event(&SearchEvent::Pruned {
                        kind,
                        skipped: pending.len(),
                    });
                }
                break;
            }
        }

        Ok(SearchOutcome::complete(collected).with_degraded(degraded))
    }

    fn cancelled(
        &self,
        kind: ResourceKind,
        collected: Vec<Record>,
        degraded: usize,
    ) -> Result<SearchOutcome, DomainError> {
        on_cancel(self.cancel_policy, self.observer.as_ref(), kind, collected)
            .map(|outcome| outcome.with_degraded(degraded))
    }
}

/// Apply the cancellation policy to whatever was collected so far.
pub(crate) fn on_cancel(
    policy: CancelPolicy,
    observer: &dyn SearchObserver,
    kind: ResourceKind,
    collected: Vec<Record>,
) -> Result<SearchOutcome, DomainError> {
    observer.on_event(&SearchEvent::Cancelled {
        kind,
        collected: collected.len(),
    });
    match policy {
        CancelPolicy::Fail => Err(DomainError::Cancelled),
        CancelPolicy::ReturnPartial => Ok(SearchOutcome::partial(collected)),
    }
}
