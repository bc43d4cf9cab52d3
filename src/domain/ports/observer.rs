use crate::domain::values::resource_kind::ResourceKind;
use crate::domain::values::time_window::TimeWindow;
use std::time::Duration;

/// Progress and diagnostics emitted while a search runs.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    RequestIssued {
        url: String,
        attempt: u32,
    },
    ResponseReceived {
        status: u16,
        reason: String,
        elapsed: Duration,
    },
    RateLimited {
        attempt: u32,
        delay: Duration,
    },
    RateLimitExhausted {
        attempts: u32,
    },
    Counted {
        kind: ResourceKind,
        window: TimeWindow,
        total: u64,
    },
    /// Aggregation payload missing or malformed; the count fell back to zero.
    CountUnavailable {
        kind: ResourceKind,
        window: TimeWindow,
        reason: String,
    },
    Bisect {
        kind: ResourceKind,
        window: TimeWindow,
        count: u64,
    },
    Download {
        kind: ResourceKind,
        window: TimeWindow,
        size: usize,
    },
    /// Window over the per-call cap but too narrow to split further.
    Unsplittable {
        kind: ResourceKind,
        window: TimeWindow,
        count: u64,
    },
    /// Request satisfied; pending windows dropped without any call.
    Pruned {
        kind: ResourceKind,
        skipped: usize,
    },
    Cancelled {
        kind: ResourceKind,
        collected: usize,
    },
}

pub trait SearchObserver: Send + Sync {
    fn on_event(&self, event: &SearchEvent);
}
