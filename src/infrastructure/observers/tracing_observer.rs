use crate::domain::ports::observer::{SearchEvent, SearchObserver};

/// Forwards search events to `tracing`. Silent unless a subscriber is set.
pub struct TracingObserver;

impl SearchObserver for TracingObserver {
    fn on_event(&self, event: &SearchEvent) {
        match event {
            SearchEvent::RequestIssued { url, attempt } => {
                tracing::debug!(target: "pushshift.transport", %url, attempt, "request issued");
            }
            SearchEvent::ResponseReceived {
                status,
                reason,
                elapsed,
            } => {
                tracing::debug!(
                    target: "pushshift.transport",
                    status,
                    %reason,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "response received"
                );
            }
            SearchEvent::RateLimited { attempt, delay } => {
                tracing::info!(
                    target: "pushshift.transport",
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "rate limited, backing off"
                );
            }
            SearchEvent::RateLimitExhausted { attempts } => {
                tracing::warn!(
                    target: "pushshift.transport",
                    attempts,
                    "rate limit retries exhausted"
                );
            }
            SearchEvent::Counted {
                kind,
                window,
                total,
            } => {
                tracing::debug!(target: "pushshift.count", %kind, %window, total, "counted");
            }
            SearchEvent::CountUnavailable {
                kind,
                window,
                reason,
            } => {
                tracing::warn!(
                    target: "pushshift.count",
                    %kind,
                    %window,
                    %reason,
                    "aggregation unavailable, count treated as zero"
                );
            }
            SearchEvent::Bisect {
                kind,
                window,
                count,
            } => {
                tracing::info!(
                    target: "pushshift.search",
                    %kind,
                    %window,
                    count,
                    "bisecting window"
                );
            }
            SearchEvent::Download { kind, window, size } => {
                tracing::info!(target: "pushshift.search", %kind, %window, size, "downloading");
            }
            SearchEvent::Unsplittable {
                kind,
                window,
                count,
            } => {
                tracing::warn!(
                    target: "pushshift.search",
                    %kind,
                    %window,
                    count,
                    "window too narrow to split, fetching one page"
                );
            }
            SearchEvent::Pruned { kind, skipped } => {
                tracing::debug!(
                    target: "pushshift.search",
                    %kind,
                    skipped,
                    "request satisfied, pending windows skipped"
                );
            }
            SearchEvent::Cancelled { kind, collected } => {
                tracing::info!(target: "pushshift.search", %kind, collected, "search cancelled");
            }
        }
    }
}
