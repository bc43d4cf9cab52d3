//! Match counting through the aggregation feature.
//!
//! The service has no exact-count query that works reliably, so counts are
//! the sum of per-month `doc_count` buckets over the window. This is an
//! approximation; a missing or malformed aggregation payload degrades to a
//! count of zero and is reported, not repaired.

use super::params::aggregation_params;
use super::transport::Transport;
use crate::domain::error::FetchError;
use crate::domain::ports::observer::{SearchEvent, SearchObserver};
use crate::domain::values::count_estimate::CountEstimate;
use crate::domain::values::frequency::{Bucket, Frequency};
use crate::domain::values::predicate::Predicate;
use crate::domain::values::resource_kind::ResourceKind;
use crate::domain::values::sort::CREATED_UTC;
use crate::domain::values::time_window::TimeWindow;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct Counter {
    transport: Transport,
    observer: Arc<dyn SearchObserver>,
    base_url: String,
}

impl Counter {
    pub fn new(transport: Transport, observer: Arc<dyn SearchObserver>, base_url: String) -> Self {
        Self {
            transport,
            observer,
            base_url,
        }
    }

    /// Sum of monthly buckets. Only meaningful for windows well over a day;
    /// narrower windows rely on the per-call cap check instead.
    pub async fn count(
        &self,
        kind: ResourceKind,
        predicate: &Predicate,
        window: &TimeWindow,
        cancel: &CancellationToken,
    ) -> Result<CountEstimate, FetchError> {
        let estimate = match self
            .histogram(kind, predicate, window, Frequency::Month, cancel)
            .await?
        {
            Some(buckets) => CountEstimate::exact(sum_buckets(&buckets)),
            None => CountEstimate::unavailable(),
        };
        if !estimate.degraded {
            self.observer.on_event(&SearchEvent::Counted {
                kind,
                window: *window,
                total: estimate.total,
            });
        }
        Ok(estimate)
    }

    pub async fn histogram(
        &self,
        kind: ResourceKind,
        predicate: &Predicate,
        window: &TimeWindow,
        frequency: Frequency,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<Bucket>>, FetchError> {
        let endpoint = super::endpoint(&self.base_url, kind);
        let params = aggregation_params(kind, predicate, window, frequency);
        let body = self.transport.fetch(&endpoint, &params, cancel).await?;

        match parse_buckets(&body) {
            Ok(buckets) => Ok(Some(buckets)),
            Err(reason) => {
                self.observer.on_event(&SearchEvent::CountUnavailable {
                    kind,
                    window: *window,
                    reason,
                });
                Ok(None)
            }
        }
    }
}

/// Buckets under `aggs.created_utc`, or why they could not be read.
pub fn parse_buckets(body: &Value) -> Result<Vec<Bucket>, String> {
    let items = body
        .get("aggs")
        .ok_or("response has no aggs")?
        .get(CREATED_UTC)
        .ok_or("aggs has no created_utc")?
        .as_array()
        .ok_or("aggs.created_utc is not an array")?;

    items
        .iter()
        .map(|item| {
            serde_json::from_value::<Bucket>(item.clone())
                .map_err(|e| format!("malformed bucket {item}: {e}"))
        })
        .collect()
}

pub fn sum_buckets(buckets: &[Bucket]) -> u64 {
    buckets.iter().map(|b| b.doc_count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sum_of_monthly_buckets() {
        let body = json!({
            "aggs": { "created_utc": [
                { "key": 1577836800, "doc_count": 1200 },
                { "key": 1580515200, "doc_count": 1300 }
            ]},
            "data": []
        });
        let buckets = parse_buckets(&body).unwrap();
        assert_eq!(buckets.len(), 2);
        assert_eq!(sum_buckets(&buckets), 2500);
    }

    #[test]
    fn test_missing_aggs_is_reported() {
        let err = parse_buckets(&json!({ "data": [] })).unwrap_err();
        assert!(err.contains("no aggs"));
    }

    #[test]
    fn test_malformed_bucket_is_reported() {
        let body = json!({ "aggs": { "created_utc": [ { "key": 1, "doc_count": "many" } ] } });
        assert!(parse_buckets(&body).is_err());
    }

    #[test]
    fn test_empty_bucket_list_counts_zero() {
        let body = json!({ "aggs": { "created_utc": [] } });
        assert_eq!(sum_buckets(&parse_buckets(&body).unwrap()), 0);
    }
}
