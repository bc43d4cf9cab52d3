use crate::application::search::{resolve_window, SearchUseCase};
use crate::domain::entities::record::{Record, SearchOutcome};
use crate::domain::entities::search_spec::SearchSpec;
use crate::domain::error::DomainError;
use crate::domain::values::frequency::{Bucket, Frequency};
use crate::domain::values::resource_kind::ResourceKind;
use crate::domain::values::time_window::{PartialWindow, TimeWindow};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Smallest number of distinct days a full sample is spread over.
pub const MIN_SAMPLE_DAYS: usize = 10;

/// Draws records spread uniformly over the calendar days between the first
/// and last day with data, instead of the densest stretch of the window.
/// Empty days in between are visited and yield nothing.
pub struct SampleUseCase {
    search: Arc<SearchUseCase>,
}

impl SampleUseCase {
    pub fn new(search: Arc<SearchUseCase>) -> Self {
        Self { search }
    }

    /// Up to `count` records, at most `count / MIN_SAMPLE_DAYS` from any one
    /// day. `seed` makes the day order reproducible.
    pub async fn sample(
        &self,
        kind: ResourceKind,
        spec: &SearchSpec,
        count: usize,
        seed: Option<u64>,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, DomainError> {
        if count == 0 {
            return Ok(SearchOutcome::default());
        }
        let window = resolve_window(&spec.window, Utc::now())?;
        let buckets = match self
            .search
            .histogram(kind, &spec.predicate, &window, Frequency::Day, cancel)
            .await?
        {
            Some(buckets) => buckets,
            None => return Ok(SearchOutcome::default().with_degraded(1)),
        };

        let mut days = spanned_days(&buckets);
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        days.shuffle(&mut rng);

        let per_day = (count / MIN_SAMPLE_DAYS).max(1);
        let mut results: Vec<Record> = Vec::new();
        let mut degraded = 0;

        for day in days {
            if results.len() >= count {
                break;
            }
            let Some(day_window) = day_window(day, &window) else {
                continue;
            };
            let day_spec = SearchSpec {
                window: PartialWindow::from(day_window),
                count: Some(per_day),
                ..spec.clone()
            };
            let outcome = self.search.search(kind, &day_spec, cancel).await?;
            let partial = outcome.partial;
            degraded += outcome.degraded_windows;
            results.extend(outcome.records);
            if partial {
                results.truncate(count);
                return Ok(SearchOutcome::partial(results).with_degraded(degraded));
            }
        }

        results.truncate(count);
        Ok(SearchOutcome::complete(results).with_degraded(degraded))
    }
}

/// Every calendar day (UTC) from the first bucket to the last, inclusive.
pub fn spanned_days(buckets: &[Bucket]) -> Vec<NaiveDate> {
    let (Some(first), Some(last)) = (buckets.first(), buckets.last()) else {
        return Vec::new();
    };
    let (Some(start), Some(end)) = (bucket_date(first), bucket_date(last)) else {
        return Vec::new();
    };
    start.iter_days().take_while(|d| *d <= end).collect()
}

fn bucket_date(bucket: &Bucket) -> Option<NaiveDate> {
    DateTime::from_timestamp(bucket.key, 0).map(|dt| dt.date_naive())
}

/// The day as a window, clipped to `bounds`; `None` if they do not overlap.
fn day_window(day: NaiveDate, bounds: &TimeWindow) -> Option<TimeWindow> {
    let start = day.and_hms_opt(0, 0, 0)?.and_utc();
    let end = start + Duration::days(1);
    let start = start.max(bounds.start());
    let end = end.min(bounds.end());
    if start >= end {
        return None;
    }
    TimeWindow::new(start, end).ok()
}
