use crate::domain::entities::record::Record;
use crate::domain::entities::search_spec::SearchSpec;
use crate::domain::error::FetchError;
use crate::domain::values::count_estimate::CountEstimate;
use crate::domain::values::frequency::{Bucket, Frequency};
use crate::domain::values::predicate::Predicate;
use crate::domain::values::resource_kind::ResourceKind;
use crate::domain::values::time_window::TimeWindow;
use tokio_util::sync::CancellationToken;

/// The remote archive as seen by the search algorithms.
///
/// Every method is one logical remote call (retries included).
#[async_trait::async_trait]
pub trait SearchBackend: Send + Sync {
    /// Approximate number of matches in `window`. Fatal transport failures
    /// are errors; an unusable aggregation payload is a degraded zero.
    async fn count(
        &self,
        kind: ResourceKind,
        predicate: &Predicate,
        window: &TimeWindow,
        cancel: &CancellationToken,
    ) -> Result<CountEstimate, FetchError>;

    /// Per-bucket counts over `window`. `None` when the aggregation payload
    /// is unusable.
    async fn histogram(
        &self,
        kind: ResourceKind,
        predicate: &Predicate,
        window: &TimeWindow,
        frequency: Frequency,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<Bucket>>, FetchError>;

    /// One data call returning at most `size` records from `window`, using
    /// the spec's predicate, projection and sort. The spec's own window is
    /// ignored.
    async fn fetch(
        &self,
        kind: ResourceKind,
        spec: &SearchSpec,
        window: &TimeWindow,
        size: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<Record>, FetchError>;
}
