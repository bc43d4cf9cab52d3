pub mod counter;
pub mod params;
pub mod transport;

use crate::config::SearchConfig;
use crate::domain::entities::record::Record;
use crate::domain::entities::search_spec::SearchSpec;
use crate::domain::error::FetchError;
use crate::domain::ports::http_port::HttpPort;
use crate::domain::ports::observer::SearchObserver;
use crate::domain::ports::search_backend::SearchBackend;
use crate::domain::values::count_estimate::CountEstimate;
use crate::domain::values::frequency::{Bucket, Frequency};
use crate::domain::values::predicate::Predicate;
use crate::domain::values::resource_kind::ResourceKind;
use crate::domain::values::time_window::TimeWindow;
use counter::Counter;
use params::fetch_params;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use transport::Transport;

/// `{base}/reddit/search/{submission|comment}/`
pub fn endpoint(base_url: &str, kind: ResourceKind) -> String {
    format!(
        "{}/reddit/search/{}/",
        base_url.trim_end_matches('/'),
        kind.endpoint_segment()
    )
}

/// `SearchBackend` for the Pushshift HTTP API.
pub struct PushshiftBackend {
    transport: Transport,
    counter: Counter,
    base_url: String,
}

impl PushshiftBackend {
    pub fn new(
        http: Arc<dyn HttpPort>,
        observer: Arc<dyn SearchObserver>,
        config: &SearchConfig,
    ) -> Self {
        let transport = Transport::from_config(http, observer.clone(), config);
        Self {
            counter: Counter::new(transport.clone(), observer, config.base_url.clone()),
            transport,
            base_url: config.base_url.clone(),
        }
    }
}

#[async_trait::async_trait]
impl SearchBackend for PushshiftBackend {
    async fn count(
        &self,
        kind: ResourceKind,
        predicate: &Predicate,
        window: &TimeWindow,
        cancel: &CancellationToken,
    ) -> Result<CountEstimate, FetchError> {
        self.counter.count(kind, predicate, window, cancel).await
    }

    async fn histogram(
        &self,
        kind: ResourceKind,
        predicate: &Predicate,
        window: &TimeWindow,
        frequency: Frequency,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<Bucket>>, FetchError> {
        self.counter
            .histogram(kind, predicate, window, frequency, cancel)
            .await
    }

    async fn fetch(
        &self,
        kind: ResourceKind,
        spec: &SearchSpec,
        window: &TimeWindow,
        size: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<Record>, FetchError> {
        let params = fetch_params(kind, spec, window, size);
        let body = self
            .transport
            .fetch(&endpoint(&self.base_url, kind), &params, cancel)
            .await?;
        parse_records(body)
    }
}

/// Records under `data`, in service order.
pub fn parse_records(body: Value) -> Result<Vec<Record>, FetchError> {
    let Value::Object(mut envelope) = body else {
        return Err(FetchError::Parse("response is not a JSON object".into()));
    };
    let Some(Value::Array(items)) = envelope.remove("data") else {
        return Err(FetchError::Parse("response has no data array".into()));
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(record) => Ok(record),
            other => Err(FetchError::Parse(format!("record is not an object: {other}"))),
        })
        .collect()
}
