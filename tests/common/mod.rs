//! Shared test helpers: an in-memory archive backend, scripted HTTP ports
//! and an event-recording observer.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use pushshift_search::config::SearchConfig;
use pushshift_search::domain::entities::record::Record;
use pushshift_search::domain::entities::search_spec::SearchSpec;
use pushshift_search::domain::error::FetchError;
use pushshift_search::domain::ports::http_port::{HttpPort, HttpResponse};
use pushshift_search::domain::ports::observer::{SearchEvent, SearchObserver};
use pushshift_search::domain::ports::search_backend::SearchBackend;
use pushshift_search::domain::values::count_estimate::CountEstimate;
use pushshift_search::domain::values::frequency::{Bucket, Frequency};
use pushshift_search::domain::values::predicate::Predicate;
use pushshift_search::domain::values::resource_kind::ResourceKind;
use pushshift_search::domain::values::time_window::TimeWindow;
use serde_json::json;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

pub fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeWindow {
    TimeWindow::new(start, end).unwrap()
}

pub fn record(id: &str, created_utc: i64, author: &str) -> Record {
    let value = json!({
        "id": id,
        "created_utc": created_utc,
        "author": author,
        "body": format!("post {id}"),
    });
    match value {
        serde_json::Value::Object(m) => m,
        _ => unreachable!(),
    }
}

/// `n` records spaced evenly over `[start, end)`.
pub fn spread(
    prefix: &str,
    n: usize,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<Record> {
    let span = (end - start).num_seconds();
    let step = span / n as i64;
    (0..n)
        .map(|i| {
            let ts = start.timestamp() + step * i as i64;
            record(&format!("{prefix}{i}"), ts, &format!("user{}", i % 7))
        })
        .collect()
}

pub fn created(r: &Record) -> i64 {
    r["created_utc"].as_i64().unwrap()
}

pub fn config(cap: usize) -> SearchConfig {
    SearchConfig {
        per_call_cap: cap,
        backoff_base: Duration::from_millis(10),
        ..SearchConfig::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Count(ResourceKind, TimeWindow),
    Histogram(ResourceKind, TimeWindow),
    Fetch(ResourceKind, TimeWindow, usize),
}

/// In-memory archive. Counts are exact; fetches honour size and
/// `created_utc` sort direction. Every call is logged.
#[derive(Default)]
pub struct FakeBackend {
    data: BTreeMap<&'static str, Vec<Record>>,
    calls: Mutex<Vec<Call>>,
    /// 1-based fetch call that fails with HTTP 500.
    pub fail_fetch_call: Option<usize>,
    /// Cancel this token once this many fetches have completed.
    pub cancel_after_fetches: Option<(usize, CancellationToken)>,
    /// Report every count and histogram as unavailable.
    pub degraded_counts: bool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: ResourceKind, mut records: Vec<Record>) -> Self {
        records.sort_by_key(created);
        self.data.insert(key(kind), records);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Count(..)))
            .count()
    }

    pub fn fetch_calls(&self) -> Vec<(TimeWindow, usize)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Fetch(_, w, size) => Some((w, size)),
                _ => None,
            })
            .collect()
    }

    fn matching(
        &self,
        kind: ResourceKind,
        predicate: &Predicate,
        window: &TimeWindow,
    ) -> Vec<Record> {
        let start = window.start().timestamp();
        let end = window.end().timestamp();
        self.data
            .get(key(kind))
            .map(|records| {
                records
                    .iter()
                    .filter(|r| created(r) >= start && created(r) < end)
                    .filter(|r| {
                        predicate.authors.is_empty()
                            || predicate
                                .authors
                                .iter()
                                .any(|a| r["author"].as_str() == Some(a.as_str()))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn key(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Submissions => "submissions",
        ResourceKind::Comments => "comments",
    }
}

#[async_trait::async_trait]
impl SearchBackend for FakeBackend {
    async fn count(
        &self,
        kind: ResourceKind,
        predicate: &Predicate,
        window: &TimeWindow,
        cancel: &CancellationToken,
    ) -> Result<CountEstimate, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        self.calls.lock().unwrap().push(Call::Count(kind, *window));
        if self.degraded_counts {
            return Ok(CountEstimate::unavailable());
        }
        let total = self.matching(kind, predicate, window).len() as u64;
        Ok(CountEstimate::exact(total))
    }

    async fn histogram(
        &self,
        kind: ResourceKind,
        predicate: &Predicate,
        window: &TimeWindow,
        _frequency: Frequency,
        _cancel: &CancellationToken,
    ) -> Result<Option<Vec<Bucket>>, FetchError> {
        self.calls.lock().unwrap().push(Call::Histogram(kind, *window));
        if self.degraded_counts {
            return Ok(None);
        }
        let mut days: BTreeMap<i64, u64> = BTreeMap::new();
        for r in self.matching(kind, predicate, window) {
            let day = created(&r).div_euclid(86_400) * 86_400;
            *days.entry(day).or_default() += 1;
        }
        Ok(Some(
            days.into_iter()
                .map(|(key, doc_count)| Bucket { key, doc_count })
                .collect(),
        ))
    }

    async fn fetch(
        &self,
        kind: ResourceKind,
        spec: &SearchSpec,
        window: &TimeWindow,
        size: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<Record>, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call::Fetch(kind, *window, size));
            calls.iter().filter(|c| matches!(c, Call::Fetch(..))).count()
        };
        if self.fail_fetch_call == Some(n) {
            return Err(FetchError::Protocol {
                status: 500,
                reason: "Internal Server Error".into(),
            });
        }

        let mut records = self.matching(kind, &spec.predicate, window);
        if spec.is_newest_first() {
            records.reverse();
        }
        records.truncate(size);

        if let Some((after, token)) = &self.cancel_after_fetches {
            if n >= *after {
                token.cancel();
            }
        }
        Ok(records)
    }
}

/// Collects every event for later inspection.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<SearchEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<SearchEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn backoff_delays(&self) -> Vec<Duration> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SearchEvent::RateLimited { delay, .. } => Some(delay),
                _ => None,
            })
            .collect()
    }
}

impl SearchObserver for RecordingObserver {
    fn on_event(&self, event: &SearchEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

pub fn response(status: u16, body: &str) -> HttpResponse {
    let reason = match status {
        200 => "OK",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "",
    };
    HttpResponse {
        status,
        reason: reason.into(),
        body: body.into(),
        elapsed: Duration::from_millis(5),
    }
}

/// Replays queued responses in order, then repeats `fallback` forever.
pub struct ScriptedHttp {
    script: Mutex<VecDeque<Result<HttpResponse, FetchError>>>,
    fallback: Option<Result<HttpResponse, FetchError>>,
    urls: Mutex<Vec<String>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedHttp {
    pub fn new(script: Vec<Result<HttpResponse, FetchError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: None,
            urls: Mutex::new(Vec::new()),
            delay: None,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn always(resp: Result<HttpResponse, FetchError>) -> Self {
        Self {
            fallback: Some(resp),
            ..Self::new(vec![])
        }
    }

    /// Each request takes `delay` of (tokio) time.
    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    pub fn requests(&self) -> usize {
        self.urls.lock().unwrap().len()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl HttpPort for ScriptedHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.urls.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(resp) => resp,
            None => self
                .fallback
                .clone()
                .unwrap_or_else(|| Err(FetchError::Network("script exhausted".into()))),
        }
    }
}

/// Answers archive URLs from in-memory records: honours `after` (exclusive),
/// `before`, `size`, `sort` and `aggs`.
pub struct ArchiveHttp {
    records: Vec<Record>,
    urls: Mutex<Vec<String>>,
}

impl ArchiveHttp {
    pub fn new(mut records: Vec<Record>) -> Self {
        records.sort_by_key(created);
        Self {
            records,
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    pub fn aggregation_requests(&self) -> usize {
        self.urls().iter().filter(|u| u.contains("aggs=")).count()
    }

    pub fn data_requests(&self) -> usize {
        self.urls().iter().filter(|u| !u.contains("aggs=")).count()
    }
}

pub fn query_param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    url.split_once('?')?
        .1
        .split('&')
        .filter_map(|kv| kv.split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

fn int_param(url: &str, name: &str) -> Option<i64> {
    query_param(url, name).and_then(|v| v.parse().ok())
}

#[async_trait::async_trait]
impl HttpPort for ArchiveHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.urls.lock().unwrap().push(url.to_string());
        let after = int_param(url, "after").unwrap_or(i64::MIN);
        let before = int_param(url, "before").unwrap_or(i64::MAX);
        let mut hits: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| created(r) > after && created(r) < before)
            .collect();

        let body = if query_param(url, "aggs").is_some() {
            let bucket = json!({ "key": after + 1, "doc_count": hits.len() });
            json!({ "aggs": { "created_utc": [bucket] }, "data": [] })
        } else {
            if query_param(url, "sort") == Some("desc") {
                hits.reverse();
            }
            let size = int_param(url, "size").unwrap_or(25);
            hits.truncate(size as usize);
            json!({ "data": hits })
        };
        Ok(response(200, &body.to_string()))
    }
}
