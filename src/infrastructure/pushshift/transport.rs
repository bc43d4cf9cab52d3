//! Single-endpoint GET with bounded retry on rate limiting.

use super::params::QueryParams;
use crate::config::SearchConfig;
use crate::domain::error::FetchError;
use crate::domain::ports::http_port::{HttpPort, HttpResponse};
use crate::domain::ports::observer::{SearchEvent, SearchObserver};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// How many times a 429 is retried and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based): `base * 2^(retry-1)`.
    pub fn delay(&self, retry: u32) -> Duration {
        let exp = retry.saturating_sub(1).min(20);
        self.base_delay.saturating_mul(1u32 << exp)
    }
}

impl From<&SearchConfig> for RetryPolicy {
    fn from(config: &SearchConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: config.backoff_base,
        }
    }
}

static ADMISSION: OnceLock<(usize, Arc<Semaphore>)> = OnceLock::new();

/// Admission limit shared by every transport in the process. The first
/// caller sizes it; later sizes are ignored.
pub fn shared_admission(max_in_flight: usize) -> Arc<Semaphore> {
    let max_in_flight = max_in_flight.max(1);
    let (size, admission) = ADMISSION.get_or_init(|| {
        (max_in_flight, Arc::new(Semaphore::new(max_in_flight)))
    });
    if *size != max_in_flight {
        tracing::warn!(
            target: "pushshift.transport",
            configured = max_in_flight,
            active = *size,
            "in-flight limit already set for this process, keeping the active one"
        );
    }
    admission.clone()
}

/// Issues GETs through an `HttpPort`, interpreting status codes.
///
/// Only 429 is retried. The admission semaphore is held for one attempt at
/// a time, never across a backoff sleep.
#[derive(Clone)]
pub struct Transport {
    http: Arc<dyn HttpPort>,
    observer: Arc<dyn SearchObserver>,
    admission: Arc<Semaphore>,
    policy: RetryPolicy,
}

impl Transport {
    pub fn new(
        http: Arc<dyn HttpPort>,
        observer: Arc<dyn SearchObserver>,
        policy: RetryPolicy,
        admission: Arc<Semaphore>,
    ) -> Self {
        Self {
            http,
            observer,
            admission,
            policy,
        }
    }

    /// Transport bounded by the process-wide admission limit.
    pub fn from_config(
        http: Arc<dyn HttpPort>,
        observer: Arc<dyn SearchObserver>,
        config: &SearchConfig,
    ) -> Self {
        Self::new(
            http,
            observer,
            RetryPolicy::from(config),
            shared_admission(config.max_in_flight),
        )
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// GET `endpoint` with `params` and parse the JSON body.
    pub async fn fetch(
        &self,
        endpoint: &str,
        params: &QueryParams,
        cancel: &CancellationToken,
    ) -> Result<serde_json::Value, FetchError> {
        let url = params.to_url(endpoint);
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }
            attempt += 1;

            let resp = self.attempt(&url, attempt, cancel).await?;

            if resp.is_success() {
                return serde_json::from_str(&resp.body)
                    .map_err(|e| FetchError::Parse(format!("{url}: {e}")));
            }
            if !resp.is_rate_limited() {
                return Err(FetchError::Protocol {
                    status: resp.status,
                    reason: resp.reason,
                });
            }
            if attempt > self.policy.max_retries {
                self.observer
                    .on_event(&SearchEvent::RateLimitExhausted { attempts: attempt });
                return Err(FetchError::RateLimitExhausted { attempts: attempt });
            }

            let delay = self.policy.delay(attempt);
            self.observer
                .on_event(&SearchEvent::RateLimited { attempt, delay });
            tokio::select! {
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    async fn attempt(
        &self,
        url: &str,
        attempt: u32,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, FetchError> {
        let _permit = tokio::select! {
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            permit = self.admission.acquire() => permit
                .map_err(|_| FetchError::Network("request admission closed".into()))?,
        };

        self.observer.on_event(&SearchEvent::RequestIssued {
            url: url.to_string(),
            attempt,
        });

        let resp = tokio::select! {
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            resp = self.http.get(url) => resp?,
        };

        self.observer.on_event(&SearchEvent::ResponseReceived {
            status: resp.status,
            reason: resp.reason.clone(),
            elapsed: resp.elapsed,
        });
        Ok(resp)
    }
}
