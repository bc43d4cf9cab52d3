//! Runtime settings, from defaults overridden by `PUSHSHIFT_*` variables.

use crate::domain::values::cancel_policy::CancelPolicy;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.pushshift.io";
/// Most records the service returns for one request.
pub const DEFAULT_PER_CALL_CAP: usize = 1000;
/// Ceiling on any requested result count.
pub const DEFAULT_MAX_RESULTS: usize = 100_000;
pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 350;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 4;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub base_url: String,
    pub per_call_cap: usize,
    pub max_results: usize,
    /// Retries after the first request when the service answers 429.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub backoff_base: Duration,
    /// Process-wide bound on outstanding requests.
    pub max_in_flight: usize,
    pub timeout: Duration,
    pub cancel_policy: CancelPolicy,
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            per_call_cap: DEFAULT_PER_CALL_CAP,
            max_results: DEFAULT_MAX_RESULTS,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: Duration::from_millis(DEFAULT_BACKOFF_BASE_MS),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cancel_policy: CancelPolicy::Fail,
            user_agent: concat!("pushshift-search/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl SearchConfig {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Unparseable values are ignored and the current setting kept.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("PUSHSHIFT_BASE_URL") {
            if !v.trim().is_empty() {
                self.base_url = v.trim().trim_end_matches('/').to_string();
            }
        }
        if let Some(v) = env_parse::<usize>("PUSHSHIFT_PER_CALL_CAP") {
            self.per_call_cap = v.max(1);
        }
        if let Some(v) = env_parse::<usize>("PUSHSHIFT_MAX_RESULTS") {
            self.max_results = v;
        }
        if let Some(v) = env_parse::<u32>("PUSHSHIFT_MAX_RETRIES") {
            self.max_retries = v;
        }
        if let Some(v) = env_parse::<u64>("PUSHSHIFT_BACKOFF_BASE_MS") {
            self.backoff_base = Duration::from_millis(v);
        }
        if let Some(v) = env_parse::<usize>("PUSHSHIFT_MAX_IN_FLIGHT") {
            self.max_in_flight = v.max(1);
        }
        if let Some(v) = env_parse::<u64>("PUSHSHIFT_TIMEOUT_SECS") {
            self.timeout = Duration::from_secs(v.max(1));
        }
        if let Some(v) = env_parse::<CancelPolicy>("PUSHSHIFT_CANCEL_POLICY") {
            self.cancel_policy = v;
        }
        if let Ok(v) = std::env::var("PUSHSHIFT_USER_AGENT") {
            if !v.trim().is_empty() {
                self.user_agent = v;
            }
        }
        self
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}
