use crate::domain::values::resource_kind::ResourceKind;
use crate::domain::values::time_window::TimeWindow;
use thiserror::Error;

/// Failure of a single remote call, after any retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// DNS, connect, socket timeout. Never retried.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success status other than 429. Never retried.
    #[error("HTTP {status} {reason}")]
    Protocol { status: u16, reason: String },

    #[error("Rate limited on all {attempts} attempts")]
    RateLimitExhausted { attempts: u32 },

    /// Success status with a body that is not the expected JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Request cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{kind} search failed in window {window}: {source}")]
    Fetch {
        kind: ResourceKind,
        window: TimeWindow,
        #[source]
        source: FetchError,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Search cancelled")]
    Cancelled,
}

impl DomainError {
    /// Attach the collection and window a transport failure happened in.
    pub fn fetch(kind: ResourceKind, window: TimeWindow, source: FetchError) -> Self {
        match source {
            FetchError::Cancelled => DomainError::Cancelled,
            source => DomainError::Fetch {
                kind,
                window,
                source,
            },
        }
    }
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::Io(e.to_string())
    }
}

impl From<String> for DomainError {
    fn from(s: String) -> Self {
        DomainError::InvalidInput(s)
    }
}

impl From<&str> for DomainError {
    fn from(s: &str) -> Self {
        DomainError::InvalidInput(s.to_string())
    }
}
