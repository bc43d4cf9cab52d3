use crate::domain::error::FetchError;
use std::time::Duration;

/// Raw outcome of one GET, before any status interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
    pub elapsed: Duration,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }
}

/// A single HTTP GET. Implementations report only transport-level failures
/// (`FetchError::Network`); every received status comes back as a response.
#[async_trait::async_trait]
pub trait HttpPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}
