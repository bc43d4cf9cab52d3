use crate::domain::error::{DomainError, FetchError};
use crate::domain::ports::http_port::{HttpPort, HttpResponse};
use std::time::{Duration, Instant};

/// `HttpPort` over a pooled reqwest client.
pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl HttpPort for ReqwestHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let started = Instant::now();
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| network_error(url, e))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| network_error(url, e))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
            body,
            elapsed: started.elapsed(),
        })
    }
}

fn network_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Network(format!("timed out requesting {url}"))
    } else {
        FetchError::Network(format!("{url}: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let timeout = Duration::from_secs(2);
        let http = ReqwestHttp::new("pushshift-search-test", timeout).unwrap();
        let err = http
            .get("http://127.0.0.1:1/reddit/search/comment/")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }

    #[test]
    fn test_invalid_user_agent_is_config_error() {
        let result = ReqwestHttp::new("bad\nagent", Duration::from_secs(2));
        assert!(matches!(result, Err(DomainError::Config(_))));
    }
}
