use std::time::Duration;
use reqwest::Client;
use nw_core::{Error, Result};
use tracing::warn;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const USER_AGENT: &str = concat!("newswire/", env!("CARGO_PKG_VERSION"));

/// Plain GET with a bounded timeout. No caching and no retries: a failed
/// fetch is dropped and the next cycle tries again.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn try_fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.network_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Network(format!("{} answered with status {}", url, status)));
        }

        // Decodes with the charset from Content-Type, UTF-8 when absent.
        response.text().await.map_err(|e| self.network_error(url, e))
    }

    /// Like [`Fetcher::try_fetch`], but logs the failure and returns `None`.
    pub async fn fetch(&self, url: &str) -> Option<String> {
        match self.try_fetch(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(kind = "network", url, error = %e, "fetch failed");
                None
            }
        }
    }

    fn network_error(&self, url: &str, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Network(format!("{} timed out after {:?}", url, self.timeout))
        } else {
            Error::Network(format!("{}: {}", url, e))
        }
    }
}
