use crate::config::ScanConfig;
use crate::crawlers::fetcher::{FetchError, PageFetcher};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Fetches candidate pages over HTTP(S), one request at a time
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    /// Build a fetcher using the page user agent and timeout from `config`
    pub fn from_config(config: &ScanConfig) -> Result<Self, reqwest::Error> {
        Self::new(&config.user_agent, config.timeout())
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        ::log::debug!("Fetching page: {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        ::log::trace!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
