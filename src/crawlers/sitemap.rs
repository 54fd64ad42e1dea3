use crate::config::ScanConfig;
use crate::parsers::sitemap::{MalformedSitemap, parse_sitemap_xml};
use reqwest::Client;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

/// Why a sitemap yielded no candidate pages
#[derive(Debug)]
pub enum SitemapError {
    /// Non-success HTTP status, typically a bot block
    Status(u16),
    /// Network failure or timeout
    Request(reqwest::Error),
    /// The body was not parseable XML
    Malformed(MalformedSitemap),
    /// A sitemap index whose entries did not survive the path filter.
    /// Carries the child sitemaps so the user can pick a leaf sitemap.
    IndexOnly { sitemaps: Vec<String> },
}

impl From<reqwest::Error> for SitemapError {
    fn from(err: reqwest::Error) -> Self {
        SitemapError::Request(err)
    }
}

impl From<MalformedSitemap> for SitemapError {
    fn from(err: MalformedSitemap) -> Self {
        SitemapError::Malformed(err)
    }
}

impl fmt::Display for SitemapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SitemapError::Status(code) => write!(
                f,
                "sitemap request returned HTTP {} (the site may be blocking automated access)",
                code
            ),
            SitemapError::Request(e) => write!(f, "sitemap request failed: {}", e),
            SitemapError::Malformed(e) => write!(f, "{}", e),
            SitemapError::IndexOnly { sitemaps } => write!(
                f,
                "this is a sitemap index with {} child sitemaps and none matched; \
                 pass one of the child sitemaps instead",
                sitemaps.len()
            ),
        }
    }
}

impl std::error::Error for SitemapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SitemapError::Request(e) => Some(e),
            SitemapError::Malformed(e) => Some(e),
            _ => None,
        }
    }
}

/// Reads page URLs from a sitemap, optionally keeping only those containing a substring
#[derive(Debug, Clone)]
pub struct SitemapReader {
    client: Client,
    path_filter: Option<String>,
}

impl SitemapReader {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            path_filter: None,
        })
    }

    pub fn from_config(config: &ScanConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(&config.sitemap_user_agent, config.timeout())?
            .with_path_filter(config.path_filter.clone()))
    }

    /// Keep only URLs containing `filter`. Empty filters are ignored.
    pub fn with_path_filter(mut self, filter: Option<String>) -> Self {
        self.path_filter = filter.filter(|f| !f.is_empty());
        self
    }

    /// Fetch `sitemap_url` and return its distinct `<loc>` URLs after filtering.
    ///
    /// Sitemap indexes are not expanded: their entries are returned as-is when
    /// any pass the filter, otherwise [`SitemapError::IndexOnly`] is returned.
    pub async fn read(&self, sitemap_url: &str) -> Result<Vec<String>, SitemapError> {
        ::log::info!("Reading sitemap: {}", sitemap_url);

        let response = self.client.get(sitemap_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            ::log::error!("Sitemap {} returned HTTP {}", sitemap_url, status);
            return Err(SitemapError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let document = parse_sitemap_xml(&body)?;
        let total = document.locs.len();

        let urls = self.filter_locs(&document.locs);
        ::log::info!(
            "Sitemap listed {} URLs, {} kept after filtering",
            total,
            urls.len()
        );

        if document.is_index() {
            if urls.is_empty() {
                return Err(SitemapError::IndexOnly {
                    sitemaps: document.locs,
                });
            }
            ::log::warn!(
                "{} is a sitemap index; its entries are sitemaps, not pages. \
                 Consider passing a child sitemap instead",
                sitemap_url
            );
        }

        Ok(urls)
    }

    /// Apply the path filter and drop duplicates, keeping first-seen order
    pub fn filter_locs(&self, locs: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        locs.iter()
            .filter(|loc| match &self.path_filter {
                Some(filter) => loc.contains(filter.as_str()),
                None => true,
            })
            .filter(|loc| seen.insert(*loc))
            .cloned()
            .collect()
    }
}
