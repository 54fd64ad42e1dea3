pub mod config;
pub mod crawlers;
pub mod filter;
pub mod inputs;
pub mod matcher;
pub mod parsers;
pub mod results;
pub mod scanner;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::ScanConfig;
pub use inputs::{InputError, Target};
pub use results::{Opportunity, ScanReport};
pub use utils::normalize_url;

use crawlers::{HttpFetcher, PageFetcher, SitemapError, SitemapReader};
use scanner::ScanProgress;
use std::fmt;

/// Where the candidate pages of a scan come from
#[derive(Debug, Clone)]
pub enum CandidateSource {
    /// URL of a sitemap to read `<loc>` entries from
    Sitemap(String),
    /// Pages supplied directly
    List(Vec<String>),
}

/// Errors that stop a scan before any page is checked
#[derive(Debug)]
pub enum ScanError {
    Input(InputError),
    Sitemap(SitemapError),
    /// Candidate source yielded nothing to scan after filtering
    NoCandidates,
    /// An include/exclude pattern failed to compile
    Pattern(regex::Error),
    /// The HTTP client could not be constructed
    Client(reqwest::Error),
}

impl From<InputError> for ScanError {
    fn from(err: InputError) -> Self {
        ScanError::Input(err)
    }
}

impl From<SitemapError> for ScanError {
    fn from(err: SitemapError) -> Self {
        ScanError::Sitemap(err)
    }
}

impl From<regex::Error> for ScanError {
    fn from(err: regex::Error) -> Self {
        ScanError::Pattern(err)
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        ScanError::Client(err)
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Input(e) => write!(f, "{}", e),
            ScanError::Sitemap(e) => write!(f, "{}", e),
            ScanError::NoCandidates => write!(
                f,
                "no candidate pages to scan; check the path filter, or if this is a \
                 sitemap index pass a child sitemap (e.g. post-sitemap.xml) instead"
            ),
            ScanError::Pattern(e) => write!(f, "invalid URL pattern: {}", e),
            ScanError::Client(e) => write!(f, "cannot build HTTP client: {}", e),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Input(e) => Some(e),
            ScanError::Sitemap(e) => Some(e),
            ScanError::Pattern(e) => Some(e),
            ScanError::Client(e) => Some(e),
            ScanError::NoCandidates => None,
        }
    }
}

/// Main builder for an internal-link opportunity scan
pub struct Scan {
    targets: Vec<Target>,
    source: CandidateSource,
    config: ScanConfig,
}

impl Scan {
    /// Create a new scan of `targets` against pages from `source`
    pub fn new(targets: Vec<Target>, source: CandidateSource) -> Self {
        Self {
            targets,
            source,
            config: ScanConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Only scan sitemap URLs containing `filter`
    pub fn with_path_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.path_filter = Some(filter.into());
        self
    }

    /// Cap the number of candidate pages
    pub fn with_scan_limit(mut self, limit: usize) -> Self {
        self.config.scan_limit = limit;
        self
    }

    /// Resolve the candidate pages: read the sitemap if needed, then filter,
    /// dedupe and cap.
    pub async fn candidates(&self) -> Result<Vec<String>, ScanError> {
        let filter = self.config.candidate_filter()?;

        let raw = match &self.source {
            CandidateSource::Sitemap(url) => {
                SitemapReader::from_config(&self.config)?.read(url).await?
            }
            CandidateSource::List(pages) => pages.clone(),
        };

        let pages = filter.apply(&raw);
        if pages.is_empty() {
            return Err(ScanError::NoCandidates);
        }

        ::log::info!("Found {} candidate pages", pages.len());
        Ok(pages)
    }

    /// Run the scan over HTTP
    pub async fn run(self) -> Result<ScanReport, ScanError> {
        let fetcher = HttpFetcher::from_config(&self.config)?;
        self.run_with(&fetcher, |_| {}).await
    }

    /// Run the scan with a caller-supplied fetcher and progress callback
    pub async fn run_with<F, P>(self, fetcher: &F, on_progress: P) -> Result<ScanReport, ScanError>
    where
        F: PageFetcher,
        P: FnMut(ScanProgress),
    {
        if self.targets.is_empty() {
            return Err(InputError::NoTargets.into());
        }

        let pages = self.candidates().await?;
        Ok(scanner::scan_with_progress(fetcher, &self.targets, &pages, on_progress).await)
    }
}
