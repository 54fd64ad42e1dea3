use crate::filter::{CandidateFilter, CandidateFilterConfig};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Settings for one scan run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Only sitemap URLs containing this substring are scanned
    #[serde(default)]
    pub path_filter: Option<String>,

    /// Maximum number of candidate pages considered
    #[serde(default = "default_scan_limit")]
    pub scan_limit: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent sent when fetching candidate pages
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// User-Agent sent when fetching the sitemap
    #[serde(default = "default_sitemap_user_agent")]
    pub sitemap_user_agent: String,

    /// Regex patterns a candidate URL must match (any of them), if non-empty
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns that drop a candidate URL
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Default value for scan_limit
fn default_scan_limit() -> usize {
    200
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    concat!(
        "Mozilla/5.0 (compatible; unlinked-mentions/",
        env!("CARGO_PKG_VERSION"),
        ")"
    )
    .to_string()
}

fn default_sitemap_user_agent() -> String {
    "Mozilla/5.0 (compatible; Googlebot/2.1)".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            path_filter: None,
            scan_limit: default_scan_limit(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            sitemap_user_agent: default_sitemap_user_agent(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Compile the candidate filter described by this configuration
    pub fn candidate_filter(&self) -> Result<CandidateFilter, regex::Error> {
        CandidateFilter::new(CandidateFilterConfig {
            include_patterns: self.include_patterns.clone(),
            exclude_patterns: self.exclude_patterns.clone(),
            scan_limit: Some(self.scan_limit).filter(|limit| *limit > 0),
        })
    }
}
