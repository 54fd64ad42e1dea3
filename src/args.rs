use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use unlinked_mentions::{CandidateSource, ScanConfig, inputs};

#[derive(Parser, Debug)]
#[command(name = "unlinked-mentions")]
#[command(about = "Find pages that mention a keyword but don't link to its target page")]
#[command(version)]
#[command(group(ArgGroup::new("source").required(true).args(["sitemap", "pages"])))]
pub struct Args {
    /// CSV of targets: column 1 target URL, column 2 keyword
    #[arg(short, long)]
    pub targets: PathBuf,

    /// Sitemap listing the candidate pages
    #[arg(short, long)]
    pub sitemap: Option<String>,

    /// File of candidate pages (one URL per line, or first column of a .csv)
    #[arg(short, long)]
    pub pages: Option<PathBuf>,

    /// JSON configuration file; flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only scan sitemap URLs containing this string (e.g. /blog/)
    #[arg(short = 'f', long)]
    pub path_filter: Option<String>,

    /// Maximum number of candidate pages to check
    #[arg(short = 'l', long)]
    pub scan_limit: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// User-Agent for page requests
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Regex of candidate URLs to skip (repeatable)
    #[arg(short = 'x', long = "exclude")]
    pub exclude: Vec<String>,

    /// Write the CSV report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the full report (stats and fetch failures) as JSON to stderr
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Configuration file values with command-line overrides applied
    pub fn scan_config(&self) -> Result<ScanConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => ScanConfig::from_file(path)?,
            None => ScanConfig::default(),
        };

        if let Some(filter) = &self.path_filter {
            config.path_filter = Some(filter.clone());
        }
        if let Some(limit) = self.scan_limit {
            config.scan_limit = limit;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }
        config.exclude_patterns.extend(self.exclude.iter().cloned());

        Ok(config)
    }

    /// Candidate pages as given on the command line
    pub fn candidate_source(&self) -> Result<CandidateSource, inputs::InputError> {
        match (&self.sitemap, &self.pages) {
            (Some(sitemap), _) => Ok(CandidateSource::Sitemap(sitemap.clone())),
            (None, Some(path)) => Ok(CandidateSource::List(inputs::load_pages(path)?)),
            // clap's required group rules this out
            (None, None) => Ok(CandidateSource::List(Vec::new())),
        }
    }
}
