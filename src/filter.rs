use crate::utils::normalize_url;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// Configuration for narrowing down candidate pages
#[derive(Debug, Clone, Default)]
pub struct CandidateFilterConfig {
    /// Regex patterns for URLs to include (if empty, all URLs are included unless excluded)
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to exclude (these take precedence over include patterns)
    pub exclude_patterns: Vec<String>,

    /// Keep at most this many pages
    pub scan_limit: Option<usize>,
}

/// Turns a raw list of URLs into the candidate pages of a scan
#[derive(Debug, Default)]
pub struct CandidateFilter {
    config: CandidateFilterConfig,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl CandidateFilter {
    /// Create a new candidate filter from configuration
    pub fn new(config: CandidateFilterConfig) -> Result<Self, regex::Error> {
        let mut include_regexes = Vec::with_capacity(config.include_patterns.len());
        for pattern in &config.include_patterns {
            include_regexes.push(Regex::new(pattern)?);
        }

        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            config,
            include_regexes,
            exclude_regexes,
        })
    }

    /// Determine if a single URL is worth fetching
    pub fn should_scan(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        // Exclusions take precedence
        let url_str = url.as_str();
        if self.exclude_regexes.iter().any(|re| re.is_match(url_str)) {
            return false;
        }

        self.include_regexes.is_empty() || self.include_regexes.iter().any(|re| re.is_match(url_str))
    }

    /// Trim, validate, filter, dedupe and cap a list of raw URLs.
    ///
    /// Duplicates are detected on the normalized form and the first spelling
    /// wins. Order of first appearance is kept so the cap is deterministic.
    pub fn apply<I, S>(&self, urls: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut pages = Vec::new();

        for raw in urls {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                continue;
            }

            let url = match Url::parse(raw) {
                Ok(url) => url,
                Err(e) => {
                    ::log::warn!("Skipping invalid candidate URL {:?}: {}", raw, e);
                    continue;
                }
            };

            if !self.should_scan(&url) {
                ::log::debug!("Filtered out candidate: {}", raw);
                continue;
            }

            if !seen.insert(normalize_url(raw)) {
                continue;
            }

            if let Some(limit) = self.config.scan_limit {
                if pages.len() >= limit {
                    ::log::info!("Scan limit of {} pages reached", limit);
                    break;
                }
            }

            pages.push(raw.to_string());
        }

        pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(include: &[&str], exclude: &[&str], limit: Option<usize>) -> CandidateFilter {
        CandidateFilter::new(CandidateFilterConfig {
            include_patterns: include.iter().map(|s| s.to_string()).collect(),
            exclude_patterns: exclude.iter().map(|s| s.to_string()).collect(),
            scan_limit: limit,
        })
        .unwrap()
    }

    #[test]
    fn test_default_filter_keeps_web_pages() {
        let filter = CandidateFilter::default();
        let pages = filter.apply(["https://ex.com/a", " http://ex.com/b ", "", "   "]);
        assert_eq!(pages, vec!["https://ex.com/a", "http://ex.com/b"]);
    }

    #[test]
    fn test_invalid_and_non_http_urls_dropped() {
        let filter = CandidateFilter::default();
        let pages = filter.apply(["not a url", "/relative/path", "mailto:a@ex.com", "https://ex.com/ok"]);
        assert_eq!(pages, vec!["https://ex.com/ok"]);
    }

    #[test]
    fn test_dedupe_on_normalized_form() {
        let filter = CandidateFilter::default();
        let pages = filter.apply([
            "https://ex.com/a",
            "http://EX.com/a/",
            "https://ex.com/b",
            "https://ex.com/a",
        ]);
        assert_eq!(pages, vec!["https://ex.com/a", "https://ex.com/b"]);
    }

    #[test]
    fn test_scan_limit_caps_after_dedupe() {
        let filter = filter(&[], &[], Some(2));
        let pages = filter.apply([
            "https://ex.com/a",
            "https://ex.com/a",
            "https://ex.com/b",
            "https://ex.com/c",
        ]);
        assert_eq!(pages, vec!["https://ex.com/a", "https://ex.com/b"]);
    }

    #[test]
    fn test_regex_patterns() {
        let filter = filter(&[r"/docs/"], &[r"/docs/draft/", r"\.pdf$"], None);
        let pages = filter.apply([
            "https://ex.com/docs/page",
            "https://ex.com/blog/post",
            "https://ex.com/docs/draft/page",
            "https://ex.com/docs/manual.pdf",
        ]);
        assert_eq!(pages, vec!["https://ex.com/docs/page"]);
    }
}
