use serde::{Deserialize, Serialize};
use std::io::Write;

/// A page that mentions a keyword without linking to its target
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Opportunity {
    pub keyword: String,
    pub found_on_page: String,
    pub missing_link_to: String,
}

impl Opportunity {
    pub fn new(keyword: &str, found_on_page: &str, missing_link_to: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            found_on_page: found_on_page.to_string(),
            missing_link_to: missing_link_to.to_string(),
        }
    }
}

/// A candidate page that could not be fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub url: String,
    pub reason: String,
}

/// Counters accumulated during a scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub targets: usize,
    pub candidate_pages: usize,
    /// Pages skipped because they are the target itself
    pub self_skipped: usize,
    /// Pages fetched and matched successfully
    pub pages_checked: usize,
    pub fetch_failures: usize,
    /// Pages mentioning the keyword, linked or not
    pub keyword_hits: usize,
    pub already_linked: usize,
    pub opportunities: usize,
}

/// Everything a finished scan produced
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    /// In discovery order
    pub opportunities: Vec<Opportunity>,
    pub failures: Vec<FetchFailure>,
    pub stats: ScanStats,
}

impl ScanReport {
    pub fn new(targets: usize, candidate_pages: usize) -> Self {
        Self {
            stats: ScanStats {
                targets,
                candidate_pages,
                ..ScanStats::default()
            },
            ..Self::default()
        }
    }

    pub fn record_opportunity(&mut self, opportunity: Opportunity) {
        self.stats.opportunities += 1;
        self.opportunities.push(opportunity);
    }

    pub fn record_failure(&mut self, url: &str, reason: impl ToString) {
        self.stats.fetch_failures += 1;
        self.failures.push(FetchFailure {
            url: url.to_string(),
            reason: reason.to_string(),
        });
    }

    /// Write the opportunities as CSV with a `keyword,found_on_page,missing_link_to` header
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        if self.opportunities.is_empty() {
            csv_writer.write_record(["keyword", "found_on_page", "missing_link_to"])?;
        }
        for opportunity in &self.opportunities {
            csv_writer.serialize(opportunity)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        let s = &self.stats;
        format!(
            "{} targets x {} pages: {} pages checked, {} fetch failures, {} keyword hits ({} already linked), {} opportunities",
            s.targets,
            s.candidate_pages,
            s.pages_checked,
            s.fetch_failures,
            s.keyword_hits,
            s.already_linked,
            s.opportunities
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_csv_with_rows() {
        let mut report = ScanReport::new(1, 2);
        report.record_opportunity(Opportunity::new(
            "widget",
            "https://ex.com/b",
            "https://ex.com/a",
        ));

        let mut out = Vec::new();
        report.write_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "keyword,found_on_page,missing_link_to\nwidget,https://ex.com/b,https://ex.com/a\n"
        );
    }

    #[test]
    fn test_write_csv_empty_keeps_header() {
        let mut out = Vec::new();
        ScanReport::default().write_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "keyword,found_on_page,missing_link_to\n"
        );
    }

    #[test]
    fn test_write_csv_quotes_commas() {
        let mut report = ScanReport::default();
        report.record_opportunity(Opportunity::new(
            "red, blue",
            "https://ex.com/b",
            "https://ex.com/a",
        ));
        let mut out = Vec::new();
        report.write_csv(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("\"red, blue\""));
    }

    #[test]
    fn test_counters() {
        let mut report = ScanReport::new(2, 3);
        report.record_failure("https://ex.com/x", "request timed out");
        report.record_opportunity(Opportunity::new("k", "p", "t"));
        assert_eq!(report.stats.fetch_failures, 1);
        assert_eq!(report.stats.opportunities, 1);
        assert_eq!(report.failures[0].reason, "request timed out");
        assert!(report.summary().starts_with("2 targets x 3 pages"));
    }
}
