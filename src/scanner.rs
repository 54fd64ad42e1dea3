use crate::crawlers::PageFetcher;
use crate::inputs::Target;
use crate::matcher::match_page;
use crate::results::{Opportunity, ScanReport};
use crate::utils::normalize_url;

/// Where a running scan is, reported after each target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanProgress {
    /// Targets finished so far
    pub targets_done: usize,
    pub targets_total: usize,
    pub opportunities: usize,
}

/// Cross-reference every target against every candidate page.
///
/// See [`scan_with_progress`].
pub async fn scan<F: PageFetcher>(fetcher: &F, targets: &[Target], pages: &[String]) -> ScanReport {
    scan_with_progress(fetcher, targets, pages, |_| {}).await
}

/// Cross-reference every target against every candidate page, reporting progress.
///
/// Pages whose normalized URL equals the target's are skipped for that target.
/// Every other page is fetched once per target, sequentially. A failed fetch is
/// recorded in the report and the scan moves on.
pub async fn scan_with_progress<F, P>(
    fetcher: &F,
    targets: &[Target],
    pages: &[String],
    mut on_progress: P,
) -> ScanReport
where
    F: PageFetcher,
    P: FnMut(ScanProgress),
{
    let mut report = ScanReport::new(targets.len(), pages.len());

    for (index, target) in targets.iter().enumerate() {
        let normalized_target = normalize_url(target.target_url.as_str());
        ::log::info!(
            "[{}/{}] Searching for '{}' (link to {})",
            index + 1,
            targets.len(),
            target.keyword,
            target.target_url
        );

        for page in pages {
            if normalize_url(page.as_str()) == normalized_target {
                ::log::debug!("Skipping target page itself: {}", page);
                report.stats.self_skipped += 1;
                continue;
            }

            let body = match fetcher.fetch(page).await {
                Ok(body) => body,
                Err(e) => {
                    ::log::warn!("Failed to fetch {}: {}", page, e);
                    report.record_failure(page, &e);
                    continue;
                }
            };
            report.stats.pages_checked += 1;

            let page_match = match_page(&body, &target.target_url, &target.keyword);
            if page_match.keyword_found {
                report.stats.keyword_hits += 1;
            }
            if page_match.keyword_found && page_match.already_linked {
                report.stats.already_linked += 1;
                ::log::debug!("{} already links to {}", page, target.target_url);
            }

            if page_match.is_opportunity() {
                ::log::info!("Opportunity: '{}' on {}", target.keyword, page);
                report.record_opportunity(Opportunity::new(
                    &target.keyword,
                    page,
                    &target.target_url,
                ));
            }
        }

        on_progress(ScanProgress {
            targets_done: index + 1,
            targets_total: targets.len(),
            opportunities: report.stats.opportunities,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawlers::FetchError;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};

    /// Serves canned pages and remembers every URL it was asked for
    #[derive(Default)]
    struct FakeFetcher {
        pages: HashMap<String, Result<String, u16>>,
        timeouts: HashSet<String>,
        requested: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), Ok(body.to_string()));
            self
        }

        fn status(mut self, url: &str, code: u16) -> Self {
            self.pages.insert(url.to_string(), Err(code));
            self
        }

        fn timeout(mut self, url: &str) -> Self {
            self.timeouts.insert(url.to_string());
            self
        }
    }

    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.requested.borrow_mut().push(url.to_string());
            if self.timeouts.contains(url) {
                return Err(FetchError::Timeout);
            }
            match self.pages.get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(code)) => Err(FetchError::Status(*code)),
                None => Err(FetchError::Status(404)),
            }
        }
    }

    fn widget_site() -> FakeFetcher {
        FakeFetcher::default()
            .page(
                "https://ex.com/b",
                "<html><body><p>The best Widget money can buy.</p></body></html>",
            )
            .page(
                "https://ex.com/a",
                "<html><body>widget widget widget</body></html>",
            )
            .page(
                "https://ex.com/c",
                r#"<html><body>A widget <a href="https://ex.com/a/">here</a></body></html>"#,
            )
    }

    fn widget_pages() -> Vec<String> {
        vec![
            "https://ex.com/b".to_string(),
            "https://ex.com/a".to_string(),
            "https://ex.com/c".to_string(),
        ]
    }

    #[tokio::test]
    async fn test_widget_scenario() {
        let fetcher = widget_site();
        let targets = vec![Target::new("https://ex.com/a", "widget")];

        let report = scan(&fetcher, &targets, &widget_pages()).await;

        assert_eq!(
            report.opportunities,
            vec![Opportunity::new("widget", "https://ex.com/b", "https://ex.com/a")]
        );
        assert_eq!(report.stats.self_skipped, 1);
        assert_eq!(report.stats.pages_checked, 2);
        assert_eq!(report.stats.keyword_hits, 2);
        assert_eq!(report.stats.already_linked, 1);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_self_page_is_never_fetched() {
        let fetcher = widget_site();
        let targets = vec![Target::new("HTTP://EX.com/a/", "widget")];

        scan(&fetcher, &targets, &widget_pages()).await;

        let requested = fetcher.requested.borrow();
        assert_eq!(*requested, vec!["https://ex.com/b", "https://ex.com/c"]);
    }

    #[tokio::test]
    async fn test_fetch_failures_do_not_stop_the_scan() {
        let fetcher = widget_site()
            .timeout("https://ex.com/slow")
            .status("https://ex.com/blocked", 403);
        let pages = vec![
            "https://ex.com/slow".to_string(),
            "https://ex.com/blocked".to_string(),
            "https://ex.com/b".to_string(),
        ];
        let targets = vec![Target::new("https://ex.com/a", "widget")];

        let report = scan(&fetcher, &targets, &pages).await;

        assert_eq!(report.opportunities.len(), 1);
        assert_eq!(report.opportunities[0].found_on_page, "https://ex.com/b");
        assert_eq!(report.stats.fetch_failures, 2);
        assert_eq!(report.failures[0].url, "https://ex.com/slow");
        assert_eq!(report.failures[0].reason, "request timed out");
        assert_eq!(report.failures[1].reason, "HTTP status 403");
    }

    #[tokio::test]
    async fn test_pages_refetched_for_each_target() {
        let fetcher = widget_site();
        let targets = vec![
            Target::new("https://ex.com/a", "widget"),
            Target::new("https://ex.com/z", "money"),
        ];

        let report = scan(&fetcher, &targets, &widget_pages()).await;

        // 2 pages for the first target (self skipped), 3 for the second
        assert_eq!(fetcher.requested.borrow().len(), 5);
        assert_eq!(report.opportunities.len(), 2);
        assert_eq!(report.opportunities[1].keyword, "money");
        assert_eq!(report.opportunities[1].missing_link_to, "https://ex.com/z");
    }

    #[tokio::test]
    async fn test_scan_is_idempotent() {
        let fetcher = widget_site();
        let targets = vec![
            Target::new("https://ex.com/a", "widget"),
            Target::new("https://ex.com/c", "best"),
        ];

        let first = scan(&fetcher, &targets, &widget_pages()).await;
        let second = scan(&fetcher, &targets, &widget_pages()).await;

        let first: HashSet<_> = first.opportunities.into_iter().collect();
        let second: HashSet<_> = second.opportunities.into_iter().collect();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[tokio::test]
    async fn test_progress_reported_per_target() {
        let fetcher = widget_site();
        let targets = vec![
            Target::new("https://ex.com/a", "widget"),
            Target::new("https://ex.com/b", "nothing matches this"),
        ];
        let mut seen = Vec::new();

        scan_with_progress(&fetcher, &targets, &widget_pages(), |p| seen.push(p)).await;

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].targets_done, 1);
        assert_eq!(seen[0].opportunities, 1);
        assert_eq!(seen[1].targets_done, 2);
        assert_eq!(seen[1].targets_total, 2);
    }

    #[tokio::test]
    async fn test_no_pages_or_targets() {
        let fetcher = FakeFetcher::default();
        let report = scan(&fetcher, &[], &widget_pages()).await;
        assert!(report.opportunities.is_empty());

        let targets = vec![Target::new("https://ex.com/a", "widget")];
        let report = scan(&fetcher, &targets, &[]).await;
        assert!(report.opportunities.is_empty());
        assert!(fetcher.requested.borrow().is_empty());
    }
}
