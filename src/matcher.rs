use crate::parsers::html;
use crate::utils::{collapse_whitespace, normalize_url};
use std::collections::HashSet;

/// Answers for one (page, target, keyword) triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMatch {
    /// The keyword occurs somewhere in the page's visible text
    pub keyword_found: bool,
    /// The page already has an anchor pointing at the target
    pub already_linked: bool,
}

impl PageMatch {
    /// Keyword present and link absent
    pub fn is_opportunity(&self) -> bool {
        self.keyword_found && !self.already_linked
    }
}

/// Checks a page's HTML for a keyword mention and an existing link to `target_url`.
///
/// Keyword matching is a case-insensitive, unanchored substring test: a keyword
/// that is part of a longer word still matches. Link targets are compared
/// after [`normalize_url`], so scheme, case and a trailing slash don't matter.
/// Relative hrefs are compared as written.
///
/// Whitespace runs in both the page text and the keyword are collapsed to a
/// single space before the test, so `seo   strategy` matches `SEO\nstrategy`.
pub fn match_page(html_text: &str, target_url: &str, keyword: &str) -> PageMatch {
    let parsed = html::parse(html_text);

    let needle = collapse_whitespace(keyword).to_lowercase();
    let keyword_found = !needle.is_empty() && parsed.content.to_lowercase().contains(&needle);

    let linked: HashSet<String> = parsed
        .links
        .iter()
        .map(|href| normalize_url(href.as_str()))
        .collect();
    let already_linked = linked.contains(&normalize_url(target_url));

    PageMatch {
        keyword_found,
        already_linked,
    }
}
