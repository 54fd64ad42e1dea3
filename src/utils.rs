/// Canonical form of a URL used only for equality checks.
///
/// Lowercases, strips a leading `http://` or `https://` and drops a single
/// trailing slash. Absent or empty input yields an empty string. The result is
/// never used to make requests.
pub fn normalize_url<'a>(url: impl Into<Option<&'a str>>) -> String {
    let Some(url) = url.into() else {
        return String::new();
    };

    let lowered = url.trim().to_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);

    without_scheme
        .strip_suffix('/')
        .unwrap_or(without_scheme)
        .to_string()
}

/// Collapse every run of whitespace into a single space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
