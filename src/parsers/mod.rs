pub mod html;
pub mod sitemap;


/// Result of parsing content
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// Extracted visible text, whitespace collapsed
    pub content: String,
    /// Raw `href` values of anchors, in document order
    pub links: Vec<String>,
}

impl ParseResult {
    /// Creates a new parse result with the given content and links
    pub fn new(content: String, links: Vec<String>) -> Self {
        Self { content, links }
    }
}
