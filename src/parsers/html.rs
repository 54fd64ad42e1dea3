use crate::parsers::ParseResult;
use crate::utils::collapse_whitespace;
use scraper::{Html, Node, Selector};
use std::sync::LazyLock;

/// Elements whose text never counts as visible content
const HIDDEN_ELEMENTS: [&str; 2] = ["script", "style"];

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// Parses HTML content to extract visible text and link targets
pub fn parse(html: &str) -> ParseResult {
    let doc = Html::parse_document(html);

    let text = visible_text(&doc);
    let links = links(&doc);

    ::log::debug!("HTML parser found {} links", links.len());
    if !links.is_empty() {
        ::log::trace!(
            "First few links: {:?}",
            links.iter().take(5).collect::<Vec<_>>()
        );
    }

    ParseResult::new(text, links)
}

/// Concatenates every text node outside of script/style elements.
///
/// Text nodes are joined without a separator so inline markup such as
/// `SEO <b>strategy</b>` still reads as one phrase; whitespace runs are then
/// collapsed.
fn visible_text(doc: &Html) -> String {
    let mut raw = String::new();

    for node in doc.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
            Node::Element(el) => HIDDEN_ELEMENTS.contains(&el.name()),
            _ => false,
        });

        if !hidden {
            raw.push_str(text);
        }
    }

    collapse_whitespace(&raw)
}

fn links(doc: &Html) -> Vec<String> {
    doc.select(&LINK_SELECTOR)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.to_string())
        .collect()
}
