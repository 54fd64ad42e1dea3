use quick_xml::Reader;
use quick_xml::events::Event;
use std::fmt;

/// Kind of sitemap document, decided by its root element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapKind {
    /// `<urlset>`: lists pages
    UrlSet,
    /// `<sitemapindex>`: lists other sitemaps
    Index,
    /// Any other root element
    Unknown,
}

impl SitemapKind {
    fn from_root(name: &[u8]) -> Self {
        match name {
            b"urlset" => SitemapKind::UrlSet,
            b"sitemapindex" => SitemapKind::Index,
            _ => SitemapKind::Unknown,
        }
    }
}

/// `<loc>` entries of a sitemap, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapDocument {
    pub kind: SitemapKind,
    pub locs: Vec<String>,
}

impl SitemapDocument {
    pub fn is_index(&self) -> bool {
        self.kind == SitemapKind::Index
    }
}

/// The sitemap body was not well-formed XML
#[derive(Debug)]
pub struct MalformedSitemap {
    pub position: usize,
    pub message: String,
}

impl fmt::Display for MalformedSitemap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "malformed sitemap XML at byte {}: {}",
            self.position, self.message
        )
    }
}

impl std::error::Error for MalformedSitemap {}

/// Extracts the text of every `<loc>` element.
///
/// Namespace prefixes are ignored, CDATA is accepted and entries are trimmed.
/// Empty `<loc>` elements are skipped. A document that ends with elements
/// still open is rejected, so a truncated download never yields a partial list.
pub fn parse_sitemap_xml(xml: &str) -> Result<SitemapDocument, MalformedSitemap> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut kind = None;
    let mut locs = Vec::new();
    let mut current_loc: Option<String> = None;
    let mut depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| MalformedSitemap {
            position: reader.buffer_position(),
            message: e.to_string(),
        })?;

        match event {
            Event::Start(e) => {
                depth += 1;
                let name = e.local_name();
                kind.get_or_insert_with(|| SitemapKind::from_root(name.as_ref()));
                if name.as_ref() == b"loc" {
                    current_loc = Some(String::new());
                }
            }
            Event::Empty(e) => {
                kind.get_or_insert_with(|| SitemapKind::from_root(e.local_name().as_ref()));
            }
            Event::Text(t) => {
                if let Some(loc) = current_loc.as_mut() {
                    let text = t.unescape().map_err(|e| MalformedSitemap {
                        position: reader.buffer_position(),
                        message: e.to_string(),
                    })?;
                    loc.push_str(&text);
                }
            }
            Event::CData(c) => {
                if let Some(loc) = current_loc.as_mut() {
                    loc.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if e.local_name().as_ref() == b"loc" {
                    if let Some(loc) = current_loc.take() {
                        let loc = loc.trim();
                        if !loc.is_empty() {
                            locs.push(loc.to_string());
                        }
                    }
                }
            }
            Event::Eof => {
                if depth > 0 {
                    return Err(MalformedSitemap {
                        position: reader.buffer_position(),
                        message: format!("document ended with {} unclosed elements", depth),
                    });
                }
                break;
            }
            _ => {}
        }
    }

    let Some(kind) = kind else {
        return Err(MalformedSitemap {
            position: reader.buffer_position(),
            message: "document has no root element".to_string(),
        });
    };

    Ok(SitemapDocument { kind, locs })
}
