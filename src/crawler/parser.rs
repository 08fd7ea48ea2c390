//! HTML parser for link discovery
//!
//! Used both on live documents and on raw documents persisted by earlier
//! runs; it never touches the network.

use crate::url::{normalize_url, SiteRoot};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts the in-scope links of a document, in discovery order
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links
/// - Links outside the site origin or root path
///
/// Links are normalized before scoping, and each distinct link is returned
/// once, at the position it was first seen.
///
/// # Example
///
/// ```
/// use docs_mirror::crawler::extract_links;
/// use docs_mirror::SiteRoot;
/// use url::Url;
///
/// let base = Url::parse("https://site.example/docs/intro").unwrap();
/// let site = SiteRoot::new(&base, Some("/docs")).unwrap();
/// let html = r#"<a href="guide">Guide</a><a href="/blog">Blog</a>"#;
/// assert_eq!(
///     extract_links(html, &base, &site),
///     vec!["https://site.example/docs/guide".to_string()]
/// );
/// ```
pub fn extract_links(html: &str, base_url: &Url, site: &SiteRoot) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(url) = resolve_link(href, base_url) else {
            continue;
        };

        if !site.in_scope(&url) {
            continue;
        }

        let link = url.to_string();
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    links
}

/// Resolves a link href to a normalized absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid or non-HTTP(S) URLs
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    normalize_url(absolute.as_str()).ok()
}
