//! Content extraction from loaded documents
//!
//! The content root is the first element matching one of the `include`
//! selectors, or `<body>` when none match. Elements matching an `exclude`
//! selector are removed from the root before text and HTML are taken.

use crate::config::ExtractConfig;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Errors raised while extracting content from a loaded page
///
/// Never retried: the document loaded fine, so another attempt would
/// produce the same result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Document has no content root")]
    MissingContent,

    #[error("Content root is empty after cleaning")]
    EmptyContent,
}

/// Structured fields taken from one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    pub heading: String,
    pub breadcrumb: Vec<String>,
    pub text: String,
    pub html: String,
}

/// Compiled extraction selectors
#[derive(Debug)]
pub struct Extractor {
    include: Vec<Selector>,
    exclude: Vec<Selector>,
    breadcrumb: Selector,
    heading: Selector,
    title: Selector,
    body: Selector,
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

impl Extractor {
    pub fn new(config: &ExtractConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            include: config
                .include
                .iter()
                .map(|s| compile(s))
                .collect::<Result<_, _>>()?,
            exclude: config
                .exclude
                .iter()
                .map(|s| compile(s))
                .collect::<Result<_, _>>()?,
            breadcrumb: compile(&config.breadcrumb)?,
            heading: compile(&config.heading)?,
            title: compile("title")?,
            body: compile("body")?,
        })
    }

    /// Extracts title, heading, breadcrumb, cleaned text and cleaned HTML
    pub fn extract(&self, html: &str) -> Result<ExtractedPage, ExtractError> {
        let mut document = Html::parse_document(html);

        let title = document
            .select(&self.title)
            .next()
            .map(element_text)
            .unwrap_or_default();

        let breadcrumb: Vec<String> = document
            .select(&self.breadcrumb)
            .map(element_text)
            .filter(|s| !s.is_empty())
            .collect();

        let root = self.content_root(&document).ok_or(ExtractError::MissingContent)?;
        let root_id = root.id();

        let excluded: Vec<_> = self
            .exclude
            .iter()
            .flat_map(|selector| root.select(selector).map(|el| el.id()))
            .collect();

        for id in excluded {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }

        let root = document
            .tree
            .get(root_id)
            .and_then(ElementRef::wrap)
            .ok_or(ExtractError::MissingContent)?;

        let heading = root
            .select(&self.heading)
            .map(element_text)
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| title.clone());

        let text = normalize_whitespace(&root.text().collect::<String>());
        let html = root.inner_html().trim().to_string();

        if text.is_empty() {
            return Err(ExtractError::EmptyContent);
        }

        let title = if title.is_empty() { heading.clone() } else { title };

        Ok(ExtractedPage {
            title,
            heading,
            breadcrumb,
            text,
            html,
        })
    }

    fn content_root<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.include
            .iter()
            .find_map(|selector| document.select(selector).next())
            .or_else(|| document.select(&self.body).next())
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
