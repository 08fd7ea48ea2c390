//! Markdown rendering of extracted pages

use crate::state::CrawlRecord;

/// Separator between breadcrumb items in the preamble
const TRAIL_SEPARATOR: &str = " › ";

/// Renders a record as a Markdown document
///
/// The document opens with a preamble of heading, source URL and breadcrumb
/// trail, followed by the cleaned HTML converted to Markdown. When conversion
/// fails the cleaned text is used instead.
pub fn render_document(record: &CrawlRecord) -> String {
    let mut doc = String::new();

    let heading = if record.heading.is_empty() {
        &record.title
    } else {
        &record.heading
    };
    doc.push_str(&format!("# {}\n\n", heading));

    if !record.title.is_empty() && record.title != *heading {
        doc.push_str(&format!("- **Title**: {}\n", record.title));
    }
    doc.push_str(&format!("- **Source**: <{}>\n", record.url));
    if !record.breadcrumb.is_empty() {
        doc.push_str(&format!(
            "- **Path**: {}\n",
            record.breadcrumb.join(TRAIL_SEPARATOR)
        ));
    }
    doc.push('\n');

    let body = html_to_markdown(&record.html).unwrap_or_else(|| record.text.clone());
    doc.push_str(body.trim());
    doc.push('\n');

    doc
}

fn html_to_markdown(html: &str) -> Option<String> {
    match htmd::convert(html) {
        Ok(markdown) if !markdown.trim().is_empty() => Some(markdown),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Markdown conversion failed, using plain text: {}", e);
            None
        }
    }
}
