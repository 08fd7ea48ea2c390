//! Concatenated corpus generation

use crate::output::manifest::Manifest;

/// Line placed between documents in the corpus
pub const DOCUMENT_SEPARATOR: &str = "---";

/// Joins rendered documents into one corpus under a run-level header
///
/// Documents keep the order they were finalized in. With no documents the
/// result is the header alone.
pub fn build_corpus(manifest: &Manifest, documents: &[String]) -> String {
    let mut corpus = String::new();

    corpus.push_str("# Documentation Mirror\n\n");
    corpus.push_str(&format!(
        "- **Generated**: {}\n",
        manifest.generated_at.to_rfc3339()
    ));
    corpus.push_str(&format!("- **Origin**: {}\n", manifest.origin));
    corpus.push_str(&format!(
        "- **Pages**: {} ({} cached, {} fetched)\n",
        manifest.stats.total_pages, manifest.stats.cached_pages, manifest.stats.fetched_pages
    ));

    for document in documents {
        corpus.push_str(&format!("\n{}\n\n", DOCUMENT_SEPARATOR));
        corpus.push_str(document.trim_end());
        corpus.push('\n');
    }

    corpus
}
