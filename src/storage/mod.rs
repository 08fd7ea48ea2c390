//! Storage module for persisting crawl data
//!
//! This module handles all filesystem operations for the mirror, including:
//! - Creating the output and page-record directories
//! - Writing one record plus companion artifacts per fetched URL
//! - Reading persisted artifacts back for the cache loader
//! - Writing the run manifest and concatenated corpus

mod fs;
mod traits;

pub use fs::FsStorage;
pub use traits::{Storage, StorageError, StorageResult};

/// Raw persisted artifacts for one record key
///
/// Any artifact may be missing; deciding whether the set is usable is the
/// cache loader's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageArtifacts {
    pub key: String,
    /// Serialized `CrawlRecord`
    pub record_json: Option<String>,
    /// Raw document as loaded
    pub raw_html: Option<String>,
    /// Rendered document
    pub rendered: Option<String>,
}

impl PageArtifacts {
    /// Returns true if every companion artifact is present
    pub fn is_complete(&self) -> bool {
        self.record_json.is_some() && self.raw_html.is_some() && self.rendered.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_complete() {
        let mut artifacts = PageArtifacts {
            key: "k".to_string(),
            record_json: Some("{}".to_string()),
            raw_html: Some("<html></html>".to_string()),
            rendered: Some("# k".to_string()),
        };
        assert!(artifacts.is_complete());

        artifacts.rendered = None;
        assert!(!artifacts.is_complete());
    }
}
