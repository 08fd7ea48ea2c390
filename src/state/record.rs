use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Extracted content and metadata for one fetched URL
///
/// A record only ever exists for a URL that was actually fetched; a URL
/// skipped in favor of its canonical counterpart never gets one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlRecord {
    /// Request URL that was fetched (unique key)
    pub url: String,

    /// URL the fetch ended on, when redirects moved it away from `url`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,

    pub title: String,

    pub heading: String,

    /// Root-to-leaf trail; may be empty
    #[serde(default)]
    pub breadcrumb: Vec<String>,

    /// Cleaned text content
    pub text: String,

    /// Cleaned HTML content
    pub html: String,

    /// Time of the last successful fetch
    pub crawled_at: DateTime<Utc>,
}

impl CrawlRecord {
    /// URL that relative links in the stored document resolve against
    pub fn link_base(&self) -> &str {
        self.final_url.as_deref().unwrap_or(&self.url)
    }

    /// Parses a persisted record
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the record for persistence
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
