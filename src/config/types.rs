use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::Freshness;

/// Main configuration structure for Docs-Mirror
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// The documentation site being mirrored
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Fixed seed URL; its origin bounds the crawl
    #[serde(rename = "entry-url")]
    pub entry_url: String,

    /// Site-root path under which version segments appear (defaults to the entry path)
    #[serde(rename = "root-path", default)]
    pub root_path: Option<String>,
}

/// Crawl budget, cache and retry settings
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages fetched per run; absent means unbounded
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u32>,

    /// Maximum age of a persisted record in seconds; absent means never stale
    #[serde(rename = "stale-after-secs", default)]
    pub stale_after_secs: Option<u64>,

    /// Timeout of the first fetch attempt; attempt n waits n times this long
    #[serde(rename = "base-timeout-ms", default = "default_base_timeout_ms")]
    pub base_timeout_ms: u64,

    /// Timeout of the canonical-first existence probe
    #[serde(rename = "probe-timeout-ms", default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Fetch attempts per URL
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// Content extraction selectors
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// Candidate content roots, tried in order; `body` is the fallback
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Elements removed from the content root before text and HTML are taken
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Selector for breadcrumb items, root first
    #[serde(default = "default_breadcrumb")]
    pub breadcrumb: String,

    /// Selector for the page heading
    #[serde(default = "default_heading")]
    pub heading: String,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory holding the page records, manifest and corpus
    pub directory: String,
}

impl CrawlerConfig {
    /// The freshness threshold described by `stale-after-secs`
    pub fn freshness(&self) -> Freshness {
        Freshness::from_secs(self.stale_after_secs)
    }

    pub fn base_timeout(&self) -> Duration {
        Duration::from_millis(self.base_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: None,
            stale_after_secs: None,
            base_timeout_ms: default_base_timeout_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: default_exclude(),
            breadcrumb: default_breadcrumb(),
            heading: default_heading(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "DocsMirror".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/docs-mirror".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn directory(&self) -> PathBuf {
        PathBuf::from(&self.directory)
    }

    /// Directory of the per-URL records
    pub fn pages_dir(&self) -> PathBuf {
        self.directory().join("pages")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.directory().join("manifest.json")
    }

    pub fn corpus_path(&self) -> PathBuf {
        self.directory().join("corpus.md")
    }
}

fn default_base_timeout_ms() -> u64 {
    30_000
}

fn default_probe_timeout_ms() -> u64 {
    10_000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_include() -> Vec<String> {
    vec![
        "main".to_string(),
        "article".to_string(),
        "[role='main']".to_string(),
    ]
}

fn default_exclude() -> Vec<String> {
    [
        "nav", "header", "footer", "aside", "script", "style", "noscript", "iframe",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_breadcrumb() -> String {
    ".breadcrumb a, .breadcrumbs a, nav[aria-label='breadcrumb'] a".to_string()
}

fn default_heading() -> String {
    "h1".to_string()
}
