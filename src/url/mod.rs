//! URL handling module for Docs-Mirror
//!
//! This module provides link normalization, the version-token canonicalizer,
//! origin scoping, and filename-safe record keys.

mod key;
mod normalize;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use key::record_key;
pub use normalize::normalize_url;

/// The fixed origin and root path of the mirrored site
///
/// A version token is a decimal-digit path segment directly after the root
/// path: with root `/docs`, `https://site/docs/12/page` carries token `12`
/// and canonicalizes to `https://site/docs/page`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRoot {
    origin: url::Origin,
    root_segments: Vec<String>,
}

impl SiteRoot {
    /// Creates a site root from the entry URL
    ///
    /// When `root_path` is `None` the entry URL's own path is the root.
    pub fn new(entry_url: &Url, root_path: Option<&str>) -> UrlResult<Self> {
        if entry_url.host_str().is_none() {
            return Err(UrlError::MissingHost);
        }

        let root = root_path.unwrap_or_else(|| entry_url.path());
        let root_segments = root
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            origin: entry_url.origin(),
            root_segments,
        })
    }

    /// ASCII serialization of the origin, e.g. `https://site.example`
    pub fn origin(&self) -> String {
        self.origin.ascii_serialization()
    }

    /// The root path, always starting with `/`
    pub fn root_path(&self) -> String {
        format!("/{}", self.root_segments.join("/"))
    }

    /// Returns true if the URL belongs to this site and lies under the root path
    pub fn in_scope(&self, url: &Url) -> bool {
        if url.origin() != self.origin {
            return false;
        }

        let segments = path_segments(url);
        segments.len() >= self.root_segments.len()
            && segments
                .iter()
                .zip(&self.root_segments)
                .all(|(a, b)| a == b)
    }

    /// Returns the version token of the URL, if it has one
    ///
    /// Pure: no I/O, no allocation beyond the returned token.
    pub fn extract_version_token(&self, url: &Url) -> Option<String> {
        if !self.in_scope(url) {
            return None;
        }

        path_segments(url)
            .get(self.root_segments.len())
            .filter(|s| is_version_segment(s))
            .map(|s| s.to_string())
    }

    /// Returns the URL with its version segment removed
    ///
    /// Consecutive numeric segments directly after the root are all removed,
    /// so canonicalizing twice yields the same URL as canonicalizing once.
    pub fn canonicalize(&self, url: &Url) -> Url {
        if self.extract_version_token(url).is_none() {
            return url.clone();
        }

        let segments = path_segments(url);
        let root_len = self.root_segments.len();
        let rest = segments[root_len..]
            .iter()
            .skip_while(|s| is_version_segment(s));

        let kept: Vec<&str> = segments[..root_len]
            .iter()
            .chain(rest)
            .copied()
            .collect();

        let mut canonical = url.clone();
        canonical.set_path(&format!("/{}", kept.join("/")));
        canonical
    }
}

fn path_segments(url: &Url) -> Vec<&str> {
    match url.path_segments() {
        Some(segments) => segments.collect(),
        None => Vec::new(),
    }
}

fn is_version_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs_root() -> SiteRoot {
        let entry = Url::parse("https://site.example/docs").unwrap();
        SiteRoot::new(&entry, None).unwrap()
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_root_defaults_to_entry_path() {
        let root = docs_root();
        assert_eq!(root.root_path(), "/docs");
        assert_eq!(root.origin(), "https://site.example");
    }

    #[test]
    fn test_explicit_root_path() {
        let entry = url("https://site.example/docs/intro");
        let root = SiteRoot::new(&entry, Some("/docs/")).unwrap();
        assert_eq!(root.root_path(), "/docs");
    }

    #[test]
    fn test_extract_version_token() {
        let root = docs_root();
        assert_eq!(
            root.extract_version_token(&url("https://site.example/docs/12/page")),
            Some("12".to_string())
        );
        assert_eq!(
            root.extract_version_token(&url("https://site.example/docs/12")),
            Some("12".to_string())
        );
        assert_eq!(
            root.extract_version_token(&url("https://site.example/docs/page")),
            None
        );
        assert_eq!(
            root.extract_version_token(&url("https://site.example/docs/v12/page")),
            None
        );
        assert_eq!(
            root.extract_version_token(&url("https://site.example/docs/page/12")),
            None
        );
        assert_eq!(
            root.extract_version_token(&url("https://site.example/12/page")),
            None
        );
    }

    #[test]
    fn test_version_token_ignores_other_origins() {
        let root = docs_root();
        assert_eq!(
            root.extract_version_token(&url("https://other.example/docs/12/page")),
            None
        );
    }

    #[test]
    fn test_canonicalize_removes_version() {
        let root = docs_root();
        assert_eq!(
            root.canonicalize(&url("https://site.example/docs/12/page")).as_str(),
            "https://site.example/docs/page"
        );
        assert_eq!(
            root.canonicalize(&url("https://site.example/docs/12")).as_str(),
            "https://site.example/docs"
        );
    }

    #[test]
    fn test_canonicalize_keeps_query() {
        let root = docs_root();
        assert_eq!(
            root.canonicalize(&url("https://site.example/docs/3/page?lang=en"))
                .as_str(),
            "https://site.example/docs/page?lang=en"
        );
    }

    #[test]
    fn test_canonicalize_unversioned_is_unchanged() {
        let root = docs_root();
        let page = url("https://site.example/docs/guide/intro");
        assert_eq!(root.canonicalize(&page), page);
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let root = docs_root();
        for s in [
            "https://site.example/docs/12/page",
            "https://site.example/docs/12/13/page",
            "https://site.example/docs/12/",
            "https://site.example/docs/page/12",
            "https://site.example/docs",
            "https://other.example/docs/4/page",
        ] {
            let once = root.canonicalize(&url(s));
            let twice = root.canonicalize(&once);
            assert_eq!(once, twice, "not idempotent for {}", s);
        }
    }

    #[test]
    fn test_versions_share_canonical() {
        let root = docs_root();
        let v1 = root.canonicalize(&url("https://site.example/docs/1/api/intro"));
        let v2 = root.canonicalize(&url("https://site.example/docs/27/api/intro"));
        let plain = root.canonicalize(&url("https://site.example/docs/api/intro"));
        assert_eq!(v1, v2);
        assert_eq!(v1, plain);
    }

    #[test]
    fn test_in_scope() {
        let root = docs_root();
        assert!(root.in_scope(&url("https://site.example/docs")));
        assert!(root.in_scope(&url("https://site.example/docs/page")));
        assert!(!root.in_scope(&url("https://site.example/blog/page")));
        assert!(!root.in_scope(&url("https://site.example/docsx/page")));
        assert!(!root.in_scope(&url("http://site.example/docs/page")));
        assert!(!root.in_scope(&url("https://other.example/docs/page")));
    }

    #[test]
    fn test_site_wide_root() {
        let entry = url("https://site.example/");
        let root = SiteRoot::new(&entry, None).unwrap();
        assert_eq!(root.root_path(), "/");
        assert!(root.in_scope(&url("https://site.example/anything")));
        assert_eq!(
            root.canonicalize(&url("https://site.example/5/page")).as_str(),
            "https://site.example/page"
        );
    }
}
