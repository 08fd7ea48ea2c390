use std::collections::HashSet;

/// Page budget for one run
///
/// Unbounded is its own variant rather than a numeric sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    Unbounded,
    Pages(u32),
}

impl Budget {
    pub fn from_max_pages(max_pages: Option<u32>) -> Self {
        match max_pages {
            Some(n) => Self::Pages(n),
            None => Self::Unbounded,
        }
    }

    /// Returns true once `fetched` pages use up the budget
    pub fn is_exhausted(&self, fetched: u32) -> bool {
        match self {
            Self::Unbounded => false,
            Self::Pages(max) => fetched >= *max,
        }
    }
}

/// Traversal state owned by a single run
///
/// Everything here lives in memory only. It is seeded from fresh cache
/// records at startup and discarded when the run ends.
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// URLs whose visit decision is final
    visited: HashSet<String>,

    /// Canonical URLs for which some version has been resolved
    canonical: HashSet<String>,

    /// URLs satisfied by fresh cache records
    cached: HashSet<String>,

    /// Versioned URLs superseded by a resolved canonical page
    suppressed: HashSet<String>,

    budget: Budget,

    /// Pages fetched this run, including failed fetches
    page_count: u32,

    cached_count: u32,

    failed_count: u32,

    /// Rendered documents in the order pages were finalized
    documents: Vec<String>,
}

impl CrawlState {
    pub fn new(budget: Budget) -> Self {
        Self {
            visited: HashSet::new(),
            canonical: HashSet::new(),
            cached: HashSet::new(),
            suppressed: HashSet::new(),
            budget,
            page_count: 0,
            cached_count: 0,
            failed_count: 0,
            documents: Vec::new(),
        }
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn is_canonical_resolved(&self, canonical: &str) -> bool {
        self.canonical.contains(canonical)
    }

    pub fn is_cached(&self, url: &str) -> bool {
        self.cached.contains(url)
    }

    pub fn budget_exhausted(&self) -> bool {
        self.budget.is_exhausted(self.page_count)
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    /// Folds a fresh cache record into the state
    pub fn record_cache_hit(&mut self, url: &str, canonical: &str, rendered: String) {
        if !self.cached.insert(url.to_string()) {
            return;
        }
        self.visited.insert(url.to_string());
        self.canonical.insert(canonical.to_string());
        self.cached_count += 1;
        self.documents.push(rendered);
    }

    /// Claims a budget slot for `url` before it is fetched
    ///
    /// The URL and its canonical are marked resolved up front so that a failed
    /// fetch is never retried through another link in the same run.
    pub fn begin_fetch(&mut self, url: &str, canonical: &str) {
        self.visited.insert(url.to_string());
        self.canonical.insert(canonical.to_string());
        self.page_count += 1;
    }

    pub fn push_document(&mut self, rendered: String) {
        self.documents.push(rendered);
    }

    pub fn record_failure(&mut self) {
        self.failed_count += 1;
    }

    /// Notes a versioned URL that was skipped; repeats are counted once
    pub fn record_suppressed(&mut self, url: &str) {
        self.suppressed.insert(url.to_string());
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn cached_count(&self) -> u32 {
        self.cached_count
    }

    pub fn failed_count(&self) -> u32 {
        self.failed_count
    }

    pub fn suppressed_count(&self) -> u32 {
        self.suppressed.len() as u32
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// Every finalized URL, sorted
    pub fn visited_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.visited.iter().cloned().collect();
        urls.sort();
        urls
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
