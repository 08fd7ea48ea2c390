//! Traversal engine: the per-URL visit procedure and the depth-first drain
//!
//! Every dequeued URL runs through the same gates, in order:
//!
//! 1. already finalized, or page budget spent: stop
//! 2. versioned URL whose canonical page is already resolved: suppress
//! 3. versioned URL with an unresolved canonical: probe the canonical and,
//!    if it answers, visit the canonical instead
//! 4. URL satisfied by a fresh cache record: stop
//! 5. fetch, extract, persist, render, then queue the page's links
//!
//! Cache-loaded URLs are marked visited at load time, so the cache check is
//! answered inside the first gate.
//!
//! The frontier is an explicit stack. Links are pushed in reverse so they pop
//! in discovery order, which reproduces a depth-first recursion without
//! tying traversal depth to the call stack.

use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::{fetch_with_retry, PageFetcher, RetryPolicy};
use crate::crawler::parser::extract_links;
use crate::output::render_document;
use crate::state::{Budget, CrawlRecord, CrawlState, VisitOutcome};
use crate::storage::Storage;
use crate::url::SiteRoot;
use chrono::Utc;
use std::time::{Duration, Instant};
use url::Url;

/// How often progress is reported, in fetched pages
const PROGRESS_INTERVAL: u32 = 10;

/// Network settings for one traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSettings {
    pub retry: RetryPolicy,
    pub probe_timeout: Duration,
}

/// Drives the visit procedure over a frontier of URLs
///
/// The scheduler owns the run's `CrawlState`; fetcher and storage are
/// borrowed from the coordinator for the length of the traversal.
pub struct Scheduler<'a, F: PageFetcher + ?Sized, S: Storage> {
    fetcher: &'a F,
    storage: &'a mut S,
    site: &'a SiteRoot,
    extractor: &'a Extractor,
    settings: SchedulerSettings,
    state: CrawlState,
    started: Instant,
}

impl<'a, F: PageFetcher + ?Sized, S: Storage> Scheduler<'a, F, S> {
    pub fn new(
        fetcher: &'a F,
        storage: &'a mut S,
        site: &'a SiteRoot,
        extractor: &'a Extractor,
        settings: SchedulerSettings,
        state: CrawlState,
    ) -> Self {
        Self {
            fetcher,
            storage,
            site,
            extractor,
            settings,
            state,
            started: Instant::now(),
        }
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn into_state(self) -> CrawlState {
        self.state
    }

    /// Visits `seeds` in order, following discovered links depth-first
    ///
    /// Returns once the frontier is empty or the page budget is spent.
    pub async fn run(&mut self, seeds: Vec<String>) {
        let mut frontier: Vec<String> = seeds.into_iter().rev().collect();

        while let Some(url) = frontier.pop() {
            if self.state.budget_exhausted() {
                tracing::info!(
                    "Page budget of {} reached; {} queued URLs left unvisited",
                    self.state.page_count(),
                    frontier.len() + 1
                );
                break;
            }

            let outcome = self.visit(&url).await;
            tracing::debug!("{} -> {}", url, outcome);

            match outcome {
                VisitOutcome::DeferredToCanonical(canonical) => frontier.push(canonical),
                VisitOutcome::Fetched { links } => {
                    frontier.extend(
                        links
                            .into_iter()
                            .rev()
                            .filter(|link| !self.state.is_visited(link)),
                    );
                }
                _ => {}
            }
        }
    }

    /// Runs the visit procedure for a single URL
    pub async fn visit(&mut self, url: &str) -> VisitOutcome {
        let parsed = match Url::parse(url) {
            Ok(parsed) if self.site.in_scope(&parsed) => parsed,
            _ => return VisitOutcome::OutOfScope,
        };

        if self.state.is_visited(url) {
            return if self.state.is_cached(url) {
                VisitOutcome::CacheHit
            } else {
                VisitOutcome::AlreadyVisited
            };
        }

        if self.state.budget_exhausted() {
            return VisitOutcome::BudgetExhausted;
        }

        let canonical = self.site.canonicalize(&parsed);
        let version = self.site.extract_version_token(&parsed);

        if let Some(version) = version {
            if self.state.is_canonical_resolved(canonical.as_str()) {
                tracing::debug!(
                    "Suppressing {} (version {}); {} already resolved",
                    url,
                    version,
                    canonical
                );
                self.state.record_suppressed(url);
                return VisitOutcome::Suppressed;
            }

            match self
                .fetcher
                .probe(canonical.as_str(), self.settings.probe_timeout)
                .await
            {
                Ok(()) => {
                    tracing::info!("Canonical {} exists; skipping {}", canonical, url);
                    return VisitOutcome::DeferredToCanonical(canonical.to_string());
                }
                Err(e) => {
                    tracing::info!(
                        "Canonical {} unavailable ({}); fetching version {} directly",
                        canonical,
                        e,
                        version
                    );
                }
            }
        }

        self.fetch_page(url, &parsed, canonical.as_str()).await
    }

    async fn fetch_page(&mut self, url: &str, parsed: &Url, canonical: &str) -> VisitOutcome {
        self.state.begin_fetch(url, canonical);
        self.report_progress(url);

        let page = match fetch_with_retry(self.fetcher, url, &self.settings.retry).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                self.state.record_failure();
                return VisitOutcome::Failed(e.to_string());
            }
        };

        if page.final_url != url {
            tracing::info!("{} redirected to {}", url, page.final_url);
        }

        let extracted = match self.extractor.extract(&page.body) {
            Ok(extracted) => extracted,
            Err(e) => {
                tracing::warn!("Failed to extract {}: {}", url, e);
                self.state.record_failure();
                return VisitOutcome::Failed(e.to_string());
            }
        };

        let record = CrawlRecord {
            url: url.to_string(),
            final_url: (page.final_url != url).then(|| page.final_url.clone()),
            title: extracted.title,
            heading: extracted.heading,
            breadcrumb: extracted.breadcrumb,
            text: extracted.text,
            html: extracted.html,
            crawled_at: Utc::now(),
        };
        let rendered = render_document(&record);

        if let Err(e) = self.storage.save_page(&record, &page.body, &rendered) {
            tracing::error!("Failed to persist {}: {}", url, e);
            self.state.record_failure();
            return VisitOutcome::Failed(e.to_string());
        }

        self.state.push_document(rendered);

        let base = Url::parse(&page.final_url).unwrap_or_else(|_| parsed.clone());
        let links = extract_links(&page.body, &base, self.site);

        VisitOutcome::Fetched { links }
    }

    fn report_progress(&self, url: &str) {
        let count = self.state.page_count();
        match self.state.budget() {
            Budget::Pages(max) => tracing::info!("[{}/{}] Fetching {}", count, max, url),
            Budget::Unbounded => tracing::info!("[{}] Fetching {}", count, url),
        }

        if count % PROGRESS_INTERVAL == 0 {
            let rate = count as f64 / self.started.elapsed().as_secs_f64().max(f64::EPSILON);
            tracing::info!(
                "Progress: {} pages fetched, {} from cache, {} failed, {:.2} pages/sec",
                count,
                self.state.cached_count(),
                self.state.failed_count(),
                rate
            );
        }
    }
}
