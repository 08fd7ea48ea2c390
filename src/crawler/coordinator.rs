//! Crawler coordinator - run lifecycle
//!
//! This module ties the pieces of one run together:
//! - Initializing the output locations
//! - Rehydrating state from the on-disk cache
//! - Draining the entry URL and cache candidates through the scheduler
//! - Releasing the fetcher and writing the manifest and corpus, on every path

use crate::cache::load_cache;
use crate::config::Config;
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher, RetryPolicy};
use crate::crawler::scheduler::{Scheduler, SchedulerSettings};
use crate::output::{build_corpus, Manifest, RunStats};
use crate::state::{Budget, CrawlState};
use crate::storage::{FsStorage, Storage};
use crate::url::{normalize_url, SiteRoot};
use crate::MirrorError;
use chrono::Utc;
use std::time::Instant;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator<F: PageFetcher, S: Storage> {
    config: Config,
    config_hash: Option<String>,
    fetcher: F,
    storage: S,
}

impl<F: PageFetcher, S: Storage> Coordinator<F, S> {
    pub fn new(config: Config, fetcher: F, storage: S) -> Self {
        Self {
            config,
            config_hash: None,
            fetcher,
            storage,
        }
    }

    /// Records the configuration hash in the manifest
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    /// Runs one complete mirror pass
    ///
    /// Page-level failures never surface here. An initialization failure
    /// still releases the fetcher and writes the run artifacts before the
    /// error is returned.
    pub async fn run(mut self) -> Result<RunStats, MirrorError> {
        let started = Instant::now();
        let entry = normalize_url(&self.config.site.entry_url)?;
        let site = SiteRoot::new(&entry, self.config.site.root_path.as_deref())?;

        tracing::info!("Mirroring {} (root {})", entry, site.root_path());

        let (state, result) = match self.initialize() {
            Ok(extractor) => (self.traverse(&site, &entry, &extractor).await, Ok(())),
            Err(e) => {
                tracing::error!("Initialization failed: {}", e);
                (self.empty_state(), Err(e))
            }
        };

        self.fetcher.close().await;

        let stats = finalize(
            &mut self.storage,
            &site,
            &entry,
            self.config_hash.clone(),
            &state,
        );

        tracing::info!(
            "Mirror completed: {} pages ({} cached, {} fetched, {} failed) in {:?}",
            stats.total_pages,
            stats.cached_pages,
            stats.fetched_pages,
            stats.failed_pages,
            started.elapsed()
        );

        result.map(|()| stats)
    }

    fn initialize(&mut self) -> Result<Extractor, MirrorError> {
        self.storage.initialize()?;
        Ok(Extractor::new(&self.config.extract)?)
    }

    fn empty_state(&self) -> CrawlState {
        CrawlState::new(Budget::from_max_pages(self.config.crawler.max_pages))
    }

    async fn traverse(&mut self, site: &SiteRoot, entry: &Url, extractor: &Extractor) -> CrawlState {
        let mut state = self.empty_state();
        let load = load_cache(
            &self.storage,
            site,
            self.config.crawler.freshness(),
            &mut state,
            Utc::now(),
        );

        let mut seeds = Vec::with_capacity(load.candidates.len() + 1);
        seeds.push(entry.to_string());
        seeds.extend(load.candidates);

        let settings = SchedulerSettings {
            retry: RetryPolicy::from_config(&self.config.crawler),
            probe_timeout: self.config.crawler.probe_timeout(),
        };

        let mut scheduler = Scheduler::new(
            &self.fetcher,
            &mut self.storage,
            site,
            extractor,
            settings,
            state,
        );
        scheduler.run(seeds).await;
        scheduler.into_state()
    }
}

/// Writes the manifest and corpus for a run
///
/// Write failures are logged, never returned: the run's outcome is already
/// decided by the time artifacts are written.
fn finalize<S: Storage>(
    storage: &mut S,
    site: &SiteRoot,
    entry: &Url,
    config_hash: Option<String>,
    state: &CrawlState,
) -> RunStats {
    let stats = RunStats::from_state(state);
    let manifest = Manifest {
        origin: site.origin(),
        entry_url: entry.to_string(),
        generated_at: Utc::now(),
        config_hash,
        stats,
        visited_urls: state.visited_urls(),
    };

    match manifest.to_json() {
        Ok(json) => {
            if let Err(e) = storage.write_manifest(&json) {
                tracing::error!("Failed to write manifest: {}", e);
            }
        }
        Err(e) => tracing::error!("Failed to serialize manifest: {}", e),
    }

    let corpus = build_corpus(&manifest, state.documents());
    if let Err(e) = storage.write_corpus(&corpus) {
        tracing::error!("Failed to write corpus: {}", e);
    }

    stats
}

/// Runs a mirror pass with the HTTP fetcher and filesystem storage
///
/// If the HTTP client cannot be built the output locations are still
/// created and empty run artifacts written before the error is returned.
pub async fn run_crawl(config: Config, config_hash: Option<String>) -> Result<RunStats, MirrorError> {
    let mut storage = FsStorage::from_config(&config.output);

    let fetcher = match HttpFetcher::new(&config.user_agent) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            tracing::error!("Failed to start fetcher: {}", e);
            let entry = normalize_url(&config.site.entry_url)?;
            let site = SiteRoot::new(&entry, config.site.root_path.as_deref())?;
            if let Err(e) = storage.initialize() {
                tracing::error!("Failed to create output locations: {}", e);
            }
            let state = CrawlState::new(Budget::from_max_pages(config.crawler.max_pages));
            finalize(&mut storage, &site, &entry, config_hash, &state);
            return Err(MirrorError::Fetcher(e.to_string()));
        }
    };

    let coordinator = Coordinator::new(config, fetcher, storage);
    match config_hash {
        Some(hash) => coordinator.with_config_hash(hash).run().await,
        None => coordinator.run().await,
    }
}
