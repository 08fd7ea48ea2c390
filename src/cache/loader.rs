use crate::cache::Freshness;
use crate::crawler::extract_links;
use crate::state::{CrawlRecord, CrawlState};
use crate::storage::{PageArtifacts, Storage};
use crate::url::{record_key, SiteRoot};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use url::Url;

/// What the cache loader hands to the scheduler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheLoad {
    /// In-scope links harvested from fresh records, first-seen order
    pub candidates: Vec<String>,

    /// Number of fresh records folded into the state
    pub fresh_count: u32,

    /// Records found but not reused (stale, incomplete or malformed)
    pub skipped_count: u32,
}

/// A persisted record that passed every validity check
struct FreshRecord {
    record: CrawlRecord,
    url: Url,
    link_base: Url,
    raw_html: String,
    rendered: String,
}

/// Rehydrates crawl state from persisted records
///
/// Runs before any network activity. For each fresh record the URL is marked
/// visited, its canonical form resolved, its rendered document appended to
/// the output, and its stored raw document parsed for outbound links.
/// Links resolve against the URL the fetch ended on, as they did live.
///
/// Stale, incomplete and malformed records are dropped without error; the
/// scheduler refetches them if they are rediscovered.
pub fn load_cache<S: Storage>(
    storage: &S,
    site: &SiteRoot,
    freshness: Freshness,
    state: &mut CrawlState,
    now: DateTime<Utc>,
) -> CacheLoad {
    let mut load = CacheLoad::default();

    if freshness.is_disabled() {
        tracing::info!("Cache disabled; every page will be fetched");
        return load;
    }

    let keys = match storage.list_record_keys() {
        Ok(keys) => keys,
        Err(e) => {
            tracing::warn!("Could not scan persisted records, starting cold: {}", e);
            return load;
        }
    };

    let mut seen = HashSet::new();

    for key in keys {
        let fresh = match storage.read_artifacts(&key) {
            Ok(artifacts) => classify(artifacts, site, freshness, now),
            Err(e) => {
                tracing::debug!("Skipping record {}: {}", key, e);
                None
            }
        };

        let Some(fresh) = fresh else {
            load.skipped_count += 1;
            continue;
        };

        let canonical = site.canonicalize(&fresh.url);
        state.record_cache_hit(&fresh.record.url, canonical.as_str(), fresh.rendered);
        load.fresh_count += 1;

        for link in extract_links(&fresh.raw_html, &fresh.link_base, site) {
            if seen.insert(link.clone()) {
                load.candidates.push(link);
            }
        }
    }

    tracing::info!(
        "Cache: {} fresh records, {} skipped, {} candidate links",
        load.fresh_count,
        load.skipped_count,
        load.candidates.len()
    );

    load
}

/// Returns the record if it is complete, well-formed, in scope and fresh
fn classify(
    artifacts: PageArtifacts,
    site: &SiteRoot,
    freshness: Freshness,
    now: DateTime<Utc>,
) -> Option<FreshRecord> {
    let key = artifacts.key;
    let (Some(json), Some(raw_html), Some(rendered)) =
        (artifacts.record_json, artifacts.raw_html, artifacts.rendered)
    else {
        tracing::debug!("Record {} is incomplete; treating as stale", key);
        return None;
    };

    let record = match CrawlRecord::from_json(&json) {
        Ok(record) => record,
        Err(e) => {
            tracing::debug!("Record {} is malformed: {}", key, e);
            return None;
        }
    };

    if record_key(&record.url) != key {
        tracing::debug!("Record {} does not belong to {}", key, record.url);
        return None;
    }

    let url = Url::parse(&record.url).ok().filter(|u| site.in_scope(u))?;

    if !freshness.is_fresh(record.crawled_at, now) {
        tracing::debug!("Record for {} is stale", record.url);
        return None;
    }

    let link_base = Url::parse(record.link_base()).unwrap_or_else(|_| url.clone());

    Some(FreshRecord {
        record,
        url,
        link_base,
        raw_html,
        rendered,
    })
}
