//! Cache module: freshness model and the startup cache loader
//!
//! Persisted records from earlier runs are read once, before any network
//! activity, and folded into the run's `CrawlState`.

mod loader;

pub use loader::{load_cache, CacheLoad};

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Maximum permitted age of a persisted record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Threshold zero: nothing is fresh and the cache is never scanned
    Disabled,

    /// No threshold: every complete record is fresh regardless of age
    Always,

    /// Records younger than this are fresh
    MaxAge(Duration),
}

impl Freshness {
    /// Builds the threshold from a `stale-after-secs` setting
    ///
    /// ```
    /// use docs_mirror::Freshness;
    /// use std::time::Duration;
    ///
    /// assert_eq!(Freshness::from_secs(None), Freshness::Always);
    /// assert_eq!(Freshness::from_secs(Some(0)), Freshness::Disabled);
    /// assert_eq!(
    ///     Freshness::from_secs(Some(60)),
    ///     Freshness::MaxAge(Duration::from_secs(60))
    /// );
    /// ```
    pub fn from_secs(secs: Option<u64>) -> Self {
        match secs {
            None => Self::Always,
            Some(0) => Self::Disabled,
            Some(n) => Self::MaxAge(Duration::from_secs(n)),
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    /// Returns true if a record crawled at `crawled_at` is still fresh at `now`
    ///
    /// A timestamp in the future counts as age zero.
    pub fn is_fresh(&self, crawled_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::Disabled => false,
            Self::Always => true,
            Self::MaxAge(max_age) => match (now - crawled_at).to_std() {
                Ok(age) => age < *max_age,
                Err(_) => true,
            },
        }
    }
}
