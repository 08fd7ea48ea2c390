//! Run statistics
//!
//! This module provides the end-of-run counters and their console report.

use crate::state::CrawlState;
use serde::{Deserialize, Serialize};

/// Counters describing one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Every URL whose visit decision was finalized
    pub total_pages: u32,

    /// Pages satisfied by fresh cache records
    pub cached_pages: u32,

    /// Fetch attempts this run, successful or not
    pub fetched_pages: u32,

    /// Fetches that ended in a page-level failure
    pub failed_pages: u32,

    /// Versioned URLs skipped in favor of a resolved canonical page
    pub suppressed_pages: u32,
}

impl RunStats {
    pub fn from_state(state: &CrawlState) -> Self {
        Self {
            total_pages: state.visited_count() as u32,
            cached_pages: state.cached_count(),
            fetched_pages: state.page_count(),
            failed_pages: state.failed_count(),
            suppressed_pages: state.suppressed_count(),
        }
    }

    /// Pages fetched and persisted successfully
    pub fn succeeded_pages(&self) -> u32 {
        self.fetched_pages.saturating_sub(self.failed_pages)
    }

    /// Percentage of fetch attempts that succeeded
    pub fn success_rate(&self) -> f64 {
        if self.fetched_pages == 0 {
            return 0.0;
        }
        self.succeeded_pages() as f64 / self.fetched_pages as f64 * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStats) {
    println!("=== Mirror Statistics ===\n");

    println!("Overview:");
    println!("  Total pages:      {}", stats.total_pages);
    println!("  From cache:       {}", stats.cached_pages);
    println!("  Fetched:          {}", stats.fetched_pages);
    println!("  Failed:           {}", stats.failed_pages);
    println!("  Suppressed:       {}", stats.suppressed_pages);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} fetches succeeded)",
        stats.success_rate(),
        stats.succeeded_pages(),
        stats.fetched_pages
    );
}
