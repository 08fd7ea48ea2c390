//! Run manifest
//!
//! Written as `manifest.json` at the end of every run, including runs that
//! failed to initialize or processed nothing.

use crate::output::stats::RunStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub origin: String,

    pub entry_url: String,

    pub generated_at: DateTime<Utc>,

    /// SHA-256 of the configuration file, when the run was started from one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,

    #[serde(flatten)]
    pub stats: RunStats,

    /// Every finalized URL, sorted
    pub visited_urls: Vec<String>,
}

impl Manifest {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
