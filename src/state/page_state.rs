//! Decision reached for a single dequeued URL
use std::fmt;

/// Outcome of running the visit procedure on one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitOutcome {
    /// URL is malformed or lies outside the site root
    OutOfScope,

    /// URL already finalized in this run
    AlreadyVisited,

    /// Page budget reached before the URL could be fetched
    BudgetExhausted,

    /// Versioned URL superseded by an already-resolved canonical page
    Suppressed,

    /// Canonical probe succeeded; the canonical URL is visited instead
    DeferredToCanonical(String),

    /// Fresh record loaded from cache; no fetch issued
    CacheHit,

    /// Page fetched, extracted and persisted; carries its in-scope links
    Fetched { links: Vec<String> },

    /// Fetch or extraction failed; the branch ends here
    Failed(String),
}

impl VisitOutcome {
    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::OutOfScope => "out_of_scope",
            Self::AlreadyVisited => "already_visited",
            Self::BudgetExhausted => "budget_exhausted",
            Self::Suppressed => "suppressed",
            Self::DeferredToCanonical(_) => "deferred_to_canonical",
            Self::CacheHit => "cache_hit",
            Self::Fetched { .. } => "fetched",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for VisitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeferredToCanonical(canonical) => write!(f, "{} -> {}", self.label(), canonical),
            Self::Fetched { links } => write!(f, "{} ({} links)", self.label(), links.len()),
            Self::Failed(reason) => write!(f, "{}: {}", self.label(), reason),
            _ => write!(f, "{}", self.label()),
        }
    }
}
