//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlRecord`: the persisted unit of extracted content for one fetched URL
//! - `CrawlState`: visited/canonical sets, page budget, and the rendered-document accumulation
//! - `VisitOutcome`: the decision reached for one dequeued URL

mod crawl_state;
mod page_state;
mod record;

// Re-export main types
pub use crawl_state::{Budget, CrawlState};
pub use page_state::VisitOutcome;
pub use record::CrawlRecord;
