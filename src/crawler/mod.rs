//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - HTML parsing and link extraction
//! - Content extraction
//! - The visit procedure and frontier drain
//! - Overall run coordination

mod coordinator;
mod extractor;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator};
pub use extractor::{ExtractError, ExtractedPage, Extractor};
pub use fetcher::{
    build_http_client, fetch_with_retry, user_agent_string, FetchError, HttpFetcher, LoadedPage,
    PageFetcher, RetryPolicy,
};
pub use parser::extract_links;
pub use scheduler::{Scheduler, SchedulerSettings};
