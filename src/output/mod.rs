//! Output module for rendered documents and run artifacts
//!
//! This module handles:
//! - Rendering extracted pages as Markdown documents
//! - Building the run manifest
//! - Concatenating rendered documents into the corpus
//! - Recording and printing run statistics

mod corpus;
mod manifest;
mod render;
pub mod stats;

pub use corpus::{build_corpus, DOCUMENT_SEPARATOR};
pub use manifest::Manifest;
pub use render::render_document;
pub use stats::{print_statistics, RunStats};
