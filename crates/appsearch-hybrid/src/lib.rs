//! appsearch-hybrid
//!
//! Query-time ranking: cosine similarity against the normalized vector index
//! fused with keyword overlap and a category boost.

pub mod context;
pub mod engine;
pub mod scoring;

pub use context::SearchContext;
pub use engine::SearchEngine;
