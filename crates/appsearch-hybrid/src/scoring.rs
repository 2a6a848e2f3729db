//! Lexical signals and the fixed linear fusion.
//!
//! Matching is plain substring containment on lower-cased text, so a short
//! category such as `ai` also matches inside longer words. Stores built for
//! the existing ranking depend on this, so it stays.

use appsearch_core::types::ScoredResult;

pub const SEMANTIC_WEIGHT: f32 = 0.5;
pub const KEYWORD_WEIGHT: f32 = 0.3;
pub const CATEGORY_WEIGHT: f32 = 0.2;

/// Matching tokens needed for a full keyword score.
pub const KEYWORD_SATURATION: f32 = 5.0;

/// `query_lower` and `blob_lower` must already be lower-cased. Every
/// whitespace token of the query found anywhere in the blob counts once
/// (repeated tokens count again).
pub fn keyword_score(query_lower: &str, blob_lower: &str) -> f32 {
    let hits = query_lower.split_whitespace().filter(|t| blob_lower.contains(t)).count();
    (hits as f32 / KEYWORD_SATURATION).min(1.0)
}

/// 1.0 when the lower-cased category occurs in the query. A blank category
/// is contained in every query and always boosts.
pub fn category_boost(query_lower: &str, category_lower: &str) -> f32 {
    if query_lower.contains(category_lower) { 1.0 } else { 0.0 }
}

pub fn fuse(semantic: f32, keyword: f32, category: f32) -> f32 {
    SEMANTIC_WEIGHT * semantic + KEYWORD_WEIGHT * keyword + CATEGORY_WEIGHT * category
}

/// `requested` (or `default`) clamped to `[1, available]`; 0 only when
/// nothing is available.
pub fn effective_top_k(requested: Option<usize>, default: usize, available: usize) -> usize {
    requested.unwrap_or(default).max(1).min(available)
}

/// Sort by `final_score` descending and keep `k`. The sort is stable, so equal
/// scores keep catalog order.
pub fn rank_top_k(mut results: Vec<ScoredResult>, k: usize) -> Vec<ScoredResult> {
    results.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    results.truncate(k);
    results
}
