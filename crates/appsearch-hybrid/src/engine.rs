use std::sync::Arc;

use appsearch_core::error::{Error, Result};
use appsearch_core::traits::Embedder;
use appsearch_core::types::{CatalogEntry, CatalogStore, QueryRequest, ScoredResult, DEFAULT_TOP_K};
use appsearch_vector::{l2_normalize, LoadReport, VectorIndex};
use tracing::debug;

use crate::scoring::{category_boost, effective_top_k, fuse, keyword_score, rank_top_k};

/// Immutable search snapshot: normalized vectors plus the lower-cased
/// lexical fields of every valid entry, and the embedder used for queries.
pub struct SearchEngine {
    index: VectorIndex,
    blobs: Vec<String>,
    categories: Vec<String>,
    embedder: Arc<dyn Embedder>,
    default_top_k: usize,
}

impl SearchEngine {
    /// Fails with a configuration error when the embedder's dimension cannot
    /// score against the loaded vectors.
    pub fn new(index: VectorIndex, embedder: Arc<dyn Embedder>) -> Result<Self> {
        if !index.is_empty() && index.dim() != embedder.dim() {
            return Err(Error::Configuration(format!(
                "store embeddings have {} dimensions but model '{}' produces {}",
                index.dim(),
                embedder.model_id(),
                embedder.dim()
            )));
        }
        let blobs = index.entries().iter().map(CatalogEntry::keyword_blob).collect();
        let categories = index.entries().iter().map(|e| e.category.to_lowercase()).collect();
        Ok(Self { index, blobs, categories, embedder, default_top_k: DEFAULT_TOP_K })
    }

    pub fn from_store(store: &CatalogStore, embedder: Arc<dyn Embedder>) -> Result<(Self, LoadReport)> {
        let (index, report) = VectorIndex::load(store)?;
        Ok((Self::new(index, embedder)?, report))
    }

    pub fn with_default_top_k(mut self, k: usize) -> Self {
        self.default_top_k = k.max(1);
        self
    }

    pub fn len(&self) -> usize { self.index.len() }

    pub fn is_empty(&self) -> bool { self.index.is_empty() }

    /// Valid entries, in catalog order.
    pub fn entries(&self) -> &[CatalogEntry] { self.index.entries() }

    pub fn embedder(&self) -> &Arc<dyn Embedder> { &self.embedder }

    pub fn default_top_k(&self) -> usize { self.default_top_k }

    pub fn run(&self, request: &QueryRequest) -> Result<Vec<ScoredResult>> {
        self.search(&request.query, request.top_k)
    }

    /// Only the empty string is rejected; any other text, whitespace
    /// included, is embedded and ranked.
    pub fn search(&self, query: &str, top_k: Option<usize>) -> Result<Vec<ScoredResult>> {
        if query.is_empty() {
            return Err(Error::Validation("Query is required".to_string()));
        }
        let k = effective_top_k(top_k, self.default_top_k, self.len());
        if k == 0 {
            return Ok(Vec::new());
        }

        let q_vec = self.embed_query(query)?;
        let semantic = self.index.dot_all(&q_vec);
        let query_lower = query.to_lowercase();

        let scored: Vec<ScoredResult> = self
            .entries()
            .iter()
            .enumerate()
            .map(|(i, app)| {
                let keyword = keyword_score(&query_lower, &self.blobs[i]);
                let category = category_boost(&query_lower, &self.categories[i]);
                ScoredResult {
                    app: app.clone(),
                    semantic_score: semantic[i],
                    keyword_score: keyword,
                    category_boost: category,
                    final_score: fuse(semantic[i], keyword, category),
                }
            })
            .collect();
        let ranked = rank_top_k(scored, k);
        debug!(query, k, top = ranked.first().map(|r| r.final_score), "search complete");
        Ok(ranked)
    }

    fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let mut v = self.embedder.embed_text(query).map_err(Error::dependency)?;
        if v.len() != self.index.dim() {
            return Err(Error::Dependency(format!(
                "query embedding has {} dimensions, index has {}",
                v.len(),
                self.index.dim()
            )));
        }
        if !l2_normalize(&mut v) {
            return Err(Error::Dependency("query embedding has zero or non-finite norm".to_string()));
        }
        Ok(v)
    }
}
