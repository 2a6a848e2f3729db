//! Process-wide holder of the current search snapshot.
//!
//! Queries clone the `Arc` under a short read lock and then run without any
//! lock. A reload builds the new engine off to the side and swaps the pointer,
//! so in-flight queries finish on the snapshot they started with.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use appsearch_core::error::Result;
use appsearch_core::store::load_store;
use appsearch_core::types::ScoredResult;
use appsearch_vector::LoadReport;
use tracing::info;

use crate::engine::SearchEngine;

pub struct SearchContext {
    current: RwLock<Arc<SearchEngine>>,
}

impl SearchContext {
    pub fn new(engine: SearchEngine) -> Self {
        Self { current: RwLock::new(Arc::new(engine)) }
    }

    pub fn snapshot(&self) -> Arc<SearchEngine> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn search(&self, query: &str, top_k: Option<usize>) -> Result<Vec<ScoredResult>> {
        self.snapshot().search(query, top_k)
    }

    /// Install `engine` and return the previous snapshot.
    pub fn swap(&self, engine: SearchEngine) -> Arc<SearchEngine> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(engine))
    }

    /// Re-read the store at `path` and swap it in, keeping the current
    /// embedder and default `top_k`. On error the current snapshot stays.
    pub fn reload_from(&self, path: &Path) -> Result<LoadReport> {
        let current = self.snapshot();
        let store = load_store(path)?;
        let (engine, report) = SearchEngine::from_store(&store, Arc::clone(current.embedder()))?;
        self.swap(engine.with_default_top_k(current.default_top_k()));
        info!(path = %path.display(), loaded = report.loaded, "search index reloaded");
        Ok(report)
    }
}
