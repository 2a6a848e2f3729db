//! Incremental embedding backfill for the catalog store.
//!
//! Selection is hash-driven: an entry is re-embedded only when the digest of
//! its `search_text` differs from `content_hash`, or when it has no usable
//! embedding. Work happens on an owned staging copy of the store; the caller
//! persists it (see `rebuild_store_file`) only after the whole pass.

use std::path::Path;

use appsearch_core::error::{Error, Result};
use appsearch_core::store::{load_store, save_store_atomic};
use appsearch_core::traits::{ContentHasher, Embedder};
use appsearch_core::types::{CatalogEntry, CatalogStore, EntryId};
use chrono::{SecondsFormat, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Fail the whole batch if any entry fails to embed.
    pub strict: bool,
    pub show_progress: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildReport {
    pub regenerated: usize,
    pub unchanged: usize,
    pub missing_text: Vec<EntryId>,
    pub failed: Vec<(EntryId, String)>,
}

impl BuildReport {
    /// Number of embedding calls made during the pass.
    pub fn embed_calls(&self) -> usize { self.regenerated + self.failed.len() }
}

enum Plan {
    SkipNoText,
    Unchanged,
    Embed { text: String, digest: String },
}

fn plan_entry(entry: &CatalogEntry, hasher: &dyn ContentHasher, dim: usize) -> Plan {
    let Some(text) = entry.search_text() else { return Plan::SkipNoText };
    let digest = hasher.digest(text);
    let fresh = entry.content_hash.as_deref() == Some(digest.as_str())
        && entry.embedding().is_some_and(|v| v.len() == dim);
    if fresh { Plan::Unchanged } else { Plan::Embed { text: text.to_string(), digest } }
}

fn check_vector(v: &[f32], dim: usize) -> std::result::Result<(), String> {
    if v.is_empty() { return Err("embedder returned an empty vector".to_string()); }
    if v.len() != dim { return Err(format!("dim mismatch: got {} expected {}", v.len(), dim)); }
    if v.iter().any(|x| !x.is_finite()) { return Err("embedder returned non-finite values".to_string()); }
    Ok(())
}

fn progress_bar(len: usize, show: bool) -> ProgressBar {
    if !show { return ProgressBar::hidden(); }
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} apps ({percent}%) {msg}")
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

/// Bring every entry's embedding in line with its `search_text`.
///
/// Never touches disk. An entry either gets `embedding`, `content_hash` and
/// `embedding_model` updated together or is left exactly as it was.
pub fn build_index(
    mut store: CatalogStore,
    embedder: &dyn Embedder,
    hasher: &dyn ContentHasher,
    options: &BuildOptions,
) -> Result<(CatalogStore, BuildReport)> {
    let mut report = BuildReport::default();
    let pb = progress_bar(store.apps.len(), options.show_progress);

    for entry in store.apps.iter_mut() {
        pb.inc(1);
        match plan_entry(entry, hasher, embedder.dim()) {
            Plan::SkipNoText => {
                warn!(id = %entry.id, "entry has no search_text, skipping");
                report.missing_text.push(entry.id.clone());
            }
            Plan::Unchanged => report.unchanged += 1,
            Plan::Embed { text, digest } => {
                pb.set_message(entry.id.clone());
                info!(id = %entry.id, name = %entry.name, "generating embedding");
                let outcome = embedder
                    .embed_text(&text)
                    .map_err(|e| format!("{e:#}"))
                    .and_then(|v| check_vector(&v, embedder.dim()).map(|()| v));
                match outcome {
                    Ok(vector) => {
                        entry.embedding = Some(vector);
                        entry.content_hash = Some(digest);
                        entry.embedding_model = Some(embedder.model_id().to_string());
                        report.regenerated += 1;
                    }
                    Err(msg) => {
                        warn!(id = %entry.id, error = %msg, "embedding failed, entry left untouched");
                        report.failed.push((entry.id.clone(), msg));
                    }
                }
            }
        }
    }
    pb.finish_and_clear();

    if options.strict {
        if let Some((id, msg)) = report.failed.first() {
            return Err(Error::Dependency(format!(
                "{} entr{} failed to embed (first: {}: {})",
                report.failed.len(),
                if report.failed.len() == 1 { "y" } else { "ies" },
                id,
                msg
            )));
        }
    }

    store.meta.last_updated = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true));
    Ok((store, report))
}

/// Load the store at `path`, rebuild stale embeddings and atomically replace it.
pub fn rebuild_store_file(
    path: &Path,
    embedder: &dyn Embedder,
    hasher: &dyn ContentHasher,
    options: &BuildOptions,
) -> Result<BuildReport> {
    let store = load_store(path)?;
    let (store, report) = build_index(store, embedder, hasher, options)?;
    save_store_atomic(path, &store)?;
    info!(
        regenerated = report.regenerated,
        unchanged = report.unchanged,
        missing_text = report.missing_text.len(),
        failed = report.failed.len(),
        "embedding updated: {} app(s)",
        report.regenerated
    );
    Ok(report)
}
