//! In-memory matrix of unit-norm entry vectors, built once per store load.

use appsearch_core::error::{Error, Result};
use appsearch_core::types::{CatalogEntry, CatalogStore};
use serde::Serialize;
use tracing::{info, warn};

/// Counts of entries dropped while loading. Non-zero exclusions mean the
/// catalog is degraded and the builder should be re-run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub total: usize,
    pub loaded: usize,
    pub missing_embedding: usize,
    pub missing_text: usize,
    pub zero_norm: usize,
}

impl LoadReport {
    pub fn excluded(&self) -> usize { self.missing_embedding + self.missing_text + self.zero_norm }
}

/// Scale `v` to unit L2 norm in place. Returns `false` (leaving `v` as is)
/// when the norm is zero or not finite.
pub fn l2_normalize(v: &mut [f32]) -> bool {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 || !norm.is_finite() { return false; }
    for x in v.iter_mut() { *x /= norm; }
    true
}

/// Read-only after construction; rows are stored contiguously.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    entries: Vec<CatalogEntry>,
    vectors: Vec<f32>,
    dim: usize,
}

impl VectorIndex {
    pub fn load(store: &CatalogStore) -> Result<(Self, LoadReport)> {
        Self::from_entries(&store.apps)
    }

    pub fn from_entries(apps: &[CatalogEntry]) -> Result<(Self, LoadReport)> {
        let mut report = LoadReport { total: apps.len(), ..LoadReport::default() };
        let mut dim: Option<(usize, &str)> = None;
        for app in apps {
            let Some(v) = app.embedding() else { continue };
            match dim {
                None => dim = Some((v.len(), app.id.as_str())),
                Some((d, first)) if d != v.len() => {
                    return Err(Error::Configuration(format!(
                        "embedding dimension mismatch: '{}' has {} values but '{}' has {}",
                        app.id, v.len(), first, d
                    )));
                }
                Some(_) => {}
            }
        }
        let dim = dim.map(|(d, _)| d).unwrap_or(0);

        let mut entries = Vec::new();
        let mut vectors = Vec::new();
        for app in apps {
            let Some(v) = app.embedding() else { report.missing_embedding += 1; continue };
            if app.search_text().is_none() { report.missing_text += 1; continue; }
            let mut row = v.to_vec();
            if !l2_normalize(&mut row) { report.zero_norm += 1; continue; }
            vectors.extend_from_slice(&row);
            entries.push(app.clone());
        }
        report.loaded = entries.len();

        if report.excluded() > 0 {
            warn!(
                missing_embedding = report.missing_embedding,
                missing_text = report.missing_text,
                zero_norm = report.zero_norm,
                "excluded {} of {} catalog entries from search",
                report.excluded(),
                report.total
            );
        }
        info!(loaded = report.loaded, dim, "vector index ready");
        Ok((Self { entries, vectors, dim }, report))
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Shared dimensionality; 0 when the store had no embeddings at all.
    pub fn dim(&self) -> usize { self.dim }

    pub fn entries(&self) -> &[CatalogEntry] { &self.entries }

    pub fn vector(&self, i: usize) -> &[f32] { &self.vectors[i * self.dim..(i + 1) * self.dim] }

    /// Dot product of `query` against every row, in catalog order.
    pub fn dot_all(&self, query: &[f32]) -> Vec<f32> {
        debug_assert_eq!(query.len(), self.dim);
        (0..self.len())
            .map(|i| self.vector(i).iter().zip(query).map(|(a, b)| a * b).sum())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, text: Option<&str>, emb: Option<Vec<f32>>) -> CatalogEntry {
        let mut e = CatalogEntry::new(id, id, "c");
        e.search_text = text.map(str::to_string);
        e.embedding = emb;
        e
    }

    #[test]
    fn normalizes_every_row() {
        let apps = vec![
            entry("a", Some("a"), Some(vec![3.0, 4.0, 0.0])),
            entry("b", Some("b"), Some(vec![-1.0, 1.0, 1.0])),
            entry("c", Some("c"), Some(vec![1e-3, 0.0, 0.0])),
        ];
        let (idx, report) = VectorIndex::from_entries(&apps).unwrap();
        assert_eq!((idx.len(), idx.dim(), report.loaded), (3, 3, 3));
        for i in 0..idx.len() {
            let norm: f32 = idx.vector(i).iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-6, "row {i} norm {norm}");
        }
        assert!((idx.vector(0)[0] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn excludes_and_counts_unusable_entries() {
        let apps = vec![
            entry("ok", Some("ok"), Some(vec![1.0, 0.0])),
            entry("no-emb", Some("x"), None),
            entry("empty-emb", Some("x"), Some(vec![])),
            entry("no-text", None, Some(vec![0.0, 1.0])),
            entry("zero", Some("z"), Some(vec![0.0, 0.0])),
        ];
        let (idx, report) = VectorIndex::from_entries(&apps).unwrap();
        assert_eq!(idx.entries().iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), vec!["ok"]);
        assert_eq!(report, LoadReport { total: 5, loaded: 1, missing_embedding: 2, missing_text: 1, zero_norm: 1 });
    }

    #[test]
    fn dimension_mismatch_is_fatal() {
        let apps = vec![
            entry("a", Some("a"), Some(vec![1.0, 0.0])),
            entry("b", Some("b"), Some(vec![1.0, 0.0, 0.0])),
        ];
        let err = VectorIndex::from_entries(&apps).unwrap_err();
        assert_eq!(err.kind(), appsearch_core::ErrorKind::ConfigurationError);
        assert!(err.to_string().contains("'b'"));
    }

    #[test]
    fn empty_store_loads_empty_index() {
        let (idx, report) = VectorIndex::load(&CatalogStore::default()).unwrap();
        assert!(idx.is_empty());
        assert_eq!(idx.dim(), 0);
        assert_eq!(report.total, 0);
    }
}
