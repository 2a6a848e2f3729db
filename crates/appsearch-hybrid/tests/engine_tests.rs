use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use appsearch_core::digest::Sha256Hasher;
use appsearch_core::store::save_store_atomic;
use appsearch_core::traits::Embedder;
use appsearch_core::types::{CatalogEntry, CatalogStore, QueryRequest};
use appsearch_core::ErrorKind;
use appsearch_embed::FakeEmbedder;
use appsearch_hybrid::{SearchContext, SearchEngine};
use appsearch_vector::{build_index, BuildOptions};

/// Returns fixed vectors per text and counts calls.
struct TableEmbedder {
    table: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl TableEmbedder {
    fn new(pairs: &[(&str, Vec<f32>)]) -> Self {
        Self { table: pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(), calls: AtomicUsize::new(0) }
    }
}

impl Embedder for TableEmbedder {
    fn model_id(&self) -> &str { "table" }
    fn dim(&self) -> usize { 2 }
    fn embed_text(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table.get(text).cloned().ok_or_else(|| anyhow::anyhow!("no vector for '{text}'"))
    }
}

fn app(id: &str, name: &str, category: &str, features: &[&str], text: &str, emb: Option<Vec<f32>>) -> CatalogEntry {
    let mut e = CatalogEntry::new(id, name, category);
    e.features = features.iter().map(|s| s.to_string()).collect();
    e.search_text = Some(text.to_string());
    e.embedding = emb;
    e
}

fn photo_and_code_store() -> CatalogStore {
    CatalogStore {
        apps: vec![
            app("photoedit", "PhotoEdit", "graphics", &["filters", "crop"], "PhotoEdit graphics editor with filters and crop", None),
            app("codeide", "CodeIDE", "dev-tools", &["syntax highlighting"], "CodeIDE code editor with syntax highlighting", None),
        ],
        ..CatalogStore::default()
    }
}

#[test]
fn graphics_filters_ranks_photoedit_first() {
    let embedder: Arc<dyn Embedder> = Arc::new(FakeEmbedder::new(256));
    let (store, _) = build_index(photo_and_code_store(), embedder.as_ref(), &Sha256Hasher, &BuildOptions::default()).unwrap();
    let (engine, report) = SearchEngine::from_store(&store, embedder).unwrap();
    assert_eq!(report.loaded, 2);

    let results = engine.search("graphics filters", None).unwrap();
    assert_eq!(results.len(), 2);
    let (photo, code) = (&results[0], &results[1]);
    assert_eq!(photo.app.id, "photoedit");
    assert!(photo.final_score > code.final_score);
    assert!(photo.keyword_score > 0.0 && photo.category_boost == 1.0);
    assert_eq!((code.keyword_score, code.category_boost), (0.0, 0.0));
}

#[test]
fn scores_are_exposed_and_fused() {
    let embedder = Arc::new(TableEmbedder::new(&[("crop tool", vec![1.0, 0.0])]));
    let store = CatalogStore {
        apps: vec![
            app("a", "Cropper", "photo", &["crop"], "a", Some(vec![3.0, 4.0])),
            app("b", "Other", "misc", &[], "b", Some(vec![0.0, 2.0])),
        ],
        ..CatalogStore::default()
    };
    let (engine, _) = SearchEngine::from_store(&store, embedder).unwrap();
    let results = engine.search("crop tool", Some(10)).unwrap();
    assert_eq!(results.len(), 2, "top_k larger than the catalog returns everything");
    let a = &results[0];
    assert_eq!(a.app.id, "a");
    assert!((a.semantic_score - 0.6).abs() < 1e-6);
    assert!((a.keyword_score - 0.2).abs() < 1e-6);
    assert_eq!(a.category_boost, 0.0);
    assert!((a.final_score - (0.5 * 0.6 + 0.3 * 0.2)).abs() < 1e-6);
    assert!(results[1].semantic_score.abs() < 1e-6);
}

#[test]
fn empty_query_is_rejected_without_embedding() {
    let embedder = Arc::new(TableEmbedder::new(&[]));
    let store = CatalogStore { apps: vec![app("a", "A", "x", &[], "a", Some(vec![1.0, 0.0]))], ..CatalogStore::default() };
    let (engine, _) = SearchEngine::from_store(&store, embedder.clone()).unwrap();

    let err = engine.search("", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn whitespace_query_is_embedded_and_ranked() {
    let embedder = Arc::new(TableEmbedder::new(&[("   ", vec![1.0, 0.0])]));
    let store = CatalogStore { apps: vec![app("a", "A", "x", &[], "a", Some(vec![1.0, 0.0]))], ..CatalogStore::default() };
    let (engine, _) = SearchEngine::from_store(&store, embedder.clone()).unwrap();

    let results = engine.run(&QueryRequest { query: "   ".to_string(), top_k: None }).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].keyword_score, 0.0);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn blank_category_always_boosts() {
    let embedder = Arc::new(TableEmbedder::new(&[("graphics filters", vec![1.0, 0.0])]));
    let store = CatalogStore {
        apps: vec![
            app("nocat", "Nocat", "", &[], "nocat", Some(vec![1.0, 0.0])),
            app("other", "Other", "office", &[], "other", Some(vec![1.0, 0.0])),
        ],
        ..CatalogStore::default()
    };
    let (engine, _) = SearchEngine::from_store(&store, embedder).unwrap();
    let results = engine.search("graphics filters", None).unwrap();

    let nocat = &results[0];
    assert_eq!(nocat.app.id, "nocat");
    assert_eq!(nocat.category_boost, 1.0);
    assert!((nocat.final_score - 0.7).abs() < 1e-6);
    assert_eq!(results[1].category_boost, 0.0);
}

#[test]
fn query_embedding_failure_is_dependency_error() {
    let embedder = Arc::new(TableEmbedder::new(&[("zero", vec![0.0, 0.0]), ("wide", vec![1.0, 0.0, 0.0])]));
    let store = CatalogStore { apps: vec![app("a", "A", "x", &[], "a", Some(vec![1.0, 0.0]))], ..CatalogStore::default() };
    let (engine, _) = SearchEngine::from_store(&store, embedder).unwrap();
    for q in ["unknown text", "zero", "wide"] {
        assert_eq!(engine.search(q, None).unwrap_err().kind(), ErrorKind::DependencyError, "query {q}");
    }
}

#[test]
fn weak_query_still_gets_ranked_results() {
    let embedder = Arc::new(TableEmbedder::new(&[("zzz", vec![0.1, 1.0])]));
    let store = CatalogStore {
        apps: vec![
            app("a", "A", "x", &[], "a", Some(vec![1.0, 0.0])),
            app("b", "B", "y", &[], "b", Some(vec![0.0, 1.0])),
        ],
        ..CatalogStore::default()
    };
    let (engine, _) = SearchEngine::from_store(&store, embedder).unwrap();
    let results = engine.search("zzz", Some(1)).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].app.id, "b");
    assert_eq!((results[0].keyword_score, results[0].category_boost), (0.0, 0.0));
}

#[test]
fn embedder_dimension_must_match_store() {
    let embedder = Arc::new(FakeEmbedder::new(8));
    let store = CatalogStore { apps: vec![app("a", "A", "x", &[], "a", Some(vec![1.0, 0.0]))], ..CatalogStore::default() };
    let err = SearchEngine::from_store(&store, embedder).err().expect("dim mismatch");
    assert_eq!(err.kind(), ErrorKind::ConfigurationError);
}

#[test]
fn context_reload_swaps_snapshot_atomically() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("apps.json");
    let embedder: Arc<dyn Embedder> = Arc::new(FakeEmbedder::new(64));

    let (store, _) = build_index(photo_and_code_store(), embedder.as_ref(), &Sha256Hasher, &BuildOptions::default()).unwrap();
    let (engine, _) = SearchEngine::from_store(&store, Arc::clone(&embedder)).unwrap();
    let ctx = SearchContext::new(engine.with_default_top_k(1));
    let old = ctx.snapshot();
    assert_eq!(old.len(), 2);

    let mut grown = photo_and_code_store();
    grown.apps.push(app("notes", "Notes", "productivity", &["markdown"], "Notes markdown notebook", None));
    let (grown, _) = build_index(grown, embedder.as_ref(), &Sha256Hasher, &BuildOptions::default()).unwrap();
    save_store_atomic(&path, &grown).unwrap();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..50 {
                    let results = ctx.search("markdown notes", None).unwrap();
                    assert_eq!(results.len(), 1, "default top_k survives reload");
                }
            });
        }
        s.spawn(|| ctx.reload_from(&path).unwrap());
    });

    assert_eq!(ctx.snapshot().len(), 3);
    assert_eq!(old.len(), 2, "earlier snapshot is unaffected");
    assert_eq!(ctx.search("markdown notes", None).unwrap()[0].app.id, "notes");

    std::fs::write(&path, "{ broken").unwrap();
    assert_eq!(ctx.reload_from(&path).unwrap_err().kind(), ErrorKind::ConfigurationError);
    assert_eq!(ctx.snapshot().len(), 3, "failed reload keeps the current index");
}
