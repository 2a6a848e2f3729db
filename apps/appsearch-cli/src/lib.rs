//! Shared setup for the appsearch binaries.

use std::path::PathBuf;

use anyhow::{Context, Result};
use appsearch_core::config::{Config, Settings};
use appsearch_core::store::load_store;
use appsearch_hybrid::SearchEngine;
use appsearch_vector::LoadReport;
use tracing_subscriber::EnvFilter;

/// Log to stderr; `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

/// Settings from config files and `APP_*` env vars, with an optional
/// command-line store path taking precedence.
pub fn load_settings(store: Option<PathBuf>) -> Result<Settings> {
    let config = Config::load().context("loading configuration")?;
    let mut settings = Settings::from_config(&config)?;
    if let Some(path) = store {
        settings.store_path = path;
    }
    Ok(settings)
}

/// Load the store and build a search snapshot with the configured embedder.
pub fn open_engine(settings: &Settings) -> Result<(SearchEngine, LoadReport)> {
    let store = load_store(&settings.store_path)
        .with_context(|| format!("opening store {}", settings.store_path.display()))?;
    let embedder = appsearch_embed::get_default_embedder(settings)?;
    let (engine, report) = SearchEngine::from_store(&store, embedder)?;
    Ok((engine.with_default_top_k(settings.default_top_k), report))
}
