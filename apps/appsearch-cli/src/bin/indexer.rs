use std::path::PathBuf;

use clap::Parser;

use appsearch_cli::{init_tracing, load_settings};
use appsearch_core::digest::hasher_by_name;
use appsearch_embed::get_default_embedder;
use appsearch_vector::{rebuild_store_file, BuildOptions};

/// Embed every catalog entry whose search text changed since the last run.
#[derive(Parser)]
#[command(name = "appsearch-indexer", version)]
struct Args {
    /// Store file (defaults to data.store_path)
    #[arg(long)]
    store: Option<PathBuf>,
    /// Fail without writing if any entry cannot be embedded
    #[arg(long)]
    strict: bool,
    #[arg(long)]
    no_progress: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let settings = load_settings(args.store)?;
    let hasher = hasher_by_name(&settings.digest)?;
    let embedder = get_default_embedder(&settings)?;

    println!("App Catalog Indexer\n===================");
    println!("Store: {}", settings.store_path.display());
    println!("Model: {} ({} dims)", embedder.model_id(), embedder.dim());

    let options = BuildOptions { strict: args.strict, show_progress: !args.no_progress };
    let report = rebuild_store_file(&settings.store_path, embedder.as_ref(), hasher.as_ref(), &options)?;

    println!("\n✅ Embedding updated: {} app(s)", report.regenerated);
    println!("📊 Unchanged: {}", report.unchanged);
    if !report.missing_text.is_empty() {
        println!("⚠️  Skipped (no search_text): {}", report.missing_text.join(", "));
    }
    for (id, msg) in &report.failed {
        println!("❌ {id}: {msg}");
    }
    println!("\n💡 To search, use: cargo run --bin appsearch-search '<query>'");
    Ok(())
}
