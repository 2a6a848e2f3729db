use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use appsearch_cli::{init_tracing, load_settings, open_engine};
use appsearch_hybrid::SearchContext;
use appsearch_serve::{serve, AppState};

/// Serve the search API over HTTP.
#[derive(Parser)]
#[command(name = "appsearch-server", version)]
struct Args {
    #[arg(long)]
    store: Option<PathBuf>,
    /// Defaults to server.host
    #[arg(long)]
    host: Option<String>,
    /// Defaults to server.port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let settings = load_settings(args.store)?;
    let host = args.host.unwrap_or_else(|| settings.host.clone());
    let port = args.port.unwrap_or(settings.port);

    let (engine, report) = tokio::task::spawn_blocking({
        let settings = settings.clone();
        move || open_engine(&settings)
    })
    .await??;
    info!(loaded = report.loaded, excluded = report.excluded(), model = engine.embedder().model_id(), "index ready");

    println!("\n{}", "=".repeat(60));
    println!("🚀 App Search Engine");
    println!("{}", "=".repeat(60));
    println!("📊 Loaded {} apps", report.loaded);
    println!("🌐 http://{host}:{port}");
    println!("{}\n", "=".repeat(60));

    let state = AppState::new(Arc::new(SearchContext::new(engine)), settings.store_path.clone());
    serve(state, &host, port).await
}
