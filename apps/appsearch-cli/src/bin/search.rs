use std::path::PathBuf;

use clap::Parser;

use appsearch_cli::{init_tracing, load_settings, open_engine};
use appsearch_core::types::QueryRequest;

/// Run one hybrid query against the store and print the ranking.
#[derive(Parser)]
#[command(name = "appsearch-search", version)]
struct Args {
    query: String,
    #[arg(long, short = 'k')]
    top_k: Option<usize>,
    #[arg(long)]
    store: Option<PathBuf>,
    /// Print the results as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let settings = load_settings(args.store)?;
    let (engine, report) = open_engine(&settings)?;
    if report.excluded() > 0 {
        eprintln!("⚠️  {} of {} apps excluded from the index", report.excluded(), report.total);
    }

    let request = QueryRequest { query: args.query, top_k: args.top_k };
    let results = engine.run(&request)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!("🔍 {} ({} apps indexed)\n", request.query, engine.len());
    if results.is_empty() {
        println!("No results.");
    }
    for (i, r) in results.iter().enumerate() {
        println!("{}. {} [{}]  score {:.3}", i + 1, r.app.name, r.app.category, r.final_score);
        println!(
            "   semantic {:.3} | keyword {:.2} | category {:.1}",
            r.semantic_score, r.keyword_score, r.category_boost
        );
    }
    Ok(())
}
