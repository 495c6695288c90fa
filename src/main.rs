//! Folio ingest CLI
//!
//! Parses one EPUB file and stores the resulting chunks in the SQLite
//! database configured through the environment.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::{Config, EpubParser, SqliteStore};

#[derive(Parser)]
#[command(name = "folio", version, about = "Ingest an EPUB into the reading feed")]
struct Args {
    /// Path to the EPUB file to ingest
    epub: PathBuf,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env();
    let args = Args::parse();

    tracing::info!("Starting Folio v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Database: {}", config.database_path.display());
    tracing::info!("Working root: {}", config.working_root.display());

    let parser = EpubParser::with_working_root(&config.working_root);
    let mut store = SqliteStore::open(&config.database_path)
        .with_context(|| format!("opening database {}", config.database_path.display()))?;

    let book_id = parser
        .ingest(&args.epub, &mut store)
        .with_context(|| format!("ingesting {}", args.epub.display()))?;

    tracing::info!("Stored book {}", book_id.0);
    Ok(())
}
