//! `huntermatch`: serve the chat API or load scraped reviews into the vector index.

use std::path::PathBuf;
use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use ai_llm_service::config::default_config::{
    embedding_config_from_env, generation_config_from_env,
};
use ai_llm_service::telemetry;
use anyhow::Context;
use api::AppState;
use clap::{Parser, Subcommand};
use review_store::ReviewStore;
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "huntermatch", version, about = "Professor recommendations over student reviews")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API and chat page (default)
    Serve {
        /// Bind address, overrides API_ADDRESS
        #[arg(long)]
        addr: Option<String>,
    },
    /// Embed a JSON/JSONL review dump and upsert it into the index
    Ingest {
        /// Path to the dump
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(telemetry::layer())
        .with(telemetry::env_filter("info", Level::INFO))
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Serve { addr: None }) {
        Commands::Serve { addr } => {
            let addr = addr.unwrap_or_else(api::address_from_env);
            let state = Arc::new(AppState::from_env());
            api::start(state, &addr).await?;
        }
        Commands::Ingest { path } => ingest(path).await?,
    }
    Ok(())
}

async fn ingest(path: PathBuf) -> anyhow::Result<()> {
    let generation = generation_config_from_env().context("generation profile")?;
    let embedding = embedding_config_from_env().context("embedding profile")?;
    let llm = LlmServiceProfiles::new(generation, embedding, None)?;
    let store = ReviewStore::from_env().context("vector index")?;

    info!(path = %path.display(), index = store.index_name(), "ingesting reviews");
    let report = store
        .ingest_file(&path, &llm)
        .await
        .with_context(|| format!("ingesting {}", path.display()))?;

    info!(
        read = report.read,
        malformed = report.malformed,
        skipped = report.skipped,
        upserted = report.upserted,
        "ingestion finished"
    );
    println!(
        "read {} entries ({} malformed, {} skipped), upserted {} vectors into {}",
        report.read,
        report.malformed,
        report.skipped,
        report.upserted,
        store.index_name()
    );
    Ok(())
}
