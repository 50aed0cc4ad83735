//! Wortjagd - unified CLI.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wortjagd::{
    GeneratedWordList, Settings, StaticWordList, Tier, VocabularyEntry, WordSource, serve,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            generated,
            seed,
        } => run_play(config, generated, seed).await,
        Command::Serve {
            config,
            port,
            host,
            assets,
        } => run_serve(config, port, host, assets).await,
        Command::Generate {
            config,
            count,
            difficulty,
        } => run_generate(config, count, difficulty).await,
    }
}

/// Play the game in the terminal.
async fn run_play(config: Option<PathBuf>, generated: bool, seed: Option<u64>) -> Result<()> {
    let settings = Settings::load(config.as_deref())?;
    let source: Arc<dyn WordSource> = if generated {
        let client = settings.llm().create_client()?;
        Arc::new(GeneratedWordList::new(client, *settings.llm().batch_size()))
    } else {
        Arc::new(StaticWordList::new())
    };
    wortjagd::tui::run(settings.game().clone(), source, seed).await
}

/// Run the HTTP server.
async fn run_serve(
    config: Option<PathBuf>,
    port: Option<u16>,
    host: Option<String>,
    assets: Option<PathBuf>,
) -> Result<()> {
    init_tracing();
    let mut settings = Settings::load(config.as_deref())?;
    if let Some(port) = port {
        settings.server_mut().set_port(port);
    }
    if let Some(host) = host {
        settings.server_mut().set_host(host);
    }
    if let Some(assets) = assets {
        settings.server_mut().set_asset_dir(assets);
    }
    serve(&settings).await
}

/// Generate vocabulary words and print them as JSON.
async fn run_generate(config: Option<PathBuf>, count: usize, difficulty: u8) -> Result<()> {
    init_tracing();
    let settings = Settings::load(config.as_deref())?;
    let tier =
        Tier::from_level(difficulty).ok_or_else(|| anyhow::anyhow!("difficulty must be 1-3"))?;
    let client = settings.llm().create_client()?;
    let words = client.generate_vocabulary(count, tier).await?;
    let entries: Vec<VocabularyEntry> = words.iter().map(VocabularyEntry::from).collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
