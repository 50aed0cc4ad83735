//! Command-line interface for wortjagd.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Wortjagd - German spelling game with an LLM-backed vocabulary server
#[derive(Parser, Debug)]
#[command(name = "wortjagd")]
#[command(about = "German spelling game with an LLM-backed vocabulary server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play the game in the terminal
    Play {
        /// Path to a TOML settings file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Draw words from the LLM instead of the built-in list
        #[arg(long)]
        generated: bool,

        /// Seed for deterministic board layouts
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run the HTTP server (static assets + vocabulary API)
    Serve {
        /// Path to a TOML settings file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Port to bind to (next higher ports are tried when occupied)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Directory to serve static assets from
        #[arg(long)]
        assets: Option<PathBuf>,
    },

    /// Generate vocabulary words and print them as JSON
    Generate {
        /// Path to a TOML settings file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// How many words to generate
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,

        /// Difficulty level (1-3)
        #[arg(short, long, default_value_t = 1)]
        difficulty: u8,
    },
}
