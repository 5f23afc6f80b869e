//! Command-line interface for metasurf.

mod analyze;
mod cache;
mod common;
mod interactive;
mod stats;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "metasurf",
    version,
    about = "The easiest way to know an artistic work"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a single work and print the result
    Analyze {
        /// Title of the work
        #[arg(long)]
        title: String,
        /// Author, artist or director
        #[arg(long)]
        author: String,
        /// One of: film, music, literature, visual_art
        #[arg(long)]
        category: String,
    },
    /// Show usage statistics
    Stats,
    /// Cache maintenance
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Show cache size and entry ages
    Status,
    /// Remove expired entries
    Sweep,
    /// Remove all entries
    Clear,
}

/// Dispatch a parsed command line. No subcommand starts the interactive
/// form.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Command::Analyze {
            title,
            author,
            category,
        }) => analyze::cmd_analyze(&title, &author, &category).await,
        Some(Command::Stats) => stats::cmd_stats(),
        Some(Command::Cache { action }) => cache::cmd_cache(action),
        None => interactive::cmd_interactive().await,
    }
}
