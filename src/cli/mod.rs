//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;
pub mod output;
pub mod progress;

/// Skillmart - hybrid keyword and semantic search over a skills catalog
#[derive(Parser, Debug)]
#[command(name = "skillmart")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Emit machine-readable JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/skillmart/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database path, overrides storage.database
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import skills from a JSON or YAML catalog
    Import(commands::import::ImportArgs),

    /// Search the catalog
    Search(commands::search::SearchArgs),

    /// Embed a piece of text with the configured provider
    Embed(commands::embed::EmbedArgs),

    /// List skills whose embedding is missing or stale
    Stale(commands::stale::StaleArgs),

    /// Regenerate stale embeddings
    Refresh(commands::refresh::RefreshArgs),
}
