//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub mod embed;
pub mod import;
pub mod refresh;
pub mod search;
pub mod stale;

pub async fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Import(args) => import::run(ctx, args),
        Commands::Search(args) => search::run(ctx, args).await,
        Commands::Embed(args) => embed::run(ctx, args).await,
        Commands::Stale(args) => stale::run(ctx, args).await,
        Commands::Refresh(args) => refresh::run(ctx, args).await,
    }
}
