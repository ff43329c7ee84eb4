//! skillmart refresh - Regenerate missing or stale embeddings

use std::time::Duration;

use chrono::Utc;
use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::emit_ok;
use crate::cli::progress::{ProgressHandle, ProgressMode};
use crate::error::Result;
use crate::search::{RefreshOptions, refresh_embeddings};

#[derive(Args, Debug)]
pub struct RefreshArgs {
    /// Re-embed every active skill, fresh or not
    #[arg(long)]
    pub force: bool,

    /// Texts per embedding request (default: embedding.batch_size)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Pause between batches in milliseconds (default: embedding.throttle_ms)
    #[arg(long)]
    pub throttle_ms: Option<u64>,
}

impl RefreshArgs {
    fn options(&self, ctx: &AppContext) -> RefreshOptions {
        let embedding = &ctx.config.embedding;
        RefreshOptions {
            force: self.force,
            batch_size: self.batch_size.unwrap_or(embedding.batch_size).max(1),
            throttle: Duration::from_millis(self.throttle_ms.unwrap_or(embedding.throttle_ms)),
            freshness_window: embedding.freshness_window(),
            now: Utc::now(),
        }
    }
}

pub async fn run(ctx: &AppContext, args: &RefreshArgs) -> Result<()> {
    let options = args.options(ctx);
    let mode = ProgressMode::detect(ctx.json, ctx.quiet);

    let mut bar: Option<ProgressHandle> = None;
    let report = refresh_embeddings(
        ctx.store.as_ref(),
        ctx.embedder.as_ref(),
        &options,
        &mut |done, total| {
            let handle = bar.get_or_insert_with(|| {
                ProgressHandle::start(mode, total as u64, "Embedding skills")
            });
            handle.set_position(done as u64);
        },
    )
    .await?;
    if let Some(handle) = &bar {
        handle.finish_with_message("embeddings stored");
    }

    if ctx.json {
        return emit_ok(report);
    }
    if ctx.quiet {
        return Ok(());
    }

    println!(
        "{} {} embeddings with {} ({} fresh, {} scanned)",
        "Refreshed".green().bold(),
        report.refreshed,
        ctx.embedder.name().cyan(),
        report.skipped,
        report.scanned
    );
    Ok(())
}
