//! skillmart stale - List active skills that need a new embedding

use chrono::Utc;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::emit_ok;
use crate::error::Result;
use crate::search::SearchFilters;
use crate::storage::CandidateStore;

#[derive(Args, Debug)]
pub struct StaleArgs {
    /// Print ids only, one per line
    #[arg(long)]
    pub ids: bool,
}

#[derive(Serialize)]
struct StaleSkill {
    id: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    embedding_updated_at: Option<String>,
}

#[derive(Serialize)]
struct StaleOutput {
    scanned: usize,
    count: usize,
    freshness_days: u64,
    stale: Vec<StaleSkill>,
}

pub async fn run(ctx: &AppContext, args: &StaleArgs) -> Result<()> {
    let engine = ctx.engine();
    let now = Utc::now();
    let skills = ctx.store.fetch_candidates(&SearchFilters::default()).await?;

    let stale: Vec<StaleSkill> = skills
        .iter()
        .filter(|skill| engine.is_embedding_stale_at(skill, now))
        .map(|skill| StaleSkill {
            id: skill.id.clone(),
            name: skill.name.clone(),
            embedding_updated_at: skill.embedding_updated_at.map(|at| at.to_rfc3339()),
        })
        .collect();

    if ctx.json {
        return emit_ok(StaleOutput {
            scanned: skills.len(),
            count: stale.len(),
            freshness_days: ctx.config.embedding.freshness_days,
            stale,
        });
    }

    if args.ids {
        for skill in &stale {
            println!("{}", skill.id);
        }
        return Ok(());
    }
    if ctx.quiet {
        return Ok(());
    }

    if stale.is_empty() {
        println!("{} all {} embeddings are fresh", "OK".green().bold(), skills.len());
        return Ok(());
    }
    println!(
        "{} of {} active skills have a missing or stale embedding",
        stale.len().to_string().yellow().bold(),
        skills.len()
    );
    for skill in &stale {
        let when = skill
            .embedding_updated_at
            .as_deref()
            .unwrap_or("never embedded");
        println!("  {} {} {}", skill.id.cyan(), skill.name, format!("({when})").dimmed());
    }
    Ok(())
}
