//! skillmart import - Load a catalog file into the database

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::catalog::import_catalog;
use crate::cli::output::emit_ok;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Catalog file (.json, .yaml or .yml)
    pub path: PathBuf,
}

#[derive(Serialize)]
struct ImportOutput {
    path: String,
    imported: usize,
    skipped: usize,
    total_skills: u64,
}

pub fn run(ctx: &AppContext, args: &ImportArgs) -> Result<()> {
    let (report, total_skills) = {
        let db = ctx.store.database();
        let report = import_catalog(&db, &args.path)?;
        (report, db.skill_count()?)
    };

    if ctx.json {
        return emit_ok(ImportOutput {
            path: args.path.display().to_string(),
            imported: report.imported,
            skipped: report.skipped,
            total_skills,
        });
    }
    if ctx.quiet {
        return Ok(());
    }

    println!(
        "{} {} skills from {}",
        "Imported".green().bold(),
        report.imported,
        args.path.display().to_string().cyan()
    );
    if report.skipped > 0 {
        println!(
            "  {} {} entries with a blank name",
            "skipped".yellow(),
            report.skipped
        );
    }
    println!("  {} {total_skills} skills in {}", "now".dimmed(), ctx.db_path.display());
    Ok(())
}
