//! skillmart search - Rank catalog skills for a query
//!
//! Keyword, semantic or hybrid (weighted 0.6/0.4) ranking over the active
//! skills that pass the category/tag/popularity filters.

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::emit_ok;
use crate::core::Label;
use crate::error::Result;
use crate::search::{QueryResult, SearchMode, SearchOptions, SearchResponse};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Search mode: hybrid (default), keyword, semantic
    #[arg(long, short, default_value = "hybrid")]
    pub mode: String,

    /// Maximum number of results (0 uses the configured default)
    #[arg(long, short, default_value = "0", allow_negative_numbers = true)]
    pub limit: i64,

    /// Number of ranked results to skip
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub offset: i64,

    /// Only skills in this category (slug)
    #[arg(long, short)]
    pub category: Option<String>,

    /// Only skills carrying any of these tags (repeatable)
    #[arg(long = "tag", short = 't', value_name = "TAG")]
    pub tags: Vec<String>,

    /// Minimum popularity score
    #[arg(long)]
    pub min_popularity: Option<f64>,
}

impl SearchArgs {
    pub fn options(&self) -> SearchOptions {
        let mut options =
            SearchOptions::from_raw(self.limit, self.offset).with_tags(self.tags.clone());
        if let Some(category) = &self.category {
            options = options.with_category(category.clone());
        }
        if let Some(min) = self.min_popularity {
            options = options.with_min_popularity(min);
        }
        options
    }
}

#[derive(Serialize)]
struct SearchHit {
    id: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    score: f64,
    match_reasons: Vec<String>,
    categories: Vec<String>,
    tags: Vec<String>,
}

impl From<&QueryResult> for SearchHit {
    fn from(result: &QueryResult) -> Self {
        let slugs =
            |labels: &[Label]| -> Vec<String> { labels.iter().map(|l| l.slug.clone()).collect() };
        Self {
            id: result.skill.id.clone(),
            name: result.skill.name.clone(),
            description: result.skill.description.clone(),
            score: result.score,
            match_reasons: result.match_reasons.clone(),
            categories: slugs(&result.skill.categories),
            tags: slugs(&result.skill.tags),
        }
    }
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    mode: SearchMode,
    total: u64,
    results: Vec<SearchHit>,
}

pub async fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let mode: SearchMode = args.mode.parse()?;
    let response = ctx.engine().search(&args.query, mode, &args.options()).await?;

    if ctx.json {
        return emit_ok(SearchOutput {
            query: &args.query,
            mode,
            total: response.total,
            results: response.results.iter().map(SearchHit::from).collect(),
        });
    }
    if !ctx.quiet {
        print_human(&args.query, mode, &response);
    }
    Ok(())
}

fn print_human(query: &str, mode: SearchMode, response: &SearchResponse) {
    if response.results.is_empty() {
        println!("{} for \"{}\"", "No results".yellow(), query);
        return;
    }

    println!(
        "{} ({} mode, {} substring matches)",
        format!("Results for \"{query}\"").bold(),
        mode.to_string().cyan(),
        response.total
    );
    println!();

    for (rank, result) in response.results.iter().enumerate() {
        println!(
            "{:>3}. {} {} {}",
            rank + 1,
            result.skill.name.bold(),
            format!("[{}]", result.skill.id).dimmed(),
            format!("{:.2}", result.score).green()
        );
        if let Some(description) = &result.skill.description {
            println!("     {description}");
        }
        if !result.match_reasons.is_empty() {
            println!("     {}", result.match_reasons.join(", ").dimmed());
        }
    }
}
