//! skillmart embed - Inspect the configured embedding provider
//!
//! Embeds the given text (normalized first, as the search path does) and
//! prints summary statistics, optionally the cosine similarity with a
//! second text.

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_ok};
use crate::error::Result;
use crate::search::normalize::normalize;
use crate::search::similarity::{cosine_similarity, l2_norm};

#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// Text to embed
    pub text: String,

    /// Include the full vector in the output
    #[arg(long)]
    pub full: bool,

    /// Compare with another text (show similarity)
    #[arg(long, short)]
    pub compare: Option<String>,
}

#[derive(Serialize)]
struct EmbedOutput {
    provider: String,
    dims: usize,
    normalized_text: String,
    norm: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    similarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    embedding: Option<Vec<f32>>,
}

pub async fn run(ctx: &AppContext, args: &EmbedArgs) -> Result<()> {
    let engine = ctx.engine();
    let normalized_text = normalize(&args.text);
    let embedding = engine.generate_embedding(&normalized_text).await;

    let similarity = match &args.compare {
        Some(other) => {
            let other = engine.generate_embedding(&normalize(other)).await;
            Some(cosine_similarity(&embedding, &other))
        }
        None => None,
    };

    let output = EmbedOutput {
        provider: ctx.embedder.name().to_string(),
        dims: embedding.len(),
        norm: l2_norm(&embedding),
        normalized_text,
        similarity,
        embedding: args.full.then(|| embedding.clone()),
    };

    if ctx.json {
        return emit_ok(output);
    }
    if ctx.quiet {
        return Ok(());
    }

    let mut layout = HumanLayout::new();
    layout
        .title("Embedding")
        .kv("provider", &output.provider.cyan().to_string())
        .kv("dims", &output.dims.to_string())
        .kv("input", &format!("\"{}\"", output.normalized_text))
        .kv("l2 norm", &format!("{:.6}", output.norm));
    if let Some(sim) = output.similarity {
        layout.kv("similarity", &format!("{sim:.6}").green().to_string());
    }

    let shown = if args.full { embedding.len() } else { embedding.len().min(8) };
    let head: Vec<String> = embedding[..shown].iter().map(|x| format!("{x:.4}")).collect();
    let suffix = if shown < embedding.len() { ", ..." } else { "" };
    layout.kv("values", &format!("[{}{suffix}]", head.join(", ")));

    emit_human(layout);
    Ok(())
}
