//! Analyze command: the full research report.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::commands::Context;
use crate::output::print_success;

/// Arguments for the analyze command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Stock ticker to analyze
    pub ticker: String,

    /// Second ticker to compare against
    #[arg(long)]
    pub compare: Option<String>,

    /// Directory to save the report in (defaults to the configured one)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

pub async fn execute(args: AnalyzeArgs, ctx: &Context) -> Result<()> {
    let report = ctx
        .service
        .full_analysis(&args.ticker, args.compare.as_deref())
        .await;

    ctx.output.render(&report, || report.to_markdown())?;

    let output_dir = args
        .output_dir
        .or_else(|| ctx.config.reports.output_dir.clone());
    if let Some(dir) = output_dir {
        let path = report.save(&dir)?;
        print_success(&format!("Report saved to: {}", path.display()));
    }
    Ok(())
}
