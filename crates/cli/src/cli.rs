//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use stock_research_core::config::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};

use crate::commands::{
    AnalyzeArgs, CompareArgs, DcfArgs, FetchArgs, FilingsArgs, NewsArgs, RatingsArgs,
};

/// Stock research from Yahoo Finance and SEC EDGAR
#[derive(Parser)]
#[command(name = "stock-research")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "markdown", global = true)]
    pub output: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(long, global = true, value_name = "PATH")]
    pub out_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, global = true, env = CONFIG_ENV_VAR, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Company profile, price, valuation, financials and dividends
    Fetch(FetchArgs),

    /// Discounted cash flow valuation, from a ticker or manual inputs
    Dcf(DcfArgs),

    /// Compare stocks side by side
    Compare(CompareArgs),

    /// List SEC EDGAR filings or fetch one filing's text
    Filings(FilingsArgs),

    /// Recent news, optionally with upcoming earnings and dividend dates
    News(NewsArgs),

    /// Analyst price targets, ratings and earnings history
    Ratings(RatingsArgs),

    /// Full analysis: overview, DCF, optional comparison and summary
    Analyze(AnalyzeArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Markdown report
    #[default]
    Markdown,
    /// Pretty-printed JSON
    Json,
}
