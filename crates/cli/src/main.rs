//! Stock research CLI.
//!
//! # Usage
//!
//! ```bash
//! # Company snapshot
//! stock-research fetch GOLF
//!
//! # DCF from market data, or from manual inputs (millions)
//! stock-research dcf --ticker GOLF --wacc 0.10
//! stock-research dcf --fcf 150 --growth 0.06 --shares 64 --debt 500
//!
//! # Side-by-side comparison
//! stock-research compare GOLF MODG
//!
//! # Latest 10-K risk factors
//! stock-research filings GOLF --type 10-K --fetch 0 --section risk
//!
//! # Full report saved to a directory
//! stock-research analyze GOLF --compare MODG --output-dir reports
//! ```
//!
//! Reports go to stdout; progress and errors go to stderr.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stock_research_core::config::ResearchConfig;
use stock_research_sdk::{ResearchService, StockResearchClient};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};
use commands::Context;
use output::Output;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = ResearchConfig::load(&cli.config)?;
    if let Commands::Dcf(args) = &cli.command {
        if let Some(years) = args.years {
            config.dcf.projection_years = years;
        }
    }

    let client = StockResearchClient::builder()
        .http_settings(&config.http)
        .build()?;
    let service = ResearchService::new(client, config.dcf.clone());

    let ctx = Context {
        config,
        service,
        output: Output {
            format: cli.output,
            out_file: cli.out_file,
        },
    };

    let outcome = match cli.command {
        Commands::Fetch(args) => commands::fetch::execute(args, &ctx).await,
        Commands::Dcf(args) => commands::dcf::execute(args, &ctx).await,
        Commands::Compare(args) => commands::compare::execute(args, &ctx).await,
        Commands::Filings(args) => commands::filings::execute(args, &ctx).await,
        Commands::News(args) => commands::news::execute(args, &ctx).await,
        Commands::Ratings(args) => commands::ratings::execute(args, &ctx).await,
        Commands::Analyze(args) => commands::analyze::execute(args, &ctx).await,
    };

    if let Err(e) = outcome {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}
