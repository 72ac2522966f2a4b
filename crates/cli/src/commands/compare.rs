//! Compare command.

use anyhow::Result;
use clap::Args;
use tracing::warn;

use stock_research_core::compare::generate_comparison;

use crate::commands::Context;
use crate::error::CliError;

/// Arguments for the compare command.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Stock tickers to compare
    #[arg(required = true, num_args = 1..)]
    pub tickers: Vec<String>,
}

pub async fn execute(args: CompareArgs, ctx: &Context) -> Result<()> {
    if args.tickers.len() < 2 {
        return Err(CliError::InvalidArgument("Need at least 2 tickers to compare".to_string()).into());
    }

    let mut data = Vec::with_capacity(args.tickers.len());
    for ticker in &args.tickers {
        match ctx.service.compare_data(ticker).await {
            Ok(record) => data.push(record),
            Err(e) => warn!(ticker = %ticker, error = %e, "Could not fetch comparison data"),
        }
    }

    let markdown = generate_comparison(&data)?;
    ctx.output.render(&data, || markdown)
}
