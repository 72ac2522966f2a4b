//! DCF command.
//!
//! Values a listed company from its quote data, or runs the model on
//! manually supplied cash flow, growth and share count.

use anyhow::Result;
use clap::Args;

use stock_research_core::dcf::{DcfInputs, DcfValuation};

use crate::commands::Context;
use crate::error::CliError;

/// Arguments for the dcf command.
#[derive(Args, Debug)]
pub struct DcfArgs {
    /// Stock ticker to fetch inputs for
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// Base free cash flow (millions)
    #[arg(long)]
    pub fcf: Option<f64>,

    /// Annual growth rate (0.05 for 5%)
    #[arg(long)]
    pub growth: Option<f64>,

    /// Projection years (defaults to the configured horizon)
    #[arg(long)]
    pub years: Option<usize>,

    /// Terminal growth rate (defaults to the configured rate)
    #[arg(long)]
    pub terminal: Option<f64>,

    /// Discount rate (defaults to the configured WACC)
    #[arg(long)]
    pub wacc: Option<f64>,

    /// Shares outstanding (millions)
    #[arg(long)]
    pub shares: Option<f64>,

    /// Net debt (millions)
    #[arg(long, default_value = "0")]
    pub debt: f64,
}

pub async fn execute(args: DcfArgs, ctx: &Context) -> Result<()> {
    let valuation = match &args.ticker {
        Some(ticker) => {
            ctx.service
                .dcf_valuation(ticker, args.wacc, args.terminal, args.growth)
                .await?
        }
        None => manual_valuation(&args, ctx)?,
    };

    ctx.output.render(&valuation, || valuation.to_markdown())
}

fn manual_valuation(args: &DcfArgs, ctx: &Context) -> Result<DcfValuation> {
    let (fcf, growth, shares) = match (args.fcf, args.growth, args.shares) {
        (Some(fcf), Some(growth), Some(shares)) => (fcf, growth, shares),
        _ => {
            return Err(CliError::MissingArgument(
                "Either --ticker OR (--fcf, --growth, --shares) required".to_string(),
            )
            .into())
        }
    };

    let settings = ctx.service.dcf_settings();
    let inputs = DcfInputs::manual(
        fcf,
        growth,
        args.years.unwrap_or(settings.projection_years),
        args.terminal.unwrap_or(settings.terminal_growth),
        args.wacc.unwrap_or(settings.wacc),
        shares,
        args.debt,
    );

    Ok(DcfValuation::run(inputs, None)?)
}
