//! Ratings command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use stock_research_core::ratings::{format_ratings_markdown, AnalystRatings, EarningsEstimates};

use crate::commands::Context;

/// Arguments for the ratings command.
#[derive(Args, Debug)]
pub struct RatingsArgs {
    /// Stock ticker symbol
    pub ticker: String,

    /// Include earnings estimates and history
    #[arg(long)]
    pub earnings: bool,
}

#[derive(Serialize)]
struct RatingsOutput<'a> {
    ratings: &'a AnalystRatings,
    earnings: Option<&'a EarningsEstimates>,
}

pub async fn execute(args: RatingsArgs, ctx: &Context) -> Result<()> {
    let ratings = ctx.service.analyst_ratings(&args.ticker).await?;
    let earnings = if args.earnings {
        Some(ctx.service.earnings_estimates(&args.ticker).await?)
    } else {
        None
    };

    let data = RatingsOutput {
        ratings: &ratings,
        earnings: earnings.as_ref(),
    };
    ctx.output
        .render(&data, || format_ratings_markdown(&ratings, earnings.as_ref()))
}
