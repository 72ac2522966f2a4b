//! Fetch command: a full quote snapshot for one ticker.

use anyhow::Result;
use clap::Args;

use crate::commands::Context;

/// Arguments for the fetch command.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Stock ticker symbol
    pub ticker: String,
}

pub async fn execute(args: FetchArgs, ctx: &Context) -> Result<()> {
    let snapshot = ctx.service.stock_snapshot(&args.ticker).await;
    ctx.output.render(&snapshot, || snapshot.to_markdown())
}
