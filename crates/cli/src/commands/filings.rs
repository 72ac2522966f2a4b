//! Filings command: list SEC filings, or print one filing's text.

use anyhow::Result;
use clap::Args;

use stock_research_core::filings::{DEFAULT_FILING_LIMIT, DEFAULT_MAX_CHARS};
use stock_research_sdk::normalize_ticker;

use crate::commands::Context;
use crate::error::CliError;
use crate::output::print_info;

/// Arguments for the filings command.
#[derive(Args, Debug)]
pub struct FilingsArgs {
    /// Stock ticker symbol
    pub ticker: String,

    /// Filing type filter (10-K, 10-Q, 8-K, DEF 14A)
    #[arg(long = "type", value_name = "FORM")]
    pub filing_type: Option<String>,

    /// Number of filings to list
    #[arg(long, default_value_t = DEFAULT_FILING_LIMIT)]
    pub limit: usize,

    /// Fetch the content of the filing at this index
    #[arg(long, value_name = "INDEX")]
    pub fetch: Option<usize>,

    /// Narrow fetched content to a section (risk, business, md&a, financial)
    #[arg(long)]
    pub section: Option<String>,
}

pub async fn execute(args: FilingsArgs, ctx: &Context) -> Result<()> {
    let ticker = normalize_ticker(&args.ticker);
    let listing = ctx
        .service
        .sec_filings(&ticker, args.filing_type.as_deref(), args.limit)
        .await
        .ok_or_else(|| CliError::NotFound(format!("Could not find CIK for ticker {}", ticker)))?;

    let Some(index) = args.fetch else {
        return ctx.output.render(&listing.filings, || listing.to_markdown());
    };

    let filing = listing.filings.get(index).ok_or_else(|| {
        CliError::InvalidArgument(format!(
            "Index {} out of range (0-{})",
            index,
            listing.filings.len() as i64 - 1
        ))
    })?;

    print_info(&format!("Fetching content from: {}", filing.document_url));
    let content = ctx
        .service
        .filing_content(&filing.document_url, DEFAULT_MAX_CHARS, args.section.as_deref())
        .await?;
    ctx.output.emit(&content)
}
