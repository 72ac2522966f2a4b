//! News command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use stock_research_core::news::{format_news_markdown, CalendarEvents, NewsItem, DEFAULT_NEWS_LIMIT};
use stock_research_sdk::normalize_ticker;

use crate::commands::Context;

/// Arguments for the news command.
#[derive(Args, Debug)]
pub struct NewsArgs {
    /// Stock ticker symbol
    pub ticker: String,

    /// Number of articles to fetch
    #[arg(long, default_value_t = DEFAULT_NEWS_LIMIT)]
    pub limit: usize,

    /// Include upcoming earnings and dividend dates
    #[arg(long)]
    pub calendar: bool,
}

#[derive(Serialize)]
struct NewsOutput<'a> {
    ticker: &'a str,
    news: &'a [NewsItem],
    calendar: Option<&'a CalendarEvents>,
}

pub async fn execute(args: NewsArgs, ctx: &Context) -> Result<()> {
    let ticker = normalize_ticker(&args.ticker);
    let news = ctx.service.news(&ticker, args.limit).await;
    let calendar = if args.calendar {
        Some(ctx.service.calendar(&ticker).await)
    } else {
        None
    };

    let data = NewsOutput {
        ticker: &ticker,
        news: &news,
        calendar: calendar.as_ref(),
    };
    ctx.output
        .render(&data, || format_news_markdown(&ticker, &news, calendar.as_ref()))
}
