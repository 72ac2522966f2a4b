// Yahoo Finance news tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_boolean, json_schema_integer, json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use serde::Deserialize;
use stock_research_core::news::{format_news_markdown, DEFAULT_NEWS_LIMIT};
use stock_research_sdk::{normalize_ticker, ResearchService};

#[derive(Debug, Deserialize)]
struct NewsArgs {
    ticker: String,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    include_calendar: bool,
}

fn default_limit() -> usize {
    DEFAULT_NEWS_LIMIT
}

pub struct NewsTool {
    service: ResearchService,
}

impl NewsTool {
    pub fn new(service: ResearchService) -> Self {
        Self { service }
    }
}

#[async_trait::async_trait]
impl Tool for NewsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_news".to_string(),
            description: "Fetch recent news for a stock from Yahoo Finance.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "ticker": json_schema_string("Stock ticker symbol"),
                    "limit": json_schema_integer("Maximum number of news items (default: 10)"),
                    "include_calendar": json_schema_boolean("Include upcoming events (earnings, dividends)")
                }),
                vec!["ticker"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: NewsArgs =
            serde_json::from_value(arguments).context("Invalid arguments for get_news")?;
        let ticker = normalize_ticker(&args.ticker);

        let news = self.service.news(&ticker, args.limit).await;
        let calendar = if args.include_calendar {
            Some(self.service.calendar(&ticker).await)
        } else {
            None
        };

        Ok(CallToolResult::text(format_news_markdown(
            &ticker,
            &news,
            calendar.as_ref(),
        )))
    }
}
