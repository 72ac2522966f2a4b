// SEC EDGAR filings tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_integer, json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use serde::Deserialize;
use stock_research_core::filings::DEFAULT_FILING_LIMIT;
use stock_research_sdk::{normalize_ticker, ResearchService};

#[derive(Debug, Deserialize)]
struct FilingsArgs {
    ticker: String,
    filing_type: Option<String>,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_FILING_LIMIT
}

pub struct SecFilingsTool {
    service: ResearchService,
}

impl SecFilingsTool {
    pub fn new(service: ResearchService) -> Self {
        Self { service }
    }
}

#[async_trait::async_trait]
impl Tool for SecFilingsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_sec_filings".to_string(),
            description: "Fetch SEC EDGAR filings (10-K, 10-Q, 8-K, etc.) for a company.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "ticker": json_schema_string("Stock ticker symbol"),
                    "filing_type": json_schema_string("Filing type filter (10-K, 10-Q, 8-K, etc.)"),
                    "limit": json_schema_integer("Maximum number of filings (default: 10)")
                }),
                vec!["ticker"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: FilingsArgs =
            serde_json::from_value(arguments).context("Invalid arguments for get_sec_filings")?;
        let ticker = normalize_ticker(&args.ticker);

        let listing = self
            .service
            .sec_filings(&ticker, args.filing_type.as_deref(), args.limit)
            .await;

        Ok(match listing {
            Some(listing) => CallToolResult::text(listing.to_markdown()),
            None => CallToolResult::error(format!("Error: Could not find CIK for {}", ticker)),
        })
    }
}
