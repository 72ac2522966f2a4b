// Analyst ratings tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_boolean, json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use serde::Deserialize;
use stock_research_core::ratings::format_ratings_markdown;
use stock_research_sdk::ResearchService;

#[derive(Debug, Deserialize)]
struct RatingsArgs {
    ticker: String,
    #[serde(default)]
    include_earnings: bool,
}

pub struct AnalystRatingsTool {
    service: ResearchService,
}

impl AnalystRatingsTool {
    pub fn new(service: ResearchService) -> Self {
        Self { service }
    }
}

#[async_trait::async_trait]
impl Tool for AnalystRatingsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_analyst_ratings".to_string(),
            description: "Get analyst ratings, price targets, and recommendations for a stock.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "ticker": json_schema_string("Stock ticker symbol"),
                    "include_earnings": json_schema_boolean("Include earnings estimates and history")
                }),
                vec!["ticker"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: RatingsArgs =
            serde_json::from_value(arguments).context("Invalid arguments for get_analyst_ratings")?;

        let ratings = self.service.analyst_ratings(&args.ticker).await?;
        let earnings = if args.include_earnings {
            Some(self.service.earnings_estimates(&args.ticker).await?)
        } else {
            None
        };

        Ok(CallToolResult::text(format_ratings_markdown(
            &ratings,
            earnings.as_ref(),
        )))
    }
}
