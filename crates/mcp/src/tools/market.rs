// Quote, valuation and comparison tools

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_schema_array, json_schema_number, json_schema_object, json_schema_string, Tool,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use stock_research_sdk::research::is_invalid_input;
use stock_research_sdk::ResearchService;

#[derive(Debug, Deserialize)]
struct TickerArgs {
    ticker: String,
}

/// Company profile, price, valuation, financials and dividends
pub struct FetchStockDataTool {
    service: ResearchService,
}

impl FetchStockDataTool {
    pub fn new(service: ResearchService) -> Self {
        Self { service }
    }
}

#[async_trait::async_trait]
impl Tool for FetchStockDataTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "fetch_stock_data".to_string(),
            description: "Fetch comprehensive financial data for a stock ticker including price, valuation, financials, and dividends.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "ticker": json_schema_string("Stock ticker symbol (e.g., AAPL, GOLF, MSFT)")
                }),
                vec!["ticker"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: TickerArgs =
            serde_json::from_value(arguments).context("Invalid arguments for fetch_stock_data")?;

        let snapshot = self.service.stock_snapshot(&args.ticker).await;
        Ok(CallToolResult::text(snapshot.to_markdown()))
    }
}

#[derive(Debug, Deserialize)]
struct DcfArgs {
    ticker: String,
    wacc: Option<f64>,
    terminal_growth: Option<f64>,
}

/// DCF valuation with optional WACC and terminal growth overrides
pub struct RunDcfTool {
    service: ResearchService,
}

impl RunDcfTool {
    pub fn new(service: ResearchService) -> Self {
        Self { service }
    }
}

#[async_trait::async_trait]
impl Tool for RunDcfTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "run_dcf".to_string(),
            description: "Run a DCF (Discounted Cash Flow) valuation model for a stock to calculate intrinsic value.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "ticker": json_schema_string("Stock ticker symbol"),
                    "wacc": json_schema_number("Weighted Average Cost of Capital (default: 0.09 = 9%)"),
                    "terminal_growth": json_schema_number("Terminal growth rate (default: 0.025 = 2.5%)")
                }),
                vec!["ticker"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: DcfArgs =
            serde_json::from_value(arguments).context("Invalid arguments for run_dcf")?;

        let valuation = self
            .service
            .dcf_valuation(&args.ticker, args.wacc, args.terminal_growth, None)
            .await?;
        Ok(CallToolResult::text(valuation.to_markdown()))
    }
}

#[derive(Debug, Deserialize)]
struct CompareArgs {
    #[serde(default)]
    tickers: Vec<String>,
}

/// Side-by-side comparison of two or more tickers
pub struct CompareStocksTool {
    service: ResearchService,
}

impl CompareStocksTool {
    pub fn new(service: ResearchService) -> Self {
        Self { service }
    }
}

#[async_trait::async_trait]
impl Tool for CompareStocksTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "compare_stocks".to_string(),
            description: "Compare two or more stocks side by side on valuation, financials, and returns.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "tickers": json_schema_array(
                        serde_json::json!({"type": "string"}),
                        "List of stock ticker symbols to compare"
                    )
                }),
                vec!["tickers"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: CompareArgs =
            serde_json::from_value(arguments).context("Invalid arguments for compare_stocks")?;

        if args.tickers.len() < 2 {
            return Ok(CallToolResult::error("Error: Need at least 2 tickers to compare"));
        }

        match self.service.compare(&args.tickers).await {
            Ok(table) => Ok(CallToolResult::text(table)),
            Err(e) if is_invalid_input(&e) => Ok(CallToolResult::error(
                "Error: Need at least 2 valid tickers to compare",
            )),
            Err(e) => Err(e.into()),
        }
    }
}
