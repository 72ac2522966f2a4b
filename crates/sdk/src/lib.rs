//! # Stock Research SDK
//!
//! HTTP client for Yahoo Finance and SEC EDGAR, plus the research
//! operations built on top of it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stock_research_sdk::{ResearchService, SdkResult, StockResearchClient};
//! use stock_research_core::config::DcfSettings;
//!
//! #[tokio::main]
//! async fn main() -> SdkResult<()> {
//!     let client = StockResearchClient::builder()
//!         .sec_user_agent("Acme Research (research@acme.test)")
//!         .build()?;
//!
//!     // Raw quote fields
//!     let info = client.quotes().info("GOLF").await?;
//!     println!("Price: {:?}", info.number("currentPrice"));
//!
//!     // Rendered reports
//!     let service = ResearchService::new(client, DcfSettings::default());
//!     let valuation = service.dcf_valuation("GOLF", None, None, None).await?;
//!     println!("{}", valuation.to_markdown());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## SEC Filings
//!
//! ```rust,no_run
//! use stock_research_sdk::{ResearchService, StockResearchClient};
//! use stock_research_core::config::DcfSettings;
//!
//! # async fn example() -> stock_research_sdk::SdkResult<()> {
//! let service = ResearchService::new(StockResearchClient::builder().build()?, DcfSettings::default());
//!
//! if let Some(listing) = service.sec_filings("GOLF", Some("10-K"), 5).await {
//!     let latest = &listing.filings[0];
//!     let risks = service.filing_content(&latest.document_url, 50_000, Some("risk")).await?;
//!     println!("{}", risks);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod research;
pub mod session;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export main client
pub use client::{StockResearchClient, StockResearchClientBuilder};
pub use config::{ClientConfig, RetryConfig};
pub use error::{SdkError, SdkResult};
pub use research::{normalize_ticker, FilingsListing, ResearchService};

// Re-export core records for convenience
pub use stock_research_core::{
    analysis::AnalysisReport,
    compare::ComparisonData,
    dcf::{DcfInputs, DcfResult, DcfValuation},
    filings::{Cik, Filing},
    news::{CalendarEvents, NewsItem},
    ratings::{AnalystRatings, EarningsEstimates},
    snapshot::StockSnapshot,
    FinancialStatements, TickerInfo,
};
