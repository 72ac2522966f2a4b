//! CLI command implementations.

pub mod analyze;
pub mod compare;
pub mod dcf;
pub mod fetch;
pub mod filings;
pub mod news;
pub mod ratings;

pub use analyze::AnalyzeArgs;
pub use compare::CompareArgs;
pub use dcf::DcfArgs;
pub use fetch::FetchArgs;
pub use filings::FilingsArgs;
pub use news::NewsArgs;
pub use ratings::RatingsArgs;

use stock_research_core::config::ResearchConfig;
use stock_research_sdk::ResearchService;

use crate::output::Output;

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub config: ResearchConfig,
    pub service: ResearchService,
    pub output: Output,
}
