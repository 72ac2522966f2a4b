// Core records, valuation math and report rendering for stock research

pub mod analysis;
pub mod compare;
pub mod config;
pub mod dcf;
pub mod error;
pub mod filings;
pub mod format;
pub mod info;
pub mod news;
pub mod ratings;
pub mod snapshot;

pub use error::{ResearchError, ResearchResult};
pub use info::{FinancialStatements, Statement, StatementPeriod, TickerInfo};
