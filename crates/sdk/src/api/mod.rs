//! API endpoint modules.

mod analysts;
mod filings;
mod news;
mod quotes;

pub use analysts::AnalystsApi;
pub use filings::FilingsApi;
pub use news::NewsApi;
pub use quotes::{QuotesApi, StatementKind, INFO_MODULES};
