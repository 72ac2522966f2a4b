//! Yahoo news search.

use crate::client::StockResearchClient;
use crate::error::SdkResult;
use crate::transport::{Agent, HttpTransport};
use serde::Deserialize;
use stock_research_core::news::RawNewsItem;

/// News API backed by the Yahoo search endpoint.
pub struct NewsApi<'a> {
    client: &'a StockResearchClient,
}

impl<'a> NewsApi<'a> {
    pub(crate) fn new(client: &'a StockResearchClient) -> Self {
        Self { client }
    }

    /// Most recent news items mentioning `ticker`, at most `limit`.
    pub async fn search(&self, ticker: &str, limit: usize) -> SdkResult<Vec<RawNewsItem>> {
        let url = HttpTransport::build_url(&self.client.config().yahoo_base_url, "v1/finance/search")?;
        let count = limit.to_string();

        let response: SearchResponse = self
            .client
            .http
            .get_json_with_query(
                url,
                &[("q", ticker), ("quotesCount", "0"), ("newsCount", count.as_str())],
                Agent::Browser,
            )
            .await?;

        let mut news = response.news;
        news.truncate(limit);
        Ok(news)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<RawNewsItem>,
}
