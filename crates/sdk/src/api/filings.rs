//! SEC EDGAR endpoints.

use crate::client::StockResearchClient;
use crate::error::SdkResult;
use crate::transport::{Agent, HttpTransport};
use stock_research_core::filings::{find_company, Cik, CompanyTickerEntry, CompanyTickers, Submissions};
use url::Url;

/// Filings API for company lookup and filing retrieval.
pub struct FilingsApi<'a> {
    client: &'a StockResearchClient,
}

impl<'a> FilingsApi<'a> {
    pub(crate) fn new(client: &'a StockResearchClient) -> Self {
        Self { client }
    }

    /// The full ticker to CIK map.
    pub async fn company_tickers(&self) -> SdkResult<CompanyTickers> {
        let url = HttpTransport::build_url(&self.client.config().sec_www_url, "files/company_tickers.json")?;
        self.client.http.get_json(url, Agent::Sec).await
    }

    /// Company entry for `ticker`, None when SEC does not know it.
    pub async fn lookup_cik(&self, ticker: &str) -> SdkResult<Option<CompanyTickerEntry>> {
        let tickers = self.company_tickers().await?;
        Ok(find_company(&tickers, ticker).cloned())
    }

    /// Submission history for a company.
    pub async fn submissions(&self, cik: &Cik) -> SdkResult<Submissions> {
        let url = HttpTransport::build_url(
            &self.client.config().sec_data_url,
            &format!("submissions/CIK{}.json", cik),
        )?;
        self.client.http.get_json(url, Agent::Sec).await
    }

    /// Raw body of a filing document.
    pub async fn document(&self, url: &str) -> SdkResult<String> {
        let url = Url::parse(url)?;
        self.client.http.get_text(url, Agent::Sec).await
    }
}
