//! Main client for the research SDK.

use crate::api::*;
use crate::config::{
    ClientConfig, RetryConfig, SEC_DATA_URL, SEC_WWW_URL, YAHOO_BASE_URL, YAHOO_SESSION_URL,
};
use crate::error::SdkResult;
use crate::session::YahooSession;
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use stock_research_core::config::{HttpSettings, DEFAULT_SEC_USER_AGENT, DEFAULT_USER_AGENT};
use url::Url;

/// Client for Yahoo Finance and SEC EDGAR.
#[derive(Clone)]
pub struct StockResearchClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
    pub(crate) session: Arc<YahooSession>,
}

impl StockResearchClient {
    /// Create a new client builder.
    pub fn builder() -> StockResearchClientBuilder {
        StockResearchClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> SdkResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self {
            config,
            http,
            session: Arc::new(YahooSession::new()),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Yahoo quote data and financial statements.
    pub fn quotes(&self) -> QuotesApi<'_> {
        QuotesApi::new(self)
    }

    /// Yahoo news search.
    pub fn news(&self) -> NewsApi<'_> {
        NewsApi::new(self)
    }

    /// Analyst recommendations, rating changes and earnings history.
    pub fn analysts(&self) -> AnalystsApi<'_> {
        AnalystsApi::new(self)
    }

    /// SEC EDGAR company lookup, submissions and documents.
    pub fn filings(&self) -> FilingsApi<'_> {
        FilingsApi::new(self)
    }
}

/// Builder for creating a StockResearchClient.
pub struct StockResearchClientBuilder {
    yahoo_base_url: String,
    yahoo_session_url: String,
    sec_www_url: String,
    sec_data_url: String,
    user_agent: String,
    sec_user_agent: String,
    timeout: Duration,
    retry_config: RetryConfig,
}

impl StockResearchClientBuilder {
    /// Create a new builder pointing at the public endpoints.
    pub fn new() -> Self {
        Self {
            yahoo_base_url: YAHOO_BASE_URL.to_string(),
            yahoo_session_url: YAHOO_SESSION_URL.to_string(),
            sec_www_url: SEC_WWW_URL.to_string(),
            sec_data_url: SEC_DATA_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            sec_user_agent: DEFAULT_SEC_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
        }
    }

    /// Set the Yahoo Finance API base URL.
    pub fn yahoo_base_url(mut self, url: impl Into<String>) -> Self {
        self.yahoo_base_url = url.into();
        self
    }

    /// Set the page visited for the Yahoo session cookie.
    pub fn yahoo_session_url(mut self, url: impl Into<String>) -> Self {
        self.yahoo_session_url = url.into();
        self
    }

    /// Set the SEC website base URL.
    pub fn sec_www_url(mut self, url: impl Into<String>) -> Self {
        self.sec_www_url = url.into();
        self
    }

    /// Set the SEC data API base URL.
    pub fn sec_data_url(mut self, url: impl Into<String>) -> Self {
        self.sec_data_url = url.into();
        self
    }

    /// Route every endpoint to one host.
    pub fn single_host(self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.yahoo_base_url(url.clone())
            .yahoo_session_url(url.clone())
            .sec_www_url(url.clone())
            .sec_data_url(url)
    }

    /// Set the user agent sent to Yahoo.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set the user agent sent to SEC EDGAR.
    pub fn sec_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.sec_user_agent = agent.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Apply the `[http]` section of the research configuration.
    pub fn http_settings(mut self, settings: &HttpSettings) -> Self {
        self.user_agent = settings.user_agent.clone();
        self.sec_user_agent = settings.sec_user_agent.clone();
        self.timeout = Duration::from_secs(settings.timeout_secs);
        self.retry_config = RetryConfig::with_max_retries(settings.max_retries);
        self
    }

    /// Build the configuration without creating a client.
    pub fn build_config(self) -> SdkResult<ClientConfig> {
        Ok(ClientConfig {
            yahoo_base_url: base_url(&self.yahoo_base_url)?,
            yahoo_session_url: Url::parse(&self.yahoo_session_url)?,
            sec_www_url: base_url(&self.sec_www_url)?,
            sec_data_url: base_url(&self.sec_data_url)?,
            user_agent: self.user_agent,
            sec_user_agent: self.sec_user_agent,
            timeout: self.timeout,
            retry_config: self.retry_config,
        })
    }

    /// Build the client.
    pub fn build(self) -> SdkResult<StockResearchClient> {
        StockResearchClient::from_config(self.build_config()?)
    }
}

impl Default for StockResearchClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Base URLs need a trailing slash so `join` appends instead of replacing.
fn base_url(raw: &str) -> SdkResult<Url> {
    if raw.ends_with('/') {
        Ok(Url::parse(raw)?)
    } else {
        Ok(Url::parse(&format!("{}/", raw))?)
    }
}
