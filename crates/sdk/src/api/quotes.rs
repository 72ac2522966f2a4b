//! Yahoo quoteSummary endpoints.

use crate::client::StockResearchClient;
use crate::error::{SdkError, SdkResult};
use crate::transport::{Agent, HttpTransport};
use serde::Deserialize;
use serde_json::{Map, Value};
use stock_research_core::info::{FinancialStatements, Statement, TickerInfo};
use tracing::debug;

/// Modules merged into [`TickerInfo`].
pub const INFO_MODULES: &[&str] = &[
    "price",
    "summaryDetail",
    "defaultKeyStatistics",
    "financialData",
    "assetProfile",
    "calendarEvents",
];

/// Annual financial statement modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Income,
    Balance,
    CashFlow,
}

impl StatementKind {
    pub const ALL: [StatementKind; 3] = [Self::Income, Self::Balance, Self::CashFlow];

    pub fn module(&self) -> &'static str {
        match self {
            Self::Income => "incomeStatementHistory",
            Self::Balance => "balanceSheetHistory",
            Self::CashFlow => "cashflowStatementHistory",
        }
    }

    /// Field inside the module holding the period array
    fn history_field(&self) -> &'static str {
        match self {
            Self::Income => "incomeStatementHistory",
            Self::Balance => "balanceSheetStatements",
            Self::CashFlow => "cashflowStatements",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "income statement",
            Self::Balance => "balance sheet",
            Self::CashFlow => "cash flow",
        }
    }

    /// Statement from a quoteSummary result, None when the module is absent
    pub fn extract(&self, modules: &Map<String, Value>) -> Option<Statement> {
        let history = modules
            .get(self.module())?
            .get(self.history_field())?
            .as_array()?;
        let statement = Statement::from_history(history);
        (!statement.is_empty()).then_some(statement)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    #[serde(default)]
    result: Option<Vec<Map<String, Value>>>,
}

/// Quotes API for ticker fundamentals.
pub struct QuotesApi<'a> {
    client: &'a StockResearchClient,
}

impl<'a> QuotesApi<'a> {
    pub(crate) fn new(client: &'a StockResearchClient) -> Self {
        Self { client }
    }

    /// Raw quoteSummary modules for `ticker`.
    ///
    /// A stale crumb (401) renews the session once before giving up.
    pub async fn summary(&self, ticker: &str, modules: &[&str]) -> SdkResult<Map<String, Value>> {
        match self.summary_once(ticker, modules).await {
            Err(e) if e.is_unauthorized() => {
                debug!(ticker, "Crumb rejected, renewing Yahoo session");
                self.client.session.reset().await;
                self.summary_once(ticker, modules).await
            }
            other => other,
        }
    }

    async fn summary_once(&self, ticker: &str, modules: &[&str]) -> SdkResult<Map<String, Value>> {
        let http = &self.client.http;
        let crumb = self.client.session.crumb(http).await?;
        let url = HttpTransport::build_url(
            &self.client.config().yahoo_base_url,
            &format!("v10/finance/quoteSummary/{}", ticker),
        )?;
        let modules = modules.join(",");

        let response: QuoteSummaryResponse = http
            .get_json_with_query(
                url,
                &[("modules", modules.as_str()), ("crumb", crumb.as_str())],
                Agent::Browser,
            )
            .await?;

        response
            .quote_summary
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| SdkError::NotFound(format!("No quote data for {}", ticker)))
    }

    /// Flattened quote fields (the `Ticker.info` view).
    pub async fn info(&self, ticker: &str) -> SdkResult<TickerInfo> {
        let modules = self.summary(ticker, INFO_MODULES).await?;
        let info = TickerInfo::from_modules(&modules);
        if info.is_empty() {
            return Err(SdkError::NotFound(format!("No quote data for {}", ticker)));
        }
        Ok(info)
    }

    /// One annual statement history.
    pub async fn statement(&self, ticker: &str, kind: StatementKind) -> SdkResult<Option<Statement>> {
        let modules = self.summary(ticker, &[kind.module()]).await?;
        Ok(kind.extract(&modules))
    }

    /// All three annual statements in a single request.
    pub async fn statements(&self, ticker: &str) -> SdkResult<FinancialStatements> {
        let names: Vec<&str> = StatementKind::ALL.iter().map(|k| k.module()).collect();
        let modules = self.summary(ticker, &names).await?;

        Ok(FinancialStatements {
            income: StatementKind::Income.extract(&modules),
            balance: StatementKind::Balance.extract(&modules),
            cash_flow: StatementKind::CashFlow.extract(&modules),
        })
    }
}
