//! Analyst data from quoteSummary modules.

use crate::client::StockResearchClient;
use crate::error::SdkResult;
use serde::de::DeserializeOwned;
use stock_research_core::ratings::{RawEarningsQuarter, RawTrendPeriod, RawUpgrade};

/// Analysts API for recommendations and earnings history.
pub struct AnalystsApi<'a> {
    client: &'a StockResearchClient,
}

impl<'a> AnalystsApi<'a> {
    pub(crate) fn new(client: &'a StockResearchClient) -> Self {
        Self { client }
    }

    /// Read the array `field` of quoteSummary `module`; absent means empty.
    async fn module_array<T: DeserializeOwned>(
        &self,
        ticker: &str,
        module: &str,
        field: &str,
    ) -> SdkResult<Vec<T>> {
        let modules = self.client.quotes().summary(ticker, &[module]).await?;
        match modules.get(module).and_then(|m| m.get(field)) {
            Some(values) => Ok(serde_json::from_value(values.clone())?),
            None => Ok(Vec::new()),
        }
    }

    /// Recommendation counts per period ("0m", "-1m", ...).
    pub async fn trend(&self, ticker: &str) -> SdkResult<Vec<RawTrendPeriod>> {
        self.module_array(ticker, "recommendationTrend", "trend").await
    }

    /// Upgrade and downgrade history.
    pub async fn upgrades(&self, ticker: &str) -> SdkResult<Vec<RawUpgrade>> {
        self.module_array(ticker, "upgradeDowngradeHistory", "history").await
    }

    /// Reported against estimated EPS for recent quarters.
    pub async fn earnings_history(&self, ticker: &str) -> SdkResult<Vec<RawEarningsQuarter>> {
        self.module_array(ticker, "earningsHistory", "history").await
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::*;
    use serde_json::json;
    use wiremock::MockServer;

    #[tokio::test]
    async fn test_trend_and_missing_module() {
        let server = MockServer::start().await;
        mount_session(&server).await;
        mount_summary(
            &server,
            "GOLF",
            "recommendationTrend",
            json!({"recommendationTrend": {"trend": [
                {"period": "0m", "strongBuy": 2, "buy": 4, "hold": 3, "sell": 0, "strongSell": 0},
                {"period": "-1m", "strongBuy": 1, "buy": 4, "hold": 4, "sell": 0, "strongSell": 0}
            ]}}),
        )
        .await;
        mount_summary(&server, "GOLF", "earningsHistory", json!({})).await;

        let client = client_for(&server);
        let trend = client.analysts().trend("GOLF").await.unwrap();
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].period, "0m");

        let history = client.analysts().earnings_history("GOLF").await.unwrap();
        assert!(history.is_empty());
    }
}
