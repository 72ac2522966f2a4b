//! Mock Yahoo and SEC endpoints shared by the SDK tests.

use crate::client::StockResearchClient;
use crate::config::RetryConfig;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CRUMB: &str = "Abc123xYz";

/// Client with every endpoint pointed at `server` and retries disabled.
pub fn client_for(server: &MockServer) -> StockResearchClient {
    StockResearchClient::builder()
        .single_host(server.uri())
        .retry_config(RetryConfig::no_retry())
        .build()
        .unwrap()
}

/// Cookie page and crumb endpoint.
pub async fn mount_session(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404).insert_header("set-cookie", "A3=session; Path=/"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/test/getcrumb"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CRUMB))
        .mount(server)
        .await;
}

/// quoteSummary answer for `ticker` when `modules` is requested exactly.
pub async fn mount_summary(server: &MockServer, ticker: &str, modules: &str, result: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v10/finance/quoteSummary/{}", ticker)))
        .and(query_param("modules", modules))
        .and(query_param("crumb", CRUMB))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "quoteSummary": {"result": [result], "error": null}
        })))
        .mount(server)
        .await;
}

pub fn info_modules_param() -> String {
    crate::api::INFO_MODULES.join(",")
}

/// Quote modules for a mid-cap with every field the reports read.
pub fn golf_info() -> Value {
    json!({
        "price": {
            "regularMarketPrice": {"raw": 100.0, "fmt": "100.00"},
            "shortName": "Acushnet",
            "longName": "Acushnet Holdings Corp.",
            "marketCap": {"raw": 6_500_000_000_i64}
        },
        "summaryDetail": {
            "trailingPE": {"raw": 24.5},
            "dividendYield": {"raw": 0.012}
        },
        "defaultKeyStatistics": {
            "sharesOutstanding": {"raw": 100_000_000_i64},
            "enterpriseValue": {"raw": 7_200_000_000_i64}
        },
        "financialData": {
            "currentPrice": {"raw": 100.0},
            "freeCashflow": {"raw": 100_000_000_i64},
            "totalDebt": {"raw": 0},
            "totalCash": {"raw": 0},
            "revenueGrowth": {"raw": 0.05},
            "totalRevenue": {"raw": 2_400_000_000_i64},
            "profitMargins": {"raw": 0.1},
            "returnOnEquity": {"raw": 0.25},
            "targetMeanPrice": {"raw": 110.0},
            "targetHighPrice": {"raw": 130.0},
            "targetLowPrice": {"raw": 90.0},
            "recommendationKey": "buy",
            "recommendationMean": {"raw": 2.1},
            "numberOfAnalystOpinions": {"raw": 8}
        },
        "assetProfile": {
            "sector": "Consumer Cyclical",
            "industry": "Leisure"
        },
        "calendarEvents": {
            "earnings": {"earningsDate": [{"raw": 1_714_521_600_i64, "fmt": "2024-05-01"}]},
            "exDividendDate": {"raw": 1_700_000_000_i64}
        }
    })
}
