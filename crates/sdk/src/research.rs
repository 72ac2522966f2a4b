//! Research operations shared by the CLI and the MCP server.
//!
//! Each operation fetches what it needs through [`StockResearchClient`] and
//! hands the raw records to the core builders. Secondary data that fails to
//! load is logged with `warn!` and replaced by an empty placeholder so the
//! report still renders; only the primary request of an operation is fatal.

use crate::api::StatementKind;
use crate::client::StockResearchClient;
use crate::error::{SdkError, SdkResult};
use serde::Serialize;
use stock_research_core::analysis::{generate_summary, AnalysisReport, ReportSection};
use stock_research_core::compare::{generate_comparison, ComparisonData};
use stock_research_core::config::DcfSettings;
use stock_research_core::dcf::{DcfInputs, DcfValuation};
use stock_research_core::filings::{
    filings_from_submissions, find_section, format_filings_markdown, html_to_text,
    truncate_content, Cik, Filing,
};
use stock_research_core::info::{FinancialStatements, TickerInfo};
use stock_research_core::news::{CalendarEvents, NewsItem};
use stock_research_core::ratings::{AnalystRatings, EarningsEstimates};
use stock_research_core::snapshot::StockSnapshot;
use stock_research_core::ResearchError;
use tracing::{info, warn};

/// Upper-cased, trimmed ticker symbol.
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

/// Filings found for one company.
#[derive(Debug, Clone, Serialize)]
pub struct FilingsListing {
    pub ticker: String,
    pub cik: Cik,
    pub company_name: Option<String>,
    pub filings: Vec<Filing>,
}

impl FilingsListing {
    pub fn to_markdown(&self) -> String {
        format_filings_markdown(&self.ticker, &self.filings, self.company_name.as_deref())
    }
}

#[derive(Clone)]
pub struct ResearchService {
    client: StockResearchClient,
    settings: DcfSettings,
}

impl ResearchService {
    pub fn new(client: StockResearchClient, settings: DcfSettings) -> Self {
        Self { client, settings }
    }

    pub fn client(&self) -> &StockResearchClient {
        &self.client
    }

    pub fn dcf_settings(&self) -> &DcfSettings {
        &self.settings
    }

    /// Quote, statements and derived metrics. Never fails; problems end up
    /// in the snapshot's `errors`.
    pub async fn stock_snapshot(&self, ticker: &str) -> StockSnapshot {
        let ticker = normalize_ticker(ticker);
        let quotes = self.client.quotes();
        let mut errors = Vec::new();

        let info = match quotes.info(&ticker).await {
            Ok(info) => Some(info),
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "Quote data unavailable");
                errors.push(format!("Error fetching info: {}", e));
                None
            }
        };

        let mut statements = FinancialStatements::default();
        for kind in StatementKind::ALL {
            let statement = match quotes.statement(&ticker, kind).await {
                Ok(statement) => statement,
                Err(e) => {
                    warn!(ticker = %ticker, statement = kind.label(), error = %e, "Statement unavailable");
                    errors.push(format!("Error fetching {}: {}", kind.label(), e));
                    None
                }
            };
            match kind {
                StatementKind::Income => statements.income = statement,
                StatementKind::Balance => statements.balance = statement,
                StatementKind::CashFlow => statements.cash_flow = statement,
            }
        }

        StockSnapshot::build(&ticker, info.as_ref(), &statements, errors)
    }

    /// DCF valuation from market data with optional rate overrides.
    pub async fn dcf_valuation(
        &self,
        ticker: &str,
        wacc: Option<f64>,
        terminal_growth: Option<f64>,
        growth_rate: Option<f64>,
    ) -> SdkResult<DcfValuation> {
        let ticker = normalize_ticker(ticker);
        let info = self.client.quotes().info(&ticker).await?;

        // Statements are only needed when the quote lacks free cash flow
        let statements = if info.number("freeCashflow").is_some() {
            FinancialStatements::default()
        } else {
            self.client
                .quotes()
                .statements(&ticker)
                .await
                .unwrap_or_else(|e| {
                    warn!(ticker = %ticker, error = %e, "Financial statements unavailable");
                    FinancialStatements::default()
                })
        };

        let assumptions = self.settings.assumptions(wacc, terminal_growth, growth_rate);
        let inputs = DcfInputs::from_info(&ticker, &info, &statements, &assumptions)?;
        let current_price = current_price(&info);

        DcfValuation::run(inputs, current_price).map_err(|e| SdkError::Research(e.into()))
    }

    pub async fn compare_data(&self, ticker: &str) -> SdkResult<ComparisonData> {
        let ticker = normalize_ticker(ticker);
        let info = self.client.quotes().info(&ticker).await?;
        Ok(ComparisonData::from_info(&ticker, &info))
    }

    /// Side-by-side comparison. Tickers that fail to load are skipped.
    pub async fn compare(&self, tickers: &[String]) -> SdkResult<String> {
        let mut data = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            match self.compare_data(ticker).await {
                Ok(record) => data.push(record),
                Err(e) => warn!(ticker = %ticker, error = %e, "Could not fetch comparison data"),
            }
        }
        Ok(generate_comparison(&data)?)
    }

    /// Recent filings, or None when SEC has no CIK for the ticker.
    pub async fn sec_filings(
        &self,
        ticker: &str,
        filing_type: Option<&str>,
        limit: usize,
    ) -> Option<FilingsListing> {
        let ticker = normalize_ticker(ticker);
        let filings_api = self.client.filings();

        info!(ticker = %ticker, "Looking up CIK");
        let entry = match filings_api.lookup_cik(&ticker).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "CIK lookup failed");
                return None;
            }
        };
        let cik = Cik::new(entry.cik_str);
        info!(cik = %cik, "Fetching filings");

        let filings = match filings_api.submissions(&cik).await {
            Ok(submissions) => filings_from_submissions(&cik, &submissions, filing_type, limit),
            Err(e) => {
                warn!(cik = %cik, error = %e, "Submissions unavailable");
                Vec::new()
            }
        };

        Some(FilingsListing {
            ticker,
            cik,
            company_name: Some(entry.title).filter(|t| !t.is_empty()),
            filings,
        })
    }

    /// Plain text of a filing document, optionally narrowed to one section.
    ///
    /// Download failures come back as text so they can be printed in place
    /// of the document.
    pub async fn filing_content(
        &self,
        url: &str,
        max_chars: usize,
        section: Option<&str>,
    ) -> SdkResult<String> {
        let content = match self.client.filings().document(url).await {
            Ok(raw) => truncate_content(&html_to_text(&raw)?, max_chars),
            Err(e) => {
                warn!(url, error = %e, "Filing download failed");
                format!("Error fetching filing content: {}", e)
            }
        };

        match section {
            Some(section) => Ok(find_section(&content, section)?),
            None => Ok(content),
        }
    }

    pub async fn news(&self, ticker: &str, limit: usize) -> Vec<NewsItem> {
        let ticker = normalize_ticker(ticker);
        match self.client.news().search(&ticker, limit).await {
            Ok(items) => items.into_iter().map(NewsItem::from).collect(),
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "Error fetching news");
                Vec::new()
            }
        }
    }

    /// Upcoming earnings and dividend dates; empty when unavailable.
    pub async fn calendar(&self, ticker: &str) -> CalendarEvents {
        let ticker = normalize_ticker(ticker);
        match self.client.quotes().info(&ticker).await {
            Ok(info) => CalendarEvents::from_info(&info),
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "Error fetching calendar");
                CalendarEvents::default()
            }
        }
    }

    pub async fn analyst_ratings(&self, ticker: &str) -> SdkResult<AnalystRatings> {
        let ticker = normalize_ticker(ticker);
        let info = self.client.quotes().info(&ticker).await?;
        let analysts = self.client.analysts();

        let upgrades = analysts.upgrades(&ticker).await.unwrap_or_else(|e| {
            warn!(ticker = %ticker, error = %e, "Error fetching recommendations");
            Vec::new()
        });
        let trend = analysts.trend(&ticker).await.unwrap_or_else(|e| {
            warn!(ticker = %ticker, error = %e, "Error fetching trend");
            Vec::new()
        });

        Ok(AnalystRatings::build(&ticker, &info, &upgrades, &trend))
    }

    pub async fn earnings_estimates(&self, ticker: &str) -> SdkResult<EarningsEstimates> {
        let ticker = normalize_ticker(ticker);
        let info = self.client.quotes().info(&ticker).await?;
        let history = self
            .client
            .analysts()
            .earnings_history(&ticker)
            .await
            .unwrap_or_else(|e| {
                warn!(ticker = %ticker, error = %e, "Error fetching earnings");
                Vec::new()
            });

        Ok(EarningsEstimates::build(&info, &history))
    }

    /// Snapshot, DCF, optional comparison and investment summary.
    pub async fn full_analysis(&self, ticker: &str, compare_with: Option<&str>) -> AnalysisReport {
        let ticker = normalize_ticker(ticker);
        let mut report = AnalysisReport::new(&ticker);

        info!("[1/4] Fetching data for {}...", ticker);
        let snapshot = self.stock_snapshot(&ticker).await;
        report.push(ReportSection::with_heading(
            "Company Overview & Financials",
            snapshot.to_markdown(),
        ));

        info!("[2/4] Running DCF model...");
        let valuation = match self.dcf_valuation(&ticker, None, None, None).await {
            Ok(valuation) => {
                report.push(ReportSection::rendered(valuation.to_markdown()));
                Some(valuation)
            }
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "DCF model failed");
                report.push(ReportSection::failed("DCF Model Error", e));
                None
            }
        };

        match compare_with {
            Some(other) => {
                let other = normalize_ticker(other);
                info!("[3/4] Comparing {} vs {}...", ticker, other);
                match self.compare(&[ticker.clone(), other]).await {
                    Ok(table) => report.push(ReportSection::rendered(table)),
                    Err(e) => report.push(ReportSection::failed("Comparison Error", e)),
                }
            }
            None => info!("[3/4] Skipping comparison (no --compare specified)..."),
        }

        info!("[4/4] Generating summary...");
        let current_price = valuation
            .as_ref()
            .and_then(|v| v.current_price)
            .or_else(|| snapshot.current_price());
        report.summary = generate_summary(
            Some(&snapshot),
            valuation.as_ref().map(|v| &v.result),
            current_price,
        );

        report
    }
}

fn current_price(info: &TickerInfo) -> Option<f64> {
    info.first_number(&["currentPrice", "regularMarketPrice"])
}

/// Invalid-input errors, such as a comparison left with fewer than two tickers.
pub fn is_invalid_input(error: &SdkError) -> bool {
    matches!(
        error,
        SdkError::InvalidInput(_) | SdkError::Research(ResearchError::InvalidInput(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> ResearchService {
        ResearchService::new(client_for(server), DcfSettings::default())
    }

    async fn mount_golf(server: &MockServer) {
        mount_session(server).await;
        mount_summary(server, "GOLF", &info_modules_param(), golf_info()).await;
    }

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker(" golf "), "GOLF");
        assert_eq!(normalize_ticker("brk-b"), "BRK-B");
    }

    #[tokio::test]
    async fn test_dcf_valuation_from_quote() {
        let server = MockServer::start().await;
        mount_golf(&server).await;

        let valuation = service(&server)
            .dcf_valuation("golf", Some(0.1), None, None)
            .await
            .unwrap();

        assert_eq!(valuation.inputs.ticker, "GOLF");
        assert_eq!(valuation.inputs.wacc, 0.1);
        assert_eq!(valuation.inputs.base_fcf, 100.0);
        assert_eq!(valuation.inputs.shares_outstanding, 100.0);
        assert_eq!(valuation.current_price, Some(100.0));
        assert!(valuation.result.intrinsic_value_per_share > 0.0);
    }

    #[tokio::test]
    async fn test_dcf_rejects_bad_rates() {
        let server = MockServer::start().await;
        mount_golf(&server).await;

        let result = service(&server)
            .dcf_valuation("GOLF", Some(0.02), Some(0.03), None)
            .await;

        assert!(matches!(result, Err(SdkError::Research(ResearchError::Dcf(_)))));
    }

    #[tokio::test]
    async fn test_snapshot_records_statement_failures() {
        let server = MockServer::start().await;
        mount_golf(&server).await;
        mount_summary(
            &server,
            "GOLF",
            "incomeStatementHistory",
            json!({"incomeStatementHistory": {"incomeStatementHistory": [
                {"endDate": {"raw": 1_703_980_800_i64}, "totalRevenue": {"raw": 2_400_000_000_i64}}
            ]}}),
        )
        .await;
        // balance sheet and cash flow requests fall through to a 404

        let snapshot = service(&server).stock_snapshot("GOLF").await;

        assert_eq!(snapshot.current_price(), Some(100.0));
        assert_eq!(snapshot.display_name(), "Acushnet Holdings Corp.");
        let income = snapshot.income_statement.unwrap();
        assert_eq!(income.total_revenue, Some(2_400_000_000.0));
        assert_eq!(snapshot.errors.len(), 2);
        assert!(snapshot.errors[0].starts_with("Error fetching balance sheet:"));
        assert!(snapshot.errors[1].starts_with("Error fetching cash flow:"));
    }

    #[tokio::test]
    async fn test_compare_skips_unknown_tickers() {
        let server = MockServer::start().await;
        mount_golf(&server).await;

        let result = service(&server)
            .compare(&["GOLF".to_string(), "NOPE".to_string()])
            .await;

        let err = result.unwrap_err();
        assert!(is_invalid_input(&err));
        assert!(err.to_string().contains("Need at least 2 valid tickers to compare"));
    }

    #[tokio::test]
    async fn test_sec_filings() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/files/company_tickers.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "0": {"cik_str": 1672013, "ticker": "GOLF", "title": "Acushnet Holdings Corp."}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/submissions/CIK0001672013.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Acushnet Holdings Corp.",
                "filings": {"recent": {
                    "form": ["8-K", "10-K"],
                    "filingDate": ["2024-03-01", "2024-02-28"],
                    "accessionNumber": ["0001672013-24-000010", "0001672013-24-000005"],
                    "primaryDocument": ["golf-8k.htm", "golf-10k.htm"],
                    "primaryDocDescription": ["8-K", "10-K"]
                }}
            })))
            .mount(&server)
            .await;

        let listing = service(&server)
            .sec_filings("golf", Some("10-K"), 10)
            .await
            .unwrap();

        assert_eq!(listing.cik.to_string(), "0001672013");
        assert_eq!(listing.filings.len(), 1);
        assert_eq!(
            listing.filings[0].document_url,
            "https://www.sec.gov/Archives/edgar/data/1672013/000167201324000005/golf-10k.htm"
        );
        assert!(listing.to_markdown().contains("# SEC Filings: Acushnet Holdings Corp. (GOLF)"));
    }

    #[tokio::test]
    async fn test_sec_filings_unknown_ticker() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/files/company_tickers.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let listing = service(&server).sec_filings("ZZZZ", None, 10).await;
        assert!(listing.is_none());
    }

    #[tokio::test]
    async fn test_filing_content_strips_html_and_finds_section() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/doc.htm"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<html><body><p>Cover</p><h2>Item 1A. Risk Factors</h2><p>Golf is seasonal.</p></body></html>",
            ))
            .mount(&server)
            .await;

        let url = format!("{}/doc.htm", server.uri());
        let content = service(&server)
            .filing_content(&url, 50_000, Some("risk"))
            .await
            .unwrap();

        assert!(content.starts_with("Item 1A. Risk Factors"));
        assert!(content.contains("Golf is seasonal."));
        assert!(!content.contains("Cover"));
    }

    #[tokio::test]
    async fn test_filing_content_error_text() {
        let server = MockServer::start().await;
        let url = format!("{}/missing.htm", server.uri());

        let content = service(&server).filing_content(&url, 100, None).await.unwrap();
        assert!(content.starts_with("Error fetching filing content:"));
    }

    #[tokio::test]
    async fn test_news_degrades_to_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/finance/search"))
            .and(query_param("q", "GOLF"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "news": [
                    {"title": "Acushnet beats earnings estimates", "publisher": "Reuters",
                     "link": "https://example.com/a", "providerPublishTime": 1_700_000_000_i64, "type": "STORY"}
                ]
            })))
            .mount(&server)
            .await;

        let svc = service(&server);
        let news = svc.news("golf", 5).await;
        assert_eq!(news.len(), 1);
        assert_eq!(news[0].publisher, "Reuters");
        assert_eq!(news[0].published, "2023-11-14 22:13");

        assert!(svc.news("MSFT", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_calendar_from_quote() {
        let server = MockServer::start().await;
        mount_golf(&server).await;

        let calendar = service(&server).calendar("GOLF").await;
        assert_eq!(calendar.earnings_date.as_deref(), Some("2024-05-01"));
        assert_eq!(calendar.ex_dividend_date.as_deref(), Some("2023-11-14"));
    }

    #[tokio::test]
    async fn test_analyst_ratings_without_history() {
        let server = MockServer::start().await;
        mount_golf(&server).await;

        let ratings = service(&server).analyst_ratings("GOLF").await.unwrap();

        assert_eq!(ratings.target_mean, Some(110.0));
        assert_eq!(ratings.num_analysts, Some(8));
        assert!(ratings.recent_ratings.is_empty());
        assert!(ratings.rating_trend.is_none());
        let upside = ratings.upside_potential.unwrap();
        assert!((upside - 0.1).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_full_analysis_sections() {
        let server = MockServer::start().await;
        mount_golf(&server).await;

        let report = service(&server).full_analysis("GOLF", Some("NOPE")).await;
        let markdown = report.to_markdown();

        assert!(markdown.starts_with("# Full Analysis: GOLF"));
        assert!(markdown.contains("## Company Overview & Financials"));
        assert!(markdown.contains("# DCF Valuation: GOLF"));
        assert!(markdown.contains("## Comparison Error"));
        assert!(markdown.contains("### Valuation Assessment"));
        assert_eq!(report.sections.iter().filter(|s| s.is_failed()).count(), 1);
    }

    #[tokio::test]
    async fn test_full_analysis_keeps_snapshot_when_fetch_fails() {
        let server = MockServer::start().await;
        mount_session(&server).await;

        let report = service(&server).full_analysis("NOPE", None).await;
        let markdown = report.to_markdown();

        assert!(!report.sections[0].is_failed());
        assert!(markdown.contains("## Company Overview & Financials"));
        assert!(markdown.contains("## Warnings\n- Error fetching info:"));
        assert!(markdown.contains("## DCF Model Error"));
        assert!(!markdown.contains("Error Fetching Data"));
    }
}
