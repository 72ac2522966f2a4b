// Stock snapshot: company profile, price, valuation and financial metrics

use crate::format::{dollar_raw, format_number, format_percent, format_ratio, truncate_chars};
use crate::info::{FinancialStatements, Statement, StatementPeriod, TickerInfo};
use chrono::{DateTime, Utc};
use serde::Serialize;

const DESCRIPTION_LIMIT: usize = 500;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CompanyProfile {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub employees: Option<i64>,
    pub website: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PriceData {
    pub current: Option<f64>,
    pub previous_close: Option<f64>,
    pub open: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    #[serde(rename = "52_week_high")]
    pub week52_high: Option<f64>,
    #[serde(rename = "52_week_low")]
    pub week52_low: Option<f64>,
    #[serde(rename = "50_day_avg")]
    pub day50_avg: Option<f64>,
    #[serde(rename = "200_day_avg")]
    pub day200_avg: Option<f64>,
    pub volume: Option<f64>,
    pub avg_volume: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValuationMetrics {
    pub market_cap: Option<f64>,
    pub enterprise_value: Option<f64>,
    pub pe_trailing: Option<f64>,
    pub pe_forward: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub price_to_book: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub ev_to_revenue: Option<f64>,
    pub ev_to_ebitda: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FinancialMetrics {
    pub revenue: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub gross_profit: Option<f64>,
    pub gross_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub profit_margin: Option<f64>,
    pub ebitda: Option<f64>,
    pub net_income: Option<f64>,
    pub eps_trailing: Option<f64>,
    pub eps_forward: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub operating_cash_flow: Option<f64>,
    pub total_cash: Option<f64>,
    pub total_debt: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub roe: Option<f64>,
    pub roa: Option<f64>,
    pub book_value: Option<f64>,
    pub shares_outstanding: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DividendInfo {
    pub dividend_rate: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub ex_dividend_date: Option<DateTime<Utc>>,
    pub five_year_avg_yield: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IncomeStatementSummary {
    pub period: String,
    pub total_revenue: Option<f64>,
    pub gross_profit: Option<f64>,
    pub operating_income: Option<f64>,
    pub net_income: Option<f64>,
    pub ebitda: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheetSummary {
    pub period: String,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub total_equity: Option<f64>,
    pub cash: Option<f64>,
    pub total_debt: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CashFlowSummary {
    pub period: String,
    pub operating_cf: Option<f64>,
    pub investing_cf: Option<f64>,
    pub financing_cf: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub capex: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StockSnapshot {
    pub ticker: String,
    pub fetched_at: DateTime<Utc>,
    pub info: CompanyProfile,
    pub price: PriceData,
    pub valuation: ValuationMetrics,
    pub financials: FinancialMetrics,
    pub dividends: DividendInfo,
    pub income_statement: Option<IncomeStatementSummary>,
    pub balance_sheet: Option<BalanceSheetSummary>,
    pub cash_flow: Option<CashFlowSummary>,
    pub errors: Vec<String>,
}

impl StockSnapshot {
    /// Assemble a snapshot from whatever data could be fetched.
    ///
    /// `info` is None when the quote request failed; the matching message is
    /// expected in `errors`.
    pub fn build(
        ticker: &str,
        info: Option<&TickerInfo>,
        statements: &FinancialStatements,
        errors: Vec<String>,
    ) -> Self {
        let empty = TickerInfo::new();
        let info = info.unwrap_or(&empty);

        Self {
            ticker: ticker.to_string(),
            fetched_at: Utc::now(),
            info: profile(info),
            price: price(info),
            valuation: valuation(info),
            financials: financials(info),
            dividends: dividends(info),
            income_statement: statements
                .income
                .as_ref()
                .and_then(|income| income_summary(income, statements.cash_flow.as_ref())),
            balance_sheet: statements.balance.as_ref().and_then(balance_summary),
            cash_flow: statements.cash_flow.as_ref().and_then(cash_flow_summary),
            errors,
        }
    }

    pub fn current_price(&self) -> Option<f64> {
        self.price.current
    }

    pub fn display_name(&self) -> &str {
        self.info.name.as_deref().unwrap_or(&self.ticker)
    }

    pub fn to_markdown(&self) -> String {
        let mut md = Vec::new();
        let na = |s: &Option<String>| s.clone().unwrap_or_else(|| "N/A".to_string());

        md.push(format!("# {} ({})", self.display_name(), self.ticker));
        md.push(format!("\n**Fetched:** {}", self.fetched_at.to_rfc3339()));
        md.push(format!(
            "\n**Sector:** {} | **Industry:** {}",
            na(&self.info.sector),
            na(&self.info.industry)
        ));

        let p = &self.price;
        md.push("\n## Price".to_string());
        md.push(table_header());
        md.push(format!("| Current Price | {} |", dollar_raw(p.current)));
        md.push(format!("| 52-Week High | {} |", dollar_raw(p.week52_high)));
        md.push(format!("| 52-Week Low | {} |", dollar_raw(p.week52_low)));
        md.push(format!("| 50-Day Avg | {} |", dollar_raw(p.day50_avg)));

        let v = &self.valuation;
        md.push("\n## Valuation".to_string());
        md.push(table_header());
        md.push(format!("| Market Cap | {} |", format_number(v.market_cap)));
        md.push(format!("| Enterprise Value | {} |", format_number(v.enterprise_value)));
        md.push(format!("| P/E (TTM) | {} |", format_ratio(v.pe_trailing)));
        md.push(format!("| P/E (Forward) | {} |", format_ratio(v.pe_forward)));
        md.push(format!("| EV/EBITDA | {} |", format_ratio(v.ev_to_ebitda)));
        md.push(format!("| EV/Revenue | {} |", format_ratio(v.ev_to_revenue)));
        md.push(format!("| P/B | {} |", format_ratio(v.price_to_book)));
        md.push(format!("| PEG | {} |", format_ratio(v.peg_ratio)));

        let f = &self.financials;
        md.push("\n## Financials".to_string());
        md.push(table_header());
        md.push(format!("| Revenue | {} |", format_number(f.revenue)));
        md.push(format!("| Revenue Growth | {} |", format_percent(f.revenue_growth)));
        md.push(format!("| Gross Margin | {} |", format_percent(f.gross_margin)));
        md.push(format!("| Operating Margin | {} |", format_percent(f.operating_margin)));
        md.push(format!("| Profit Margin | {} |", format_percent(f.profit_margin)));
        md.push(format!("| EBITDA | {} |", format_number(f.ebitda)));
        md.push(format!("| Net Income | {} |", format_number(f.net_income)));
        md.push(format!("| EPS (TTM) | {} |", dollar_raw(f.eps_trailing)));
        md.push(format!("| Free Cash Flow | {} |", format_number(f.free_cash_flow)));

        md.push("\n## Balance Sheet".to_string());
        md.push(table_header());
        md.push(format!("| Total Cash | {} |", format_number(f.total_cash)));
        md.push(format!("| Total Debt | {} |", format_number(f.total_debt)));
        md.push(format!("| Debt/Equity | {} |", format_ratio(f.debt_to_equity)));
        md.push(format!("| Current Ratio | {} |", format_ratio(f.current_ratio)));
        md.push(format!("| ROE | {} |", format_percent(f.roe)));
        md.push(format!("| ROA | {} |", format_percent(f.roa)));

        let d = &self.dividends;
        if d.dividend_yield.is_some_and(|y| y != 0.0) {
            md.push("\n## Dividends".to_string());
            md.push(table_header());
            md.push(format!("| Dividend Rate | {} |", dollar_raw(d.dividend_rate)));
            md.push(format!("| Dividend Yield | {} |", format_percent(d.dividend_yield)));
            md.push(format!("| Payout Ratio | {} |", format_percent(d.payout_ratio)));
        }

        if !self.errors.is_empty() {
            md.push("\n## Warnings".to_string());
            for err in &self.errors {
                md.push(format!("- {}", err));
            }
        }

        md.join("\n")
    }
}

fn table_header() -> String {
    "| Metric | Value |\n|--------|-------|".to_string()
}

fn owned(info: &TickerInfo, key: &str) -> Option<String> {
    info.text(key).map(str::to_string)
}

fn profile(info: &TickerInfo) -> CompanyProfile {
    CompanyProfile {
        name: owned(info, "longName"),
        sector: owned(info, "sector"),
        industry: owned(info, "industry"),
        country: owned(info, "country"),
        employees: info.integer("fullTimeEmployees"),
        website: owned(info, "website"),
        description: info
            .text("longBusinessSummary")
            .map(|s| format!("{}...", truncate_chars(s, DESCRIPTION_LIMIT, ""))),
    }
}

fn price(info: &TickerInfo) -> PriceData {
    PriceData {
        current: info.first_number(&["currentPrice", "regularMarketPrice"]),
        previous_close: info.number("previousClose"),
        open: info.first_number(&["open", "regularMarketOpen"]),
        day_high: info.first_number(&["dayHigh", "regularMarketDayHigh"]),
        day_low: info.first_number(&["dayLow", "regularMarketDayLow"]),
        week52_high: info.number("fiftyTwoWeekHigh"),
        week52_low: info.number("fiftyTwoWeekLow"),
        day50_avg: info.number("fiftyDayAverage"),
        day200_avg: info.number("twoHundredDayAverage"),
        volume: info.first_number(&["volume", "regularMarketVolume"]),
        avg_volume: info.number("averageVolume"),
    }
}

fn valuation(info: &TickerInfo) -> ValuationMetrics {
    ValuationMetrics {
        market_cap: info.number("marketCap"),
        enterprise_value: info.number("enterpriseValue"),
        pe_trailing: info.number("trailingPE"),
        pe_forward: info.number("forwardPE"),
        peg_ratio: info.number("pegRatio"),
        price_to_book: info.number("priceToBook"),
        price_to_sales: info.number("priceToSalesTrailing12Months"),
        ev_to_revenue: info.number("enterpriseToRevenue"),
        ev_to_ebitda: info.number("enterpriseToEbitda"),
    }
}

fn financials(info: &TickerInfo) -> FinancialMetrics {
    FinancialMetrics {
        revenue: info.number("totalRevenue"),
        revenue_growth: info.number("revenueGrowth"),
        gross_profit: info.number("grossProfits"),
        gross_margin: info.number("grossMargins"),
        operating_margin: info.number("operatingMargins"),
        profit_margin: info.number("profitMargins"),
        ebitda: info.number("ebitda"),
        net_income: info.number("netIncomeToCommon"),
        eps_trailing: info.number("trailingEps"),
        eps_forward: info.number("forwardEps"),
        free_cash_flow: info.number("freeCashflow"),
        operating_cash_flow: info.number("operatingCashflow"),
        total_cash: info.number("totalCash"),
        total_debt: info.number("totalDebt"),
        debt_to_equity: info.number("debtToEquity"),
        current_ratio: info.number("currentRatio"),
        quick_ratio: info.number("quickRatio"),
        roe: info.number("returnOnEquity"),
        roa: info.number("returnOnAssets"),
        book_value: info.number("bookValue"),
        shares_outstanding: info.number("sharesOutstanding"),
    }
}

fn dividends(info: &TickerInfo) -> DividendInfo {
    DividendInfo {
        dividend_rate: info.number("dividendRate"),
        dividend_yield: info.number("dividendYield"),
        payout_ratio: info.number("payoutRatio"),
        ex_dividend_date: info.timestamp("exDividendDate"),
        five_year_avg_yield: info.number("fiveYearAvgDividendYield"),
    }
}

/// The history modules carry EBIT but rarely EBITDA; depreciation from the
/// cash flow statement of the same period fills the gap.
fn income_summary(
    statement: &Statement,
    cash_flow: Option<&Statement>,
) -> Option<IncomeStatementSummary> {
    let latest = statement.latest()?;
    let depreciation = cash_flow
        .and_then(|cf| cf.periods.iter().find(|p| p.end_date == latest.end_date))
        .and_then(|p| p.value("depreciation"));
    let ebitda = latest.value("ebitda").or_else(|| {
        let ebit = latest.value("ebit")?;
        Some(ebit + depreciation?)
    });
    Some(IncomeStatementSummary {
        period: latest.period_label(),
        total_revenue: latest.value("totalRevenue"),
        gross_profit: latest.value("grossProfit"),
        operating_income: latest.value("operatingIncome"),
        net_income: latest.value("netIncome"),
        ebitda,
    })
}

fn balance_summary(statement: &Statement) -> Option<BalanceSheetSummary> {
    let latest = statement.latest()?;
    Some(BalanceSheetSummary {
        period: latest.period_label(),
        total_assets: latest.value("totalAssets"),
        total_liabilities: latest.value("totalLiab"),
        total_equity: latest.value("totalStockholderEquity"),
        cash: latest.value("cash"),
        total_debt: total_debt(latest),
    })
}

/// Short-term plus long-term debt when the period has no total
fn total_debt(period: &StatementPeriod) -> Option<f64> {
    period.value("totalDebt").or_else(|| {
        let short = period.value("shortLongTermDebt");
        let long = period.value("longTermDebt");
        match (short, long) {
            (None, None) => None,
            _ => Some(short.unwrap_or(0.0) + long.unwrap_or(0.0)),
        }
    })
}

fn cash_flow_summary(statement: &Statement) -> Option<CashFlowSummary> {
    let latest = statement.latest()?;
    let operating = latest.value("totalCashFromOperatingActivities");
    let capex = latest.value("capitalExpenditures");
    Some(CashFlowSummary {
        period: latest.period_label(),
        operating_cf: operating,
        investing_cf: latest.value("totalCashflowsFromInvestingActivities"),
        financing_cf: latest.value("totalCashFromFinancingActivities"),
        free_cash_flow: latest
            .value("freeCashFlow")
            .or_else(|| operating.map(|o| o + capex.unwrap_or(0.0))),
        capex,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_info() -> TickerInfo {
        let mut info = TickerInfo::new();
        info.insert("longName", "Acushnet Holdings Corp.");
        info.insert("sector", "Consumer Cyclical");
        info.insert("industry", "Leisure");
        info.insert("regularMarketPrice", 101.5);
        info.insert("fiftyTwoWeekHigh", 110.0);
        info.insert("marketCap", 6.46e9);
        info.insert("trailingPE", 18.4567);
        info.insert("grossMargins", 0.52);
        info.insert("totalCash", 50e6);
        info
    }

    #[test]
    fn test_build_maps_fields_with_fallbacks() {
        let snapshot =
            StockSnapshot::build("GOLF", Some(&sample_info()), &FinancialStatements::default(), vec![]);

        assert_eq!(snapshot.display_name(), "Acushnet Holdings Corp.");
        assert_eq!(snapshot.current_price(), Some(101.5));
        assert_eq!(snapshot.valuation.market_cap, Some(6.46e9));
        assert!(snapshot.valuation.pe_forward.is_none());
        assert!(snapshot.income_statement.is_none());
    }

    #[test]
    fn test_description_truncated() {
        let mut info = TickerInfo::new();
        info.insert("longBusinessSummary", "x".repeat(800));

        let snapshot = StockSnapshot::build("X", Some(&info), &FinancialStatements::default(), vec![]);
        let description = snapshot.info.description.unwrap();
        assert_eq!(description.len(), 503);
        assert!(description.ends_with("..."));
    }

    #[test]
    fn test_markdown_sections() {
        let snapshot =
            StockSnapshot::build("GOLF", Some(&sample_info()), &FinancialStatements::default(), vec![]);
        let md = snapshot.to_markdown();

        assert!(md.starts_with("# Acushnet Holdings Corp. (GOLF)"));
        assert!(md.contains("**Sector:** Consumer Cyclical | **Industry:** Leisure"));
        assert!(md.contains("| Current Price | $101.5 |"));
        assert!(md.contains("| 52-Week Low | $N/A |"));
        assert!(md.contains("| Market Cap | $6.46B |"));
        assert!(md.contains("| P/E (TTM) | 18.46x |"));
        assert!(md.contains("| Gross Margin | 52.00% |"));
        assert!(md.contains("| Total Cash | $50.00M |"));
        assert!(!md.contains("## Dividends"));
        assert!(!md.contains("## Warnings"));
    }

    #[test]
    fn test_missing_info_records_warnings() {
        let snapshot = StockSnapshot::build(
            "NOPE",
            None,
            &FinancialStatements::default(),
            vec!["Error fetching info: not found".to_string()],
        );
        let md = snapshot.to_markdown();

        assert!(md.starts_with("# NOPE (NOPE)"));
        assert!(md.contains("**Sector:** N/A"));
        assert!(md.contains("## Warnings\n- Error fetching info: not found"));
    }

    #[test]
    fn test_dividend_section_when_yield_present() {
        let mut info = sample_info();
        info.insert("dividendYield", 0.0085);
        info.insert("dividendRate", 0.86);

        let snapshot = StockSnapshot::build("GOLF", Some(&info), &FinancialStatements::default(), vec![]);
        let md = snapshot.to_markdown();
        assert!(md.contains("## Dividends"));
        assert!(md.contains("| Dividend Yield | 0.85% |"));
        assert!(md.contains("| Dividend Rate | $0.86 |"));
    }

    #[test]
    fn test_statement_summaries() {
        let cash_flow = json!([{
            "endDate": {"raw": 1_703_980_800_i64},
            "totalCashFromOperatingActivities": {"raw": 250.0},
            "capitalExpenditures": {"raw": -80.0}
        }]);
        let statements = FinancialStatements {
            cash_flow: Some(Statement::from_history(cash_flow.as_array().unwrap())),
            ..Default::default()
        };

        let snapshot = StockSnapshot::build("GOLF", None, &statements, vec![]);
        let cf = snapshot.cash_flow.unwrap();
        assert_eq!(cf.period, "2023-12-31");
        assert_eq!(cf.free_cash_flow, Some(170.0));
        assert_eq!(cf.capex, Some(-80.0));
    }

    #[test]
    fn test_ebitda_and_total_debt_from_history() {
        let end = json!({"raw": 1_703_980_800_i64});
        let income = json!([{"endDate": end, "ebit": {"raw": 300.0}, "netIncome": {"raw": 180.0}}]);
        let balance = json!([{"endDate": end, "longTermDebt": {"raw": 700.0}, "shortLongTermDebt": {"raw": 50.0}}]);
        let cash_flow = json!([{"endDate": end, "depreciation": {"raw": 40.0}}]);
        let statements = FinancialStatements {
            income: Some(Statement::from_history(income.as_array().unwrap())),
            balance: Some(Statement::from_history(balance.as_array().unwrap())),
            cash_flow: Some(Statement::from_history(cash_flow.as_array().unwrap())),
        };

        let snapshot = StockSnapshot::build("GOLF", None, &statements, vec![]);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["income_statement"]["ebitda"], 340.0);
        assert_eq!(json["balance_sheet"]["total_debt"], 750.0);
        assert!(json["income_statement"].get("ebit").is_none());
        assert!(json["balance_sheet"].get("long_term_debt").is_none());
    }

    #[test]
    fn test_json_uses_null_for_missing() {
        let snapshot = StockSnapshot::build("GOLF", None, &FinancialStatements::default(), vec![]);
        let json = serde_json::to_value(&snapshot).unwrap();

        assert!(json["price"]["current"].is_null());
        assert!(json["price"].get("52_week_high").is_some());
        assert_eq!(json["errors"], json!([]));
    }
}
