// Side-by-side stock comparison

use crate::error::{ResearchError, ResearchResult};
use crate::format::{format_compact, truncate_chars, CompactFormat};
use crate::info::TickerInfo;
use serde::Serialize;

const NAME_WIDTH: usize = 20;

/// Key comparison metrics for one ticker
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComparisonData {
    pub ticker: String,
    pub name: String,
    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub enterprise_value: Option<f64>,
    pub revenue: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub gross_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub profit_margin: Option<f64>,
    pub ebitda: Option<f64>,
    pub net_income: Option<f64>,
    pub fcf: Option<f64>,
    pub pe_trailing: Option<f64>,
    pub pe_forward: Option<f64>,
    pub ev_ebitda: Option<f64>,
    pub ev_revenue: Option<f64>,
    pub pb: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub debt_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub roe: Option<f64>,
    pub roa: Option<f64>,
    #[serde(rename = "52_week_high")]
    pub week52_high: Option<f64>,
    #[serde(rename = "52_week_low")]
    pub week52_low: Option<f64>,
    pub beta: Option<f64>,
    pub shares_outstanding: Option<f64>,
}

impl ComparisonData {
    pub fn from_info(ticker: &str, info: &TickerInfo) -> Self {
        Self {
            ticker: ticker.to_string(),
            name: info
                .first_text(&["shortName", "longName"])
                .unwrap_or(ticker)
                .to_string(),
            price: info.first_number(&["currentPrice", "regularMarketPrice"]),
            market_cap: info.number("marketCap"),
            enterprise_value: info.number("enterpriseValue"),
            revenue: info.number("totalRevenue"),
            revenue_growth: info.number("revenueGrowth"),
            gross_margin: info.number("grossMargins"),
            operating_margin: info.number("operatingMargins"),
            profit_margin: info.number("profitMargins"),
            ebitda: info.number("ebitda"),
            net_income: info.number("netIncomeToCommon"),
            fcf: info.number("freeCashflow"),
            pe_trailing: info.number("trailingPE"),
            pe_forward: info.number("forwardPE"),
            ev_ebitda: info.number("enterpriseToEbitda"),
            ev_revenue: info.number("enterpriseToRevenue"),
            pb: info.number("priceToBook"),
            dividend_yield: info.number("dividendYield"),
            payout_ratio: info.number("payoutRatio"),
            debt_equity: info.number("debtToEquity"),
            current_ratio: info.number("currentRatio"),
            roe: info.number("returnOnEquity"),
            roa: info.number("returnOnAssets"),
            week52_high: info.number("fiftyTwoWeekHigh"),
            week52_low: info.number("fiftyTwoWeekLow"),
            beta: info.number("beta"),
            shares_outstanding: info.number("sharesOutstanding"),
        }
    }

    pub fn field(&self, field: Field) -> Option<f64> {
        match field {
            Field::Price => self.price,
            Field::Week52High => self.week52_high,
            Field::Week52Low => self.week52_low,
            Field::MarketCap => self.market_cap,
            Field::EnterpriseValue => self.enterprise_value,
            Field::PeTrailing => self.pe_trailing,
            Field::PeForward => self.pe_forward,
            Field::EvEbitda => self.ev_ebitda,
            Field::EvRevenue => self.ev_revenue,
            Field::PriceToBook => self.pb,
            Field::Revenue => self.revenue,
            Field::RevenueGrowth => self.revenue_growth,
            Field::GrossMargin => self.gross_margin,
            Field::OperatingMargin => self.operating_margin,
            Field::ProfitMargin => self.profit_margin,
            Field::Ebitda => self.ebitda,
            Field::NetIncome => self.net_income,
            Field::FreeCashFlow => self.fcf,
            Field::Roe => self.roe,
            Field::Roa => self.roa,
            Field::DebtEquity => self.debt_equity,
            Field::CurrentRatio => self.current_ratio,
            Field::DividendYield => self.dividend_yield,
            Field::PayoutRatio => self.payout_ratio,
            Field::Beta => self.beta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Price,
    Week52High,
    Week52Low,
    MarketCap,
    EnterpriseValue,
    PeTrailing,
    PeForward,
    EvEbitda,
    EvRevenue,
    PriceToBook,
    Revenue,
    RevenueGrowth,
    GrossMargin,
    OperatingMargin,
    ProfitMargin,
    Ebitda,
    NetIncome,
    FreeCashFlow,
    Roe,
    Roa,
    DebtEquity,
    CurrentRatio,
    DividendYield,
    PayoutRatio,
    Beta,
}

/// One line of the comparison table
#[derive(Debug, Clone, Copy)]
pub enum MetricRow {
    Section(&'static str),
    Metric {
        label: &'static str,
        field: Field,
        format: CompactFormat,
        /// None for rows that are shown but not scored
        higher_is_better: Option<bool>,
    },
}

const fn metric(
    label: &'static str,
    field: Field,
    format: CompactFormat,
    higher_is_better: Option<bool>,
) -> MetricRow {
    MetricRow::Metric {
        label,
        field,
        format,
        higher_is_better,
    }
}

use CompactFormat::{Number, Percent, Plain, Price, Ratio};

pub const METRICS: &[MetricRow] = &[
    MetricRow::Section("**PRICE**"),
    metric("Current Price", Field::Price, Price, Some(true)),
    metric("52-Week High", Field::Week52High, Price, None),
    metric("52-Week Low", Field::Week52Low, Price, None),
    MetricRow::Section("**VALUATION**"),
    metric("Market Cap", Field::MarketCap, Number, Some(true)),
    metric("Enterprise Value", Field::EnterpriseValue, Number, None),
    metric("P/E (TTM)", Field::PeTrailing, Ratio, Some(false)),
    metric("P/E (Forward)", Field::PeForward, Ratio, Some(false)),
    metric("EV/EBITDA", Field::EvEbitda, Ratio, Some(false)),
    metric("EV/Revenue", Field::EvRevenue, Ratio, Some(false)),
    metric("P/B", Field::PriceToBook, Ratio, Some(false)),
    MetricRow::Section("**FINANCIALS**"),
    metric("Revenue", Field::Revenue, Number, Some(true)),
    metric("Revenue Growth", Field::RevenueGrowth, Percent, Some(true)),
    metric("Gross Margin", Field::GrossMargin, Percent, Some(true)),
    metric("Operating Margin", Field::OperatingMargin, Percent, Some(true)),
    metric("Profit Margin", Field::ProfitMargin, Percent, Some(true)),
    metric("EBITDA", Field::Ebitda, Number, Some(true)),
    metric("Net Income", Field::NetIncome, Number, Some(true)),
    metric("Free Cash Flow", Field::FreeCashFlow, Number, Some(true)),
    MetricRow::Section("**RETURNS**"),
    metric("ROE", Field::Roe, Percent, Some(true)),
    metric("ROA", Field::Roa, Percent, Some(true)),
    MetricRow::Section("**BALANCE SHEET**"),
    metric("Debt/Equity", Field::DebtEquity, Ratio, Some(false)),
    metric("Current Ratio", Field::CurrentRatio, Ratio, Some(true)),
    MetricRow::Section("**DIVIDENDS**"),
    metric("Dividend Yield", Field::DividendYield, Percent, Some(true)),
    metric("Payout Ratio", Field::PayoutRatio, Percent, Some(false)),
    MetricRow::Section("**RISK**"),
    metric("Beta", Field::Beta, Plain, None),
];

/// Index of the best present value; ties go to the earliest entry
pub fn find_winner(values: &[Option<f64>], higher_is_better: bool) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, value) in values.iter().enumerate() {
        let Some(v) = value else { continue };
        let better = match best {
            None => true,
            Some((_, b)) if higher_is_better => *v > b,
            Some((_, b)) => *v < b,
        };
        if better {
            best = Some((i, *v));
        }
    }
    best.map(|(i, _)| i)
}

/// Win counts per ticker, most wins first (input order kept on ties)
pub fn tally_wins(data: &[ComparisonData]) -> Vec<(String, usize)> {
    let mut wins: Vec<(String, usize)> = data.iter().map(|d| (d.ticker.clone(), 0)).collect();

    for row in METRICS {
        let MetricRow::Metric {
            field,
            higher_is_better: Some(higher),
            ..
        } = row
        else {
            continue;
        };
        let values: Vec<Option<f64>> = data.iter().map(|d| d.field(*field)).collect();
        if let Some(winner) = find_winner(&values, *higher) {
            wins[winner].1 += 1;
        }
    }

    wins.sort_by(|a, b| b.1.cmp(&a.1));
    wins
}

pub fn generate_comparison(data: &[ComparisonData]) -> ResearchResult<String> {
    if data.len() < 2 {
        return Err(ResearchError::InvalidInput(
            "Need at least 2 valid tickers to compare".to_string(),
        ));
    }

    let tickers: Vec<&str> = data.iter().map(|d| d.ticker.as_str()).collect();
    let mut lines = Vec::new();
    lines.push(format!("# Stock Comparison: {}", tickers.join(" vs ")));
    lines.push(String::new());

    let mut header = "| Metric |".to_string();
    let mut separator = "|--------|".to_string();
    for d in data {
        header.push_str(&format!(" **{}** |", d.ticker));
        separator.push_str("--------|");
    }
    lines.push(header);
    lines.push(separator);

    let mut names = "| Company |".to_string();
    for d in data {
        names.push_str(&format!(" {} |", truncate_chars(&d.name, NAME_WIDTH, "...")));
    }
    lines.push(names);

    for row in METRICS {
        match row {
            MetricRow::Section(label) => {
                lines.push(format!("| {} |{}", label, " |".repeat(data.len())));
            }
            MetricRow::Metric {
                label,
                field,
                format,
                higher_is_better,
            } => {
                let values: Vec<Option<f64>> = data.iter().map(|d| d.field(*field)).collect();
                let winner = higher_is_better.and_then(|higher| find_winner(&values, higher));

                let mut line = format!("| {} |", label);
                for (i, value) in values.iter().enumerate() {
                    let formatted = format_compact(*value, *format);
                    if Some(i) == winner {
                        line.push_str(&format!(" **{}** ✓ |", formatted));
                    } else {
                        line.push_str(&format!(" {} |", formatted));
                    }
                }
                lines.push(line);
            }
        }
    }

    lines.push(String::new());
    lines.push("## Summary".to_string());
    lines.push(String::new());
    lines.push("| Ticker | Wins |".to_string());
    lines.push("|--------|------|".to_string());
    for (ticker, count) in tally_wins(data) {
        lines.push(format!("| {} | {} |", ticker, count));
    }

    Ok(lines.join("\n"))
}
