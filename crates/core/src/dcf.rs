// Discounted cash flow valuation
//
// Money amounts are in millions throughout (FCF, net debt, shares).

use crate::error::{ResearchError, ResearchResult};
use crate::format::percent1;
use crate::info::{FinancialStatements, TickerInfo};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Smallest spread between discount rate and terminal growth we accept.
/// Below it the Gordon growth denominator blows the terminal value up.
pub const MIN_RATE_SPREAD: f64 = 1e-6;

pub const DEFAULT_WACC: f64 = 0.09;
pub const DEFAULT_TERMINAL_GROWTH: f64 = 0.025;
pub const DEFAULT_PROJECTION_YEARS: usize = 5;
pub const DEFAULT_GROWTH_RATE: f64 = 0.05;
pub const MAX_GROWTH_RATE: f64 = 0.15;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DcfError {
    #[error("at least one projection year is required")]
    NoProjectionYears,

    #[error("WACC ({wacc:.4}) must exceed terminal growth ({terminal_growth:.4})")]
    DiscountRateTooLow { wacc: f64, terminal_growth: f64 },

    #[error("shares outstanding must be positive, got {0}")]
    InvalidShareCount(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcfInputs {
    pub ticker: String,
    /// Base free cash flow (millions)
    pub base_fcf: f64,
    /// Growth rate for each projection year
    pub growth_rates: Vec<f64>,
    pub terminal_growth: f64,
    pub wacc: f64,
    /// Shares outstanding (millions)
    pub shares_outstanding: f64,
    /// Total debt minus cash (millions)
    #[serde(default)]
    pub net_debt: f64,
}

/// Assumptions used when deriving inputs from market data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcfAssumptions {
    pub wacc: f64,
    pub terminal_growth: f64,
    pub projection_years: usize,
    /// Initial growth rate; estimated from revenue growth when absent
    pub growth_rate: Option<f64>,
    pub max_growth_rate: f64,
    pub default_growth_rate: f64,
}

impl Default for DcfAssumptions {
    fn default() -> Self {
        Self {
            wacc: DEFAULT_WACC,
            terminal_growth: DEFAULT_TERMINAL_GROWTH,
            projection_years: DEFAULT_PROJECTION_YEARS,
            growth_rate: None,
            max_growth_rate: MAX_GROWTH_RATE,
            default_growth_rate: DEFAULT_GROWTH_RATE,
        }
    }
}

impl DcfInputs {
    /// Flat growth for every projection year
    pub fn manual(
        base_fcf: f64,
        growth: f64,
        years: usize,
        terminal_growth: f64,
        wacc: f64,
        shares_outstanding: f64,
        net_debt: f64,
    ) -> Self {
        Self {
            ticker: "MANUAL".to_string(),
            base_fcf,
            growth_rates: vec![growth; years],
            terminal_growth,
            wacc,
            shares_outstanding,
            net_debt,
        }
    }

    /// Derive inputs from quote data for `ticker`
    pub fn from_info(
        ticker: &str,
        info: &TickerInfo,
        statements: &FinancialStatements,
        assumptions: &DcfAssumptions,
    ) -> ResearchResult<Self> {
        let fcf = info
            .number("freeCashflow")
            .or_else(|| statements.latest_free_cash_flow())
            .ok_or_else(|| ResearchError::missing(ticker, "Free Cash Flow"))?;

        let shares = info
            .number("sharesOutstanding")
            .filter(|s| *s > 0.0)
            .ok_or_else(|| ResearchError::missing(ticker, "Shares Outstanding"))?;

        let total_debt = info.number("totalDebt").unwrap_or(0.0);
        let total_cash = info.number("totalCash").unwrap_or(0.0);

        let growth = match assumptions.growth_rate {
            Some(rate) => rate,
            None => match info.number("revenueGrowth") {
                Some(revenue_growth) if revenue_growth != 0.0 => {
                    revenue_growth.min(assumptions.max_growth_rate)
                }
                _ => assumptions.default_growth_rate,
            },
        };

        Ok(Self {
            ticker: ticker.to_string(),
            base_fcf: fcf / 1e6,
            growth_rates: growth_schedule(
                growth,
                assumptions.terminal_growth,
                assumptions.projection_years,
            ),
            terminal_growth: assumptions.terminal_growth,
            wacc: assumptions.wacc,
            shares_outstanding: shares / 1e6,
            net_debt: (total_debt - total_cash) / 1e6,
        })
    }

    fn with_rates(&self, wacc: f64, terminal_growth: f64) -> Self {
        Self {
            wacc,
            terminal_growth,
            ..self.clone()
        }
    }
}

/// Growth rates declining linearly from `initial` towards `terminal`
pub fn growth_schedule(initial: f64, terminal: f64, years: usize) -> Vec<f64> {
    (0..years)
        .map(|i| {
            let decline = i as f64 / years as f64;
            initial * (1.0 - decline) + terminal * decline
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DcfResult {
    #[serde(skip)]
    pub inputs: DcfInputs,
    pub projected_fcfs: Vec<f64>,
    pub pv_fcfs: Vec<f64>,
    pub terminal_value: f64,
    pub pv_terminal: f64,
    pub enterprise_value: f64,
    pub equity_value: f64,
    pub intrinsic_value_per_share: f64,
}

impl DcfResult {
    pub fn pv_fcf_total(&self) -> f64 {
        self.pv_fcfs.iter().sum()
    }
}

pub fn calculate_dcf(inputs: &DcfInputs) -> Result<DcfResult, DcfError> {
    if inputs.growth_rates.is_empty() {
        return Err(DcfError::NoProjectionYears);
    }
    if inputs.wacc - inputs.terminal_growth <= MIN_RATE_SPREAD {
        return Err(DcfError::DiscountRateTooLow {
            wacc: inputs.wacc,
            terminal_growth: inputs.terminal_growth,
        });
    }
    if !(inputs.shares_outstanding > 0.0) {
        return Err(DcfError::InvalidShareCount(inputs.shares_outstanding));
    }

    let mut projected_fcfs = Vec::with_capacity(inputs.growth_rates.len());
    let mut pv_fcfs = Vec::with_capacity(inputs.growth_rates.len());

    let mut current = inputs.base_fcf;
    for (i, growth) in inputs.growth_rates.iter().enumerate() {
        let year = (i + 1) as i32;
        current *= 1.0 + growth;
        projected_fcfs.push(current);
        pv_fcfs.push(current / (1.0 + inputs.wacc).powi(year));
    }

    // Gordon growth on the final projected year
    let final_year = inputs.growth_rates.len() as i32;
    let terminal_fcf = current * (1.0 + inputs.terminal_growth);
    let terminal_value = terminal_fcf / (inputs.wacc - inputs.terminal_growth);
    let pv_terminal = terminal_value / (1.0 + inputs.wacc).powi(final_year);

    let enterprise_value = pv_fcfs.iter().sum::<f64>() + pv_terminal;
    let equity_value = enterprise_value - inputs.net_debt;

    Ok(DcfResult {
        inputs: inputs.clone(),
        projected_fcfs,
        pv_fcfs,
        terminal_value,
        pv_terminal,
        enterprise_value,
        equity_value,
        intrinsic_value_per_share: equity_value / inputs.shares_outstanding,
    })
}

/// Intrinsic value per share over a WACC x terminal growth grid.
///
/// Serializes as `{"8.5%": {"2.5%": 47.69, ...}, ...}`, keyed by WACC and
/// then terminal growth, with null for invalid pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityGrid {
    pub wacc_rates: Vec<f64>,
    pub terminal_rates: Vec<f64>,
    /// Row per WACC, column per terminal rate; None where the pair is invalid
    pub values: Vec<Vec<Option<f64>>>,
}

impl SensitivityGrid {
    pub fn cell(&self, wacc_index: usize, terminal_index: usize) -> Option<f64> {
        self.values
            .get(wacc_index)
            .and_then(|row| row.get(terminal_index))
            .copied()
            .flatten()
    }
}

impl Serialize for SensitivityGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.wacc_rates.len()))?;
        for (wacc, row) in self.wacc_rates.iter().zip(&self.values) {
            let row = SensitivityRow {
                terminal_rates: &self.terminal_rates,
                values: row,
            };
            map.serialize_entry(&percent1(*wacc), &row)?;
        }
        map.end()
    }
}

struct SensitivityRow<'a> {
    terminal_rates: &'a [f64],
    values: &'a [Option<f64>],
}

impl Serialize for SensitivityRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.terminal_rates.len()))?;
        for (rate, value) in self.terminal_rates.iter().zip(self.values) {
            map.serialize_entry(&percent1(*rate), value)?;
        }
        map.end()
    }
}

/// WACC +/- 1% against terminal growth +/- 0.5%
pub fn sensitivity_analysis(inputs: &DcfInputs) -> SensitivityGrid {
    let wacc_rates = vec![inputs.wacc - 0.01, inputs.wacc, inputs.wacc + 0.01];
    let terminal_rates = vec![
        inputs.terminal_growth - 0.005,
        inputs.terminal_growth,
        inputs.terminal_growth + 0.005,
    ];
    sensitivity_grid(inputs, wacc_rates, terminal_rates)
}

pub fn sensitivity_grid(
    inputs: &DcfInputs,
    wacc_rates: Vec<f64>,
    terminal_rates: Vec<f64>,
) -> SensitivityGrid {
    let values = wacc_rates
        .iter()
        .map(|&wacc| {
            terminal_rates
                .iter()
                .map(|&tg| {
                    calculate_dcf(&inputs.with_rates(wacc, tg))
                        .ok()
                        .map(|r| round2(r.intrinsic_value_per_share))
                })
                .collect()
        })
        .collect();

    SensitivityGrid {
        wacc_rates,
        terminal_rates,
        values,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Valuation call relative to the market price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValuationStatus {
    Undervalued,
    FairlyValued,
    Overvalued,
}

impl ValuationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Undervalued => "UNDERVALUED",
            Self::FairlyValued => "FAIRLY VALUED",
            Self::Overvalued => "OVERVALUED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceComparison {
    pub current_price: f64,
    pub intrinsic_value: f64,
    pub upside: f64,
    pub status: ValuationStatus,
}

impl PriceComparison {
    /// None when there is no usable market price
    pub fn new(intrinsic_value: f64, current_price: Option<f64>) -> Option<Self> {
        let price = current_price.filter(|p| *p > 0.0)?;
        let upside = (intrinsic_value - price) / price;
        let status = if upside > 0.1 {
            ValuationStatus::Undervalued
        } else if upside < -0.1 {
            ValuationStatus::Overvalued
        } else {
            ValuationStatus::FairlyValued
        };
        Some(Self {
            current_price: price,
            intrinsic_value,
            upside,
            status,
        })
    }
}

/// A complete valuation: result, market comparison and sensitivity grid
#[derive(Debug, Clone, Serialize)]
pub struct DcfValuation {
    pub inputs: DcfInputs,
    #[serde(rename = "results")]
    pub result: DcfResult,
    pub current_price: Option<f64>,
    pub sensitivity: SensitivityGrid,
}

impl DcfValuation {
    pub fn new(result: DcfResult, current_price: Option<f64>) -> Self {
        let sensitivity = sensitivity_analysis(&result.inputs);
        Self {
            inputs: result.inputs.clone(),
            result,
            current_price,
            sensitivity,
        }
    }

    pub fn run(inputs: DcfInputs, current_price: Option<f64>) -> Result<Self, DcfError> {
        let result = calculate_dcf(&inputs)?;
        Ok(Self::new(result, current_price))
    }

    pub fn price_comparison(&self) -> Option<PriceComparison> {
        PriceComparison::new(self.result.intrinsic_value_per_share, self.current_price)
    }

    pub fn to_markdown(&self) -> String {
        let inputs = &self.inputs;
        let result = &self.result;
        let mut lines = Vec::new();

        lines.push(format!("# DCF Valuation: {}", inputs.ticker));
        lines.push(String::new());

        lines.push("## Inputs".to_string());
        lines.push("| Parameter | Value |".to_string());
        lines.push("|-----------|-------|".to_string());
        lines.push(format!("| Base FCF | ${:.1}M |", inputs.base_fcf));
        let growth: Vec<String> = inputs.growth_rates.iter().map(|g| percent1(*g)).collect();
        lines.push(format!("| Growth Rates | {} |", growth.join(", ")));
        lines.push(format!("| Terminal Growth | {} |", percent1(inputs.terminal_growth)));
        lines.push(format!("| WACC | {} |", percent1(inputs.wacc)));
        lines.push(format!("| Shares Outstanding | {:.1}M |", inputs.shares_outstanding));
        lines.push(format!("| Net Debt | ${:.1}M |", inputs.net_debt));
        lines.push(String::new());

        lines.push("## FCF Projections".to_string());
        lines.push("| Year | FCF | PV of FCF |".to_string());
        lines.push("|------|-----|-----------|".to_string());
        for (i, (fcf, pv)) in result.projected_fcfs.iter().zip(&result.pv_fcfs).enumerate() {
            lines.push(format!("| {} | ${:.1}M | ${:.1}M |", i + 1, fcf, pv));
        }
        lines.push(String::new());

        lines.push("## Valuation".to_string());
        lines.push("| Component | Value |".to_string());
        lines.push("|-----------|-------|".to_string());
        lines.push(format!("| PV of FCFs | ${:.1}M |", result.pv_fcf_total()));
        lines.push(format!("| Terminal Value | ${:.1}M |", result.terminal_value));
        lines.push(format!("| PV of Terminal | ${:.1}M |", result.pv_terminal));
        lines.push(format!(
            "| **Enterprise Value** | **${:.1}M** |",
            result.enterprise_value
        ));
        lines.push(format!("| Less: Net Debt | ${:.1}M |", inputs.net_debt));
        lines.push(format!("| **Equity Value** | **${:.1}M** |", result.equity_value));
        lines.push(format!(
            "| **Intrinsic Value/Share** | **${:.2}** |",
            result.intrinsic_value_per_share
        ));
        lines.push(String::new());

        if let Some(cmp) = self.price_comparison() {
            lines.push("## vs Current Price".to_string());
            lines.push("| Metric | Value |".to_string());
            lines.push("|--------|-------|".to_string());
            lines.push(format!("| Current Price | ${:.2} |", cmp.current_price));
            lines.push(format!("| Intrinsic Value | ${:.2} |", cmp.intrinsic_value));
            lines.push(format!("| Upside/Downside | {} |", percent1(cmp.upside)));
            lines.push(format!("| **Status** | **{}** |", cmp.status.label()));
            lines.push(String::new());
        }

        lines.push("## Sensitivity Analysis".to_string());
        let grid = &self.sensitivity;
        let terminal_labels: Vec<String> = grid.terminal_rates.iter().map(|r| percent1(*r)).collect();
        lines.push(format!("| WACC \\ Terminal | {} |", terminal_labels.join(" | ")));
        lines.push(format!(
            "|-----------------|{}|",
            vec!["-------"; terminal_labels.len()].join("|")
        ));
        for (wacc, row) in grid.wacc_rates.iter().zip(&grid.values) {
            let cells: Vec<String> = row
                .iter()
                .map(|v| match v {
                    Some(v) => format!("${:.0}", v),
                    None => "N/A".to_string(),
                })
                .collect();
            lines.push(format!("| {} | {} |", percent1(*wacc), cells.join(" | ")));
        }

        lines.join("\n")
    }
}
