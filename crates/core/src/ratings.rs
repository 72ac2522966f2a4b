// Analyst ratings, price targets and earnings estimates

use crate::format::truncate_chars;
use crate::info::{unwrap_raw, TickerInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const MAX_RECENT_RATINGS: usize = 10;
pub const MAX_EARNINGS_QUARTERS: usize = 4;

/// Numeric field that may arrive bare or as {"raw": .., "fmt": ..}
fn raw_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .map(unwrap_raw)
        .and_then(|v| v.as_f64())
        .filter(|v| v.is_finite()))
}

fn raw_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(raw_number(deserializer)?.map(|v| v as i64))
}

fn epoch_date(secs: Option<i64>) -> String {
    secs.filter(|s| *s > 0)
        .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Entry of the `upgradeDowngradeHistory` module
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUpgrade {
    #[serde(default, deserialize_with = "raw_integer")]
    pub epoch_grade_date: Option<i64>,
    pub firm: Option<String>,
    pub to_grade: Option<String>,
    pub from_grade: Option<String>,
    pub action: Option<String>,
}

/// Entry of the `recommendationTrend` module
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrendPeriod {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub strong_buy: u32,
    #[serde(default)]
    pub buy: u32,
    #[serde(default)]
    pub hold: u32,
    #[serde(default)]
    pub sell: u32,
    #[serde(default)]
    pub strong_sell: u32,
}

/// Entry of the `earningsHistory` module
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEarningsQuarter {
    #[serde(default, deserialize_with = "raw_integer")]
    pub quarter: Option<i64>,
    #[serde(default, deserialize_with = "raw_number")]
    pub eps_estimate: Option<f64>,
    #[serde(default, deserialize_with = "raw_number")]
    pub eps_actual: Option<f64>,
    /// Fraction (0.05 = 5%)
    #[serde(default, deserialize_with = "raw_number")]
    pub surprise_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingAction {
    pub date: String,
    pub firm: String,
    pub to_grade: String,
    pub from_grade: String,
    pub action: String,
}

/// Current-period recommendation counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingTrend {
    pub strong_buy: u32,
    pub buy: u32,
    pub hold: u32,
    pub sell: u32,
    pub strong_sell: u32,
}

impl RatingTrend {
    /// Counts in display order, keyed the way Yahoo names them
    pub fn counts(&self) -> [(&'static str, u32); 5] {
        [
            ("strongBuy", self.strong_buy),
            ("buy", self.buy),
            ("hold", self.hold),
            ("sell", self.sell),
            ("strongSell", self.strong_sell),
        ]
    }

    /// The "0m" period, or the first one listed
    pub fn current(periods: &[RawTrendPeriod]) -> Option<Self> {
        let period = periods
            .iter()
            .find(|p| p.period == "0m")
            .or_else(|| periods.first())?;
        Some(Self {
            strong_buy: period.strong_buy,
            buy: period.buy,
            hold: period.hold,
            sell: period.sell,
            strong_sell: period.strong_sell,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalystRatings {
    pub ticker: String,
    pub current_price: Option<f64>,
    pub target_high: Option<f64>,
    pub target_low: Option<f64>,
    pub target_mean: Option<f64>,
    pub target_median: Option<f64>,
    pub recommendation: Option<String>,
    pub recommendation_mean: Option<f64>,
    pub num_analysts: Option<i64>,
    pub upside_potential: Option<f64>,
    pub recent_ratings: Vec<RatingAction>,
    pub rating_trend: Option<RatingTrend>,
}

impl AnalystRatings {
    pub fn build(
        ticker: &str,
        info: &TickerInfo,
        upgrades: &[RawUpgrade],
        trend: &[RawTrendPeriod],
    ) -> Self {
        let current_price = info.first_number(&["currentPrice", "regularMarketPrice"]);
        let target_mean = info.number("targetMeanPrice");
        let upside_potential = match (current_price, target_mean) {
            (Some(price), Some(target)) if price != 0.0 && target != 0.0 => {
                Some((target - price) / price)
            }
            _ => None,
        };

        let mut sorted: Vec<&RawUpgrade> = upgrades.iter().collect();
        sorted.sort_by(|a, b| b.epoch_grade_date.cmp(&a.epoch_grade_date));
        let recent_ratings = sorted
            .into_iter()
            .take(MAX_RECENT_RATINGS)
            .map(|u| RatingAction {
                date: epoch_date(u.epoch_grade_date),
                firm: u.firm.clone().unwrap_or_else(|| "Unknown".to_string()),
                to_grade: u.to_grade.clone().unwrap_or_default(),
                from_grade: u.from_grade.clone().unwrap_or_default(),
                action: u.action.clone().unwrap_or_default(),
            })
            .collect();

        Self {
            ticker: ticker.to_string(),
            current_price,
            target_high: info.number("targetHighPrice"),
            target_low: info.number("targetLowPrice"),
            target_mean,
            target_median: info.number("targetMedianPrice"),
            recommendation: info.text("recommendationKey").map(str::to_string),
            recommendation_mean: info.number("recommendationMean"),
            num_analysts: info.integer("numberOfAnalystOpinions"),
            upside_potential,
            recent_ratings,
            rating_trend: RatingTrend::current(trend),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterEstimate {
    pub date: String,
    pub eps_estimate: Option<f64>,
    pub eps_actual: Option<f64>,
    /// Percent (5.0 = 5%)
    pub surprise: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EarningsEstimates {
    pub current_eps: Option<f64>,
    pub forward_eps: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub earnings_quarterly_growth: Option<f64>,
    pub estimates: Vec<QuarterEstimate>,
}

impl EarningsEstimates {
    pub fn build(info: &TickerInfo, history: &[RawEarningsQuarter]) -> Self {
        let mut quarters: Vec<&RawEarningsQuarter> = history.iter().collect();
        quarters.sort_by(|a, b| b.quarter.cmp(&a.quarter));

        Self {
            current_eps: info.number("trailingEps"),
            forward_eps: info.number("forwardEps"),
            peg_ratio: info.number("pegRatio"),
            earnings_growth: info.number("earningsGrowth"),
            earnings_quarterly_growth: info.number("earningsQuarterlyGrowth"),
            estimates: quarters
                .into_iter()
                .take(MAX_EARNINGS_QUARTERS)
                .map(|q| QuarterEstimate {
                    date: epoch_date(q.quarter),
                    eps_estimate: q.eps_estimate,
                    eps_actual: q.eps_actual,
                    surprise: q.surprise_percent.map(|s| s * 100.0),
                })
                .collect(),
        }
    }
}

/// Plain-language reading of the 1 (strong buy) to 5 (strong sell) scale
pub fn interpret_recommendation(mean: Option<f64>) -> &'static str {
    match mean {
        None => "No Rating",
        Some(m) if m <= 1.5 => "Strong Buy",
        Some(m) if m <= 2.5 => "Buy",
        Some(m) if m <= 3.5 => "Hold",
        Some(m) if m <= 4.5 => "Sell",
        Some(_) => "Strong Sell",
    }
}

fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn dollars_or_na(value: Option<f64>) -> String {
    nonzero(value)
        .map(|v| format!("${:.2}", v))
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn format_ratings_markdown(ratings: &AnalystRatings, earnings: Option<&EarningsEstimates>) -> String {
    let mut lines = Vec::new();
    lines.push(format!("# Analyst Ratings: {}", ratings.ticker));
    lines.push(format!("\n**Generated:** {}", Utc::now().to_rfc3339()));
    lines.push(String::new());

    lines.push("## Price Targets".to_string());
    lines.push("| Metric | Value |".to_string());
    lines.push("|--------|-------|".to_string());
    let targets = [
        ("Current Price", ratings.current_price),
        ("Mean Target", ratings.target_mean),
        ("Median Target", ratings.target_median),
        ("High Target", ratings.target_high),
        ("Low Target", ratings.target_low),
    ];
    for (label, value) in targets {
        if let Some(v) = nonzero(value) {
            lines.push(format!("| {} | ${:.2} |", label, v));
        }
    }
    if let Some(upside) = ratings.upside_potential {
        lines.push(format!("| **Upside Potential** | **{:+.1}%** |", upside * 100.0));
    }
    lines.push(String::new());

    lines.push("## Consensus Rating".to_string());
    lines.push("| Metric | Value |".to_string());
    lines.push("|--------|-------|".to_string());
    lines.push(format!(
        "| Recommendation | {} |",
        ratings
            .recommendation
            .as_deref()
            .map(str::to_uppercase)
            .unwrap_or_else(|| "N/A".to_string())
    ));
    if let Some(mean) = nonzero(ratings.recommendation_mean) {
        lines.push(format!(
            "| Mean Score | {:.2} ({}) |",
            mean,
            interpret_recommendation(Some(mean))
        ));
    }
    if let Some(count) = ratings.num_analysts.filter(|n| *n != 0) {
        lines.push(format!("| # of Analysts | {} |", count));
    }
    lines.push(String::new());

    if let Some(trend) = &ratings.rating_trend {
        lines.push("## Rating Distribution".to_string());
        lines.push("| Rating | Count |".to_string());
        lines.push("|--------|-------|".to_string());
        for (label, count) in trend.counts() {
            if count > 0 {
                lines.push(format!("| {} | {} |", label, count));
            }
        }
        lines.push(String::new());
    }

    if !ratings.recent_ratings.is_empty() {
        lines.push("## Recent Analyst Actions".to_string());
        lines.push("| Date | Firm | Action | Rating |".to_string());
        lines.push("|------|------|--------|--------|".to_string());
        for r in ratings.recent_ratings.iter().take(MAX_RECENT_RATINGS) {
            lines.push(format!(
                "| {} | {} | {} | {} |",
                r.date,
                truncate_chars(&r.firm, 20, ""),
                r.action,
                r.to_grade
            ));
        }
        lines.push(String::new());
    }

    if let Some(earnings) = earnings {
        lines.push("## Earnings".to_string());
        lines.push("| Metric | Value |".to_string());
        lines.push("|--------|-------|".to_string());
        if let Some(eps) = nonzero(earnings.current_eps) {
            lines.push(format!("| TTM EPS | ${:.2} |", eps));
        }
        if let Some(eps) = nonzero(earnings.forward_eps) {
            lines.push(format!("| Forward EPS | ${:.2} |", eps));
        }
        if let Some(growth) = nonzero(earnings.earnings_growth) {
            lines.push(format!("| Earnings Growth | {:.1}% |", growth * 100.0));
        }
        lines.push(String::new());

        if !earnings.estimates.is_empty() {
            lines.push("### Recent Quarters".to_string());
            lines.push("| Date | Estimate | Actual | Surprise |".to_string());
            lines.push("|------|----------|--------|----------|".to_string());
            for e in &earnings.estimates {
                let surprise = nonzero(e.surprise)
                    .map(|s| format!("{:.1}%", s))
                    .unwrap_or_else(|| "N/A".to_string());
                lines.push(format!(
                    "| {} | {} | {} | {} |",
                    e.date,
                    dollars_or_na(e.eps_estimate),
                    dollars_or_na(e.eps_actual),
                    surprise
                ));
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn info() -> TickerInfo {
        let mut info = TickerInfo::new();
        info.insert("currentPrice", 100.0);
        info.insert("targetMeanPrice", 112.3);
        info.insert("targetHighPrice", 130.0);
        info.insert("recommendationKey", "buy");
        info.insert("recommendationMean", 2.1);
        info.insert("numberOfAnalystOpinions", 9);
        info
    }

    fn upgrades() -> Vec<RawUpgrade> {
        serde_json::from_value(json!([
            {"epochGradeDate": 1_700_000_000_i64, "firm": "Old Firm", "toGrade": "Hold", "action": "main"},
            {"epochGradeDate": 1_714_566_600_i64, "firm": "A Very Long Research Firm Name", "toGrade": "Buy", "fromGrade": "Hold", "action": "up"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_interpret_recommendation() {
        assert_eq!(interpret_recommendation(Some(1.5)), "Strong Buy");
        assert_eq!(interpret_recommendation(Some(1.51)), "Buy");
        assert_eq!(interpret_recommendation(Some(2.5)), "Buy");
        assert_eq!(interpret_recommendation(Some(3.0)), "Hold");
        assert_eq!(interpret_recommendation(Some(4.5)), "Sell");
        assert_eq!(interpret_recommendation(Some(4.8)), "Strong Sell");
        assert_eq!(interpret_recommendation(None), "No Rating");
    }

    #[test]
    fn test_build_computes_upside_and_orders_actions() {
        let ratings = AnalystRatings::build("GOLF", &info(), &upgrades(), &[]);

        let upside = ratings.upside_potential.unwrap();
        assert!((upside - 0.123).abs() < 1e-9);
        assert_eq!(ratings.recent_ratings[0].date, "2024-05-01");
        assert_eq!(ratings.recent_ratings[0].from_grade, "Hold");
        assert_eq!(ratings.recent_ratings[1].from_grade, "");
        assert!(ratings.rating_trend.is_none());
    }

    #[test]
    fn test_recent_actions_capped() {
        let many: Vec<RawUpgrade> = (0..15)
            .map(|i| RawUpgrade {
                epoch_grade_date: Some(1_700_000_000 + i * 86_400),
                ..Default::default()
            })
            .collect();
        let ratings = AnalystRatings::build("X", &TickerInfo::new(), &many, &[]);

        assert_eq!(ratings.recent_ratings.len(), MAX_RECENT_RATINGS);
        assert_eq!(ratings.recent_ratings[0].firm, "Unknown");
        assert!(ratings.upside_potential.is_none());
    }

    #[test]
    fn test_trend_prefers_current_period() {
        let trend: Vec<RawTrendPeriod> = serde_json::from_value(json!([
            {"period": "-1m", "strongBuy": 9},
            {"period": "0m", "strongBuy": 2, "buy": 4, "hold": 3}
        ]))
        .unwrap();

        let current = RatingTrend::current(&trend).unwrap();
        assert_eq!(current.strong_buy, 2);
        assert_eq!(current.sell, 0);
        assert!(RatingTrend::current(&[]).is_none());
    }

    #[test]
    fn test_earnings_quarters_newest_first() {
        let history: Vec<RawEarningsQuarter> = serde_json::from_value(json!([
            {"quarter": {"raw": 1_696_032_000_i64, "fmt": "2023-09-30"}, "epsEstimate": {"raw": 1.1}, "epsActual": {"raw": 1.2}, "surprisePercent": {"raw": 0.0909}},
            {"quarter": {"raw": 1_703_980_800_i64, "fmt": "2023-12-31"}, "epsEstimate": {"raw": 0.3}, "epsActual": {}, "surprisePercent": null}
        ]))
        .unwrap();

        let estimates = EarningsEstimates::build(&TickerInfo::new(), &history);
        assert_eq!(estimates.estimates[0].date, "2023-12-31");
        assert!(estimates.estimates[0].eps_actual.is_none());
        let surprise = estimates.estimates[1].surprise.unwrap();
        assert!((surprise - 9.09).abs() < 1e-9);
    }

    #[test]
    fn test_markdown() {
        let trend = vec![RawTrendPeriod {
            period: "0m".to_string(),
            strong_buy: 2,
            buy: 4,
            ..Default::default()
        }];
        let ratings = AnalystRatings::build("GOLF", &info(), &upgrades(), &trend);
        let mut earnings_info = TickerInfo::new();
        earnings_info.insert("trailingEps", 3.456);
        earnings_info.insert("earningsGrowth", 0.125);
        let earnings = EarningsEstimates::build(
            &earnings_info,
            &[RawEarningsQuarter {
                quarter: Some(1_703_980_800),
                eps_estimate: Some(0.3),
                eps_actual: None,
                surprise_percent: None,
            }],
        );

        let md = format_ratings_markdown(&ratings, Some(&earnings));

        assert!(md.starts_with("# Analyst Ratings: GOLF"));
        assert!(md.contains("| Current Price | $100.00 |"));
        assert!(md.contains("| Mean Target | $112.30 |"));
        assert!(!md.contains("Low Target"));
        assert!(md.contains("| **Upside Potential** | **+12.3%** |"));
        assert!(md.contains("| Recommendation | BUY |"));
        assert!(md.contains("| Mean Score | 2.10 (Buy) |"));
        assert!(md.contains("| # of Analysts | 9 |"));
        assert!(md.contains("| strongBuy | 2 |\n| buy | 4 |\n"));
        assert!(!md.contains("| hold |"));
        assert!(md.contains("| 2024-05-01 | A Very Long Research | up | Buy |"));
        assert!(md.contains("| TTM EPS | $3.46 |"));
        assert!(md.contains("| Earnings Growth | 12.5% |"));
        assert!(md.contains("| 2023-12-31 | $0.30 | N/A | N/A |"));
    }

    #[test]
    fn test_markdown_negative_upside_and_no_rating() {
        let mut info = TickerInfo::new();
        info.insert("regularMarketPrice", 50.0);
        info.insert("targetMeanPrice", 40.0);
        let ratings = AnalystRatings::build("X", &info, &[], &[]);
        let md = format_ratings_markdown(&ratings, None);

        assert!(md.contains("| **Upside Potential** | **-20.0%** |"));
        assert!(md.contains("| Recommendation | N/A |"));
        assert!(!md.contains("## Earnings"));
        assert!(!md.contains("## Recent Analyst Actions"));
    }
}
