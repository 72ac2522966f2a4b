// Full analysis report: snapshot, DCF, optional comparison and a summary

use crate::dcf::DcfResult;
use crate::error::ResearchResult;
use crate::format::{group_thousands, percent1, NA};
use crate::snapshot::StockSnapshot;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const SEPARATOR: &str = "\n---\n";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportSection {
    Rendered {
        heading: Option<String>,
        body: String,
    },
    Failed {
        heading: String,
        message: String,
    },
}

impl ReportSection {
    pub fn rendered(body: impl Into<String>) -> Self {
        Self::Rendered {
            heading: None,
            body: body.into(),
        }
    }

    pub fn with_heading(heading: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Rendered {
            heading: Some(heading.into()),
            body: body.into(),
        }
    }

    pub fn failed(heading: impl Into<String>, message: impl ToString) -> Self {
        Self::Failed {
            heading: heading.into(),
            message: message.to_string(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    fn push_markdown(&self, out: &mut Vec<String>) {
        match self {
            Self::Rendered { heading, body } => {
                if let Some(heading) = heading {
                    out.push(format!("## {}\n", heading));
                }
                out.push(body.clone());
            }
            Self::Failed { heading, message } => {
                out.push(format!("## {}\n\n{}\n", heading, message));
            }
        }
        out.push(SEPARATOR.to_string());
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub ticker: String,
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<ReportSection>,
    pub summary: String,
}

impl AnalysisReport {
    pub fn new(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            generated_at: Utc::now(),
            sections: Vec::new(),
            summary: String::new(),
        }
    }

    pub fn push(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn to_markdown(&self) -> String {
        let mut out = Vec::new();
        out.push(format!("# Full Analysis: {}", self.ticker));
        out.push(format!(
            "\n**Generated:** {}",
            self.generated_at.format("%Y-%m-%d %H:%M")
        ));
        out.push(SEPARATOR.to_string());
        for section in &self.sections {
            section.push_markdown(&mut out);
        }
        out.push(self.summary.clone());
        out.join("\n")
    }

    /// Write the Markdown report into `dir`, creating it if needed
    pub fn save(&self, dir: &Path) -> ResearchResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(report_file_name(&self.ticker, self.generated_at.date_naive()));
        fs::write(&path, self.to_markdown())?;
        Ok(path)
    }
}

pub fn report_file_name(ticker: &str, date: NaiveDate) -> String {
    format!("{}_analysis_{}.md", ticker.to_uppercase(), date.format("%Y%m%d"))
}

fn summary_number(value: Option<f64>) -> String {
    match value {
        None => NA.to_string(),
        Some(v) if v.abs() >= 1e9 => format!("${:.1}B", v / 1e9),
        Some(v) if v.abs() >= 1e6 => format!("${:.1}M", v / 1e6),
        Some(v) => format!("${}", group_thousands(v)),
    }
}

fn summary_percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}%", v * 100.0))
        .unwrap_or_else(|| NA.to_string())
}

fn summary_ratio(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}x", v))
        .unwrap_or_else(|| NA.to_string())
}

/// Verdict and recommendation for a DCF upside
fn assessment(upside: f64) -> (&'static str, &'static str) {
    if upside > 0.20 {
        (
            "🟢 **UNDERVALUED** - Significant margin of safety",
            "**BUY** - Stock trading below intrinsic value with margin of safety.",
        )
    } else if upside > 0.0 {
        (
            "🟡 **SLIGHTLY UNDERVALUED** - Limited upside",
            "**HOLD** - Fair value, wait for better entry or position size appropriately.",
        )
    } else if upside > -0.20 {
        (
            "🟡 **FAIRLY VALUED to SLIGHTLY OVERVALUED**",
            "**HOLD/TRIM** - Slightly overvalued, don't add at current levels.",
        )
    } else {
        (
            "🔴 **OVERVALUED** - Price exceeds intrinsic value",
            "**AVOID/SELL** - Significantly overvalued, better opportunities elsewhere.",
        )
    }
}

pub fn generate_summary(
    snapshot: Option<&StockSnapshot>,
    dcf: Option<&DcfResult>,
    current_price: Option<f64>,
) -> String {
    let mut lines = Vec::new();
    lines.push("## Investment Summary".to_string());
    lines.push(String::new());

    lines.push("### Key Metrics".to_string());
    lines.push("| Metric | Value |".to_string());
    lines.push("|--------|-------|".to_string());
    if let Some(snapshot) = snapshot {
        let val = &snapshot.valuation;
        let fin = &snapshot.financials;
        lines.push(format!("| Market Cap | {} |", summary_number(val.market_cap)));
        lines.push(format!("| P/E | {} |", summary_ratio(val.pe_trailing)));
        lines.push(format!("| EV/EBITDA | {} |", summary_ratio(val.ev_to_ebitda)));
        lines.push(format!("| Revenue | {} |", summary_number(fin.revenue)));
        lines.push(format!("| Profit Margin | {} |", summary_percent(fin.profit_margin)));
        lines.push(format!("| ROE | {} |", summary_percent(fin.roe)));
    }

    let price = current_price.filter(|p| *p > 0.0);
    let upside = match (dcf, price) {
        (Some(result), Some(price)) => {
            Some((result.intrinsic_value_per_share, price, (result.intrinsic_value_per_share - price) / price))
        }
        _ => None,
    };

    if let Some((iv, price, upside)) = upside {
        lines.push(String::new());
        lines.push("### Valuation Assessment".to_string());
        lines.push(String::new());
        lines.push(format!("| Current Price | ${:.2} |", price));
        lines.push(format!("| DCF Intrinsic Value | ${:.2} |", iv));
        lines.push(format!("| Upside/Downside | {} |", percent1(upside)));
        lines.push(format!("| **Verdict** | {} |", assessment(upside).0));
    }

    lines.push(String::new());
    lines.push("### Recommendation".to_string());
    lines.push(String::new());
    match upside {
        Some((_, _, upside)) => lines.push(assessment(upside).1.to_string()),
        None => lines.push("*Unable to generate recommendation - insufficient data*".to_string()),
    }

    lines.join("\n")
}
