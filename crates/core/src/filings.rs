// SEC EDGAR filings: CIK lookup, submission parsing and filing text helpers

use crate::error::ResearchResult;
use crate::format::truncate_chars;
use chrono::Utc;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const SEC_ARCHIVE_BASE: &str = "https://www.sec.gov/Archives/edgar/data";

/// Submissions beyond this index are never scanned
pub const MAX_SCANNED_FILINGS: usize = 100;
pub const DEFAULT_FILING_LIMIT: usize = 10;
pub const DEFAULT_MAX_CHARS: usize = 50_000;
pub const SECTION_MAX_CHARS: usize = 10_000;

/// Central Index Key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cik(u64);

impl Cik {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Form used in archive paths, without leading zeros
    pub fn unpadded(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:010}", self.0)
    }
}

/// One entry of `company_tickers.json`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompanyTickerEntry {
    pub cik_str: u64,
    pub ticker: String,
    #[serde(default)]
    pub title: String,
}

/// `company_tickers.json` is an object keyed by row number
pub type CompanyTickers = BTreeMap<String, CompanyTickerEntry>;

pub fn find_company<'a>(tickers: &'a CompanyTickers, ticker: &str) -> Option<&'a CompanyTickerEntry> {
    tickers
        .values()
        .find(|entry| entry.ticker.eq_ignore_ascii_case(ticker))
}

pub fn find_cik(tickers: &CompanyTickers, ticker: &str) -> Option<Cik> {
    find_company(tickers, ticker).map(|entry| Cik(entry.cik_str))
}

/// `data.sec.gov/submissions/CIK##########.json`, trimmed to what we read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submissions {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub filings: SubmissionFilings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionFilings {
    #[serde(default)]
    pub recent: RecentFilings,
}

/// Recent filings as parallel arrays
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    #[serde(default)]
    pub form: Vec<String>,
    #[serde(default)]
    pub filing_date: Vec<String>,
    #[serde(default)]
    pub accession_number: Vec<String>,
    #[serde(default)]
    pub primary_document: Vec<String>,
    #[serde(default)]
    pub primary_doc_description: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filing {
    pub form: String,
    pub filing_date: String,
    pub accession_number: String,
    pub description: String,
    pub document_url: String,
    pub index_url: String,
}

fn nth(values: &[String], i: usize) -> &str {
    values.get(i).map(String::as_str).unwrap_or("")
}

/// Form filter: exact or prefix match, case-insensitive ("10-K" keeps "10-K/A")
fn form_matches(form: &str, filter: &str) -> bool {
    let form = form.to_uppercase();
    let filter = filter.to_uppercase();
    form == filter || form.starts_with(&filter)
}

pub fn filings_from_submissions(
    cik: &Cik,
    submissions: &Submissions,
    filing_type: Option<&str>,
    limit: usize,
) -> Vec<Filing> {
    let recent = &submissions.filings.recent;
    let mut filings = Vec::new();
    if limit == 0 {
        return filings;
    }

    for i in 0..recent.form.len().min(MAX_SCANNED_FILINGS) {
        let form = nth(&recent.form, i);
        if let Some(filter) = filing_type.filter(|f| !f.is_empty()) {
            if !form_matches(form, filter) {
                continue;
            }
        }

        let accession = nth(&recent.accession_number, i);
        let accession_clean = accession.replace('-', "");
        let index_url = format!("{}/{}/{}/", SEC_ARCHIVE_BASE, cik.unpadded(), accession_clean);
        let document_url = format!("{}{}", index_url, nth(&recent.primary_document, i));

        filings.push(Filing {
            form: form.to_string(),
            filing_date: nth(&recent.filing_date, i).to_string(),
            accession_number: accession.to_string(),
            description: nth(&recent.primary_doc_description, i).to_string(),
            document_url,
            index_url,
        });

        if filings.len() >= limit {
            break;
        }
    }

    filings
}

/// Crude HTML to text conversion for filing documents.
///
/// Plain-text documents pass through untouched.
pub fn html_to_text(content: &str) -> ResearchResult<String> {
    let lower = content.to_lowercase();
    if !lower.contains("<html") && !lower.contains("<body") {
        return Ok(content.to_string());
    }

    let script = RegexBuilder::new(r"<script[^>]*>.*?</script>")
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()?;
    let style = RegexBuilder::new(r"<style[^>]*>.*?</style>")
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()?;
    let tag = Regex::new(r"<[^>]+>")?;
    let whitespace = Regex::new(r"\s+")?;

    let text = script.replace_all(content, "");
    let text = style.replace_all(&text, "");
    let text = tag.replace_all(&text, " ");
    let text = whitespace.replace_all(&text, " ");
    Ok(text.trim().to_string())
}

pub fn truncate_content(content: &str, max_chars: usize) -> String {
    truncate_chars(
        content,
        max_chars,
        &format!("\n\n[... truncated at {} characters ...]", max_chars),
    )
}

fn section_pattern(section: &str) -> String {
    match section.to_lowercase().as_str() {
        "business" => r"(?:Item\s*1[.\s]*[-–—]?\s*)?Business\s*\n".to_string(),
        "risk" => r"(?:Item\s*1A[.\s]*[-–—]?\s*)?Risk\s*Factors".to_string(),
        "mda" => r"(?:Item\s*7[.\s]*[-–—]?\s*)?Management['’`]?s?\s*Discussion".to_string(),
        "financials" => r"(?:Item\s*8[.\s]*[-–—]?\s*)?Financial\s*Statements".to_string(),
        _ => regex::escape(section),
    }
}

/// Up to 10,000 characters starting at the first match of a named section
/// (`business`, `risk`, `mda`, `financials`) or of the literal text.
pub fn find_section(content: &str, section: &str) -> ResearchResult<String> {
    let pattern = RegexBuilder::new(&section_pattern(section))
        .case_insensitive(true)
        .build()?;

    Ok(match pattern.find(content) {
        Some(m) => content[m.start()..].chars().take(SECTION_MAX_CHARS).collect(),
        None => format!("Section '{}' not found in filing.", section),
    })
}

pub fn format_filings_markdown(ticker: &str, filings: &[Filing], company_name: Option<&str>) -> String {
    let mut lines = Vec::new();
    let name = company_name.filter(|n| !n.is_empty()).unwrap_or(ticker);

    lines.push(format!("# SEC Filings: {} ({})", name, ticker));
    lines.push(format!("\n**Generated:** {}", Utc::now().to_rfc3339()));
    lines.push("\n**Source:** SEC EDGAR".to_string());
    lines.push(String::new());

    if filings.is_empty() {
        lines.push("No filings found.".to_string());
        return lines.join("\n");
    }

    lines.push("| Date | Form | Description | Link |".to_string());
    lines.push("|------|------|-------------|------|".to_string());
    for filing in filings {
        lines.push(format!(
            "| {} | {} | {} | [View]({}) |",
            filing.filing_date,
            filing.form,
            truncate_chars(&filing.description, 50, ""),
            filing.document_url
        ));
    }

    lines.join("\n")
}
