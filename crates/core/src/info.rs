// Loosely-typed quote data as returned by Yahoo Finance
//
// quoteSummary hands back a handful of modules whose numbers are either bare
// or wrapped as {"raw": .., "fmt": ..}. TickerInfo flattens every module into
// one camelCase key map so callers can look fields up by the names yfinance
// users know (currentPrice, marketCap, freeCashflow, ...).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Flattened quote fields for one ticker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickerInfo {
    fields: BTreeMap<String, Value>,
}

impl TickerInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge quoteSummary modules into a single map.
    ///
    /// Modules are merged in iteration order; a key already present keeps its
    /// first non-null value.
    pub fn from_modules(modules: &Map<String, Value>) -> Self {
        let mut info = Self::new();
        for module in modules.values() {
            if let Value::Object(fields) = module {
                for (key, value) in fields {
                    let value = unwrap_raw(value);
                    if value.is_null() {
                        continue;
                    }
                    info.fields.entry(key.clone()).or_insert(value);
                }
            }
        }
        info
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Finite numeric value for `key`
    pub fn number(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(Value::as_f64).filter(|v| v.is_finite())
    }

    /// First present numeric value among `keys`
    pub fn first_number(&self, keys: &[&str]) -> Option<f64> {
        keys.iter().find_map(|key| self.number(key))
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        let value = self.fields.get(key)?;
        value
            .as_i64()
            .or_else(|| value.as_f64().filter(|v| v.is_finite()).map(|v| v as i64))
    }

    /// Non-empty string value for `key`
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn first_text(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.text(key))
    }

    /// Epoch-seconds field as a UTC timestamp
    pub fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        self.integer(key)
            .filter(|secs| *secs > 0)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Unwrap Yahoo's {"raw": x, "fmt": ".."} wrapper, leaving other values as-is.
///
/// Empty wrapper objects ({}) become null.
pub fn unwrap_raw(value: &Value) -> Value {
    match value {
        Value::Object(map) if map.contains_key("raw") => map["raw"].clone(),
        Value::Object(map) if map.is_empty() => Value::Null,
        other => other.clone(),
    }
}

/// One reporting period of a financial statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementPeriod {
    pub end_date: Option<NaiveDate>,
    pub values: BTreeMap<String, f64>,
}

impl StatementPeriod {
    pub fn value(&self, row: &str) -> Option<f64> {
        self.values.get(row).copied()
    }

    pub fn period_label(&self) -> String {
        self.end_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// Statement history, newest period first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub periods: Vec<StatementPeriod>,
}

impl Statement {
    /// Build from a quoteSummary history array (e.g. `incomeStatementHistory`)
    pub fn from_history(entries: &[Value]) -> Self {
        let mut periods: Vec<StatementPeriod> = entries
            .iter()
            .filter_map(Value::as_object)
            .map(|entry| {
                let end_date = entry
                    .get("endDate")
                    .map(unwrap_raw)
                    .and_then(|v| v.as_i64())
                    .and_then(|secs| DateTime::from_timestamp(secs, 0))
                    .map(|dt| dt.date_naive());

                let values = entry
                    .iter()
                    .filter(|(key, _)| key.as_str() != "endDate" && key.as_str() != "maxAge")
                    .filter_map(|(key, value)| {
                        unwrap_raw(value)
                            .as_f64()
                            .filter(|v| v.is_finite())
                            .map(|v| (key.clone(), v))
                    })
                    .collect();

                StatementPeriod { end_date, values }
            })
            .collect();

        periods.sort_by(|a, b| b.end_date.cmp(&a.end_date));
        Self { periods }
    }

    pub fn latest(&self) -> Option<&StatementPeriod> {
        self.periods.first()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// Annual statements for one ticker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub income: Option<Statement>,
    pub balance: Option<Statement>,
    pub cash_flow: Option<Statement>,
}

impl FinancialStatements {
    /// Free cash flow from the latest cash flow statement.
    ///
    /// Yahoo rarely reports freeCashFlow directly in the history modules, so
    /// fall back to operating cash flow plus (negative) capital expenditure.
    pub fn latest_free_cash_flow(&self) -> Option<f64> {
        let latest = self.cash_flow.as_ref()?.latest()?;
        latest.value("freeCashFlow").or_else(|| {
            let operating = latest.value("totalCashFromOperatingActivities")?;
            let capex = latest.value("capitalExpenditures").unwrap_or(0.0);
            Some(operating + capex)
        })
    }
}
