// Saved scores and comparison against the current run

use crate::error::EvalResult;
use crate::runner::{score, AgentResult};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const BASELINE_FILE: &str = "baseline.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineEntry {
    pub score: f64,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub agents: BTreeMap<String, BaselineEntry>,
    #[serde(default)]
    pub overall_score: f64,
}

impl Baseline {
    pub fn from_results(results: &[AgentResult], timestamp: DateTime<Utc>) -> Self {
        let agents = results
            .iter()
            .map(|r| {
                (
                    r.agent.clone(),
                    BaselineEntry {
                        score: r.score,
                        passed: r.passed,
                        failed: r.failed,
                        total: r.total,
                    },
                )
            })
            .collect();

        let passed = results.iter().map(|r| r.passed).sum();
        let total = results.iter().map(|r| r.total).sum();

        Self {
            timestamp,
            agents,
            overall_score: score(passed, total),
        }
    }

    pub fn path(results_dir: &Path) -> PathBuf {
        results_dir.join(BASELINE_FILE)
    }

    /// Write `baseline.json` into `results_dir`, creating the directory
    pub fn save(&self, results_dir: &Path) -> EvalResult<PathBuf> {
        std::fs::create_dir_all(results_dir)?;
        let path = Self::path(results_dir);
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }

    /// None when no baseline has been saved yet
    pub fn load(results_dir: &Path) -> EvalResult<Option<Self>> {
        let path = Self::path(results_dir);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Score change for an agent; None when the baseline has no entry for it
    pub fn delta(&self, result: &AgentResult) -> Option<f64> {
        self.agents
            .get(&result.agent)
            .map(|entry| result.score - entry.score)
    }
}

/// RFC 3339, or an offset-free ISO timestamp read as local time. Older
/// baselines were written without an offset.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid timestamp '{}'", raw))
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc));
    Some(local.unwrap_or_else(|| Utc.from_utc_datetime(&naive)))
}

/// Agents whose score moved against the baseline, in result order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    pub regressions: Vec<String>,
    pub improvements: Vec<String>,
}

impl Comparison {
    pub fn new(results: &[AgentResult], baseline: &Baseline) -> Self {
        let mut comparison = Self::default();
        for result in results {
            match baseline.delta(result) {
                Some(delta) if delta < 0.0 => comparison.regressions.push(result.agent.clone()),
                Some(delta) if delta > 0.0 => comparison.improvements.push(result.agent.clone()),
                _ => {}
            }
        }
        comparison
    }

    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}
