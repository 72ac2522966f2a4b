// Terminal report for a run

use crate::baseline::{Baseline, Comparison};
use crate::runner::{score, AgentResult};
use colored::Colorize;

const BAR_WIDTH: usize = 20;
const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentStatus {
    Pass,
    Warn,
    Fail,
}

impl AgentStatus {
    /// PASS with no failures, WARN with up to two, FAIL beyond that
    pub fn from_failed(failed: usize) -> Self {
        match failed {
            0 => Self::Pass,
            1..=2 => Self::Warn,
            _ => Self::Fail,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Warn => "WARN",
            Self::Fail => "FAIL",
        }
    }

    fn colored(&self) -> String {
        let tag = format!("[{}]", self.label());
        match self {
            Self::Pass => tag.green().to_string(),
            Self::Warn => tag.yellow().to_string(),
            Self::Fail => tag.red().to_string(),
        }
    }
}

pub fn progress_bar(passed: usize, total: usize) -> String {
    let filled = if total > 0 {
        (BAR_WIDTH * passed / total).min(BAR_WIDTH)
    } else {
        0
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn delta_marker(delta: f64) -> String {
    if delta > 0.0 {
        format!(" ↑ +{:.0}%", delta).green().to_string()
    } else if delta < 0.0 {
        format!(" ↓ {:.0}%", delta).red().to_string()
    } else {
        " =".yellow().to_string()
    }
}

/// Outcome of a run, as used for exit codes
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_passed: usize,
    pub total_failed: usize,
    pub total_warnings: usize,
    pub comparison: Comparison,
}

impl Summary {
    pub fn new(results: &[AgentResult], baseline: Option<&Baseline>) -> Self {
        Self {
            total_passed: results.iter().map(|r| r.passed).sum(),
            total_failed: results.iter().map(|r| r.failed).sum(),
            total_warnings: results.iter().map(|r| r.warnings).sum(),
            comparison: baseline
                .map(|b| Comparison::new(results, b))
                .unwrap_or_default(),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.total_failed == 0
    }

    pub fn overall_score(&self) -> f64 {
        score(self.total_passed, self.total_passed + self.total_failed)
    }
}

pub fn render(results: &[AgentResult], summary: &Summary, baseline: Option<&Baseline>, verbose: bool) -> String {
    let mut out = Vec::new();
    let rule = "=".repeat(RULE_WIDTH);

    out.push(String::new());
    out.push(rule.bold().to_string());
    out.push(format!("{:^width$}", "AGENT STRUCTURE TEST RESULTS", width = RULE_WIDTH).bold().to_string());
    out.push(rule.bold().to_string());
    out.push(String::new());

    for result in results {
        let status = AgentStatus::from_failed(result.failed);
        let delta = baseline
            .and_then(|b| b.delta(result))
            .map(delta_marker)
            .unwrap_or_default();

        out.push(format!(
            "  {:20} {} {}/{} ({:.0}%) {}{}",
            result.agent,
            progress_bar(result.passed, result.total),
            result.passed,
            result.total,
            result.score,
            status.colored(),
            delta
        ));

        if verbose {
            for detail in &result.details {
                let icon = if detail.warning {
                    "⚠".yellow()
                } else if detail.passed {
                    "✓".green()
                } else {
                    "✗".red()
                };
                out.push(format!("      {} {}: {}", icon, detail.test, detail.status));
            }
            out.push(String::new());
        }
    }

    let thin = "─".repeat(RULE_WIDTH);
    let overall = summary.overall_score();
    let total = summary.total_passed + summary.total_failed;

    out.push(String::new());
    out.push(thin.bold().to_string());
    out.push(format!(
        "  TOTAL: {}/{} passed ({:.0}%)",
        summary.total_passed, total, overall
    ));

    if let Some(baseline) = baseline {
        let old = baseline.overall_score;
        let delta = overall - old;
        let line = if delta > 0.0 {
            format!("  Baseline: {:.0}% → {:.0}% (+{:.0}%) IMPROVED", old, overall, delta).green()
        } else if delta < 0.0 {
            format!("  Baseline: {:.0}% → {:.0}% ({:.0}%) REGRESSION", old, overall, delta).red()
        } else {
            format!("  Baseline: {:.0}% → {:.0}% (no change)", old, overall).yellow()
        };
        out.push(line.to_string());
    }

    if summary.total_warnings > 0 {
        out.push(
            format!("  Warnings: {} (recommended files missing)", summary.total_warnings)
                .yellow()
                .to_string(),
        );
    }
    if summary.total_failed > 0 {
        out.push(
            format!("  Failed: {} checks need attention", summary.total_failed)
                .red()
                .to_string(),
        );
    }

    let comparison = &summary.comparison;
    if !comparison.regressions.is_empty() {
        out.push(String::new());
        out.push(
            format!("  REGRESSIONS: {}", comparison.regressions.join(", "))
                .red()
                .to_string(),
        );
    }
    if !comparison.improvements.is_empty() {
        out.push(
            format!("  IMPROVEMENTS: {}", comparison.improvements.join(", "))
                .green()
                .to_string(),
        );
    }

    out.push(thin.bold().to_string());
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CheckDetail;
    use chrono::Utc;

    fn result(agent: &str, passed: usize, failed: usize, warnings: usize) -> AgentResult {
        let total = passed + failed;
        AgentResult {
            agent: agent.to_string(),
            passed,
            failed,
            warnings,
            total,
            score: score(passed, total),
            details: vec![CheckDetail {
                test: "Required: AGENTS.md".to_string(),
                passed: failed == 0,
                status: if failed == 0 { "exists" } else { "MISSING" }.to_string(),
                warning: false,
            }],
        }
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(AgentStatus::from_failed(0), AgentStatus::Pass);
        assert_eq!(AgentStatus::from_failed(2), AgentStatus::Warn);
        assert_eq!(AgentStatus::from_failed(3).label(), "FAIL");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(5, 10), format!("{}{}", "█".repeat(10), "░".repeat(10)));
        assert_eq!(progress_bar(0, 0), "░".repeat(20));
        assert_eq!(progress_bar(7, 7).chars().count(), 20);
    }

    #[test]
    fn test_render_with_baseline() {
        colored::control::set_override(false);

        let before = [result("factory", 4, 0, 0), result("info-agent", 2, 2, 0)];
        let baseline = Baseline::from_results(&before, Utc::now());
        let after = [result("factory", 3, 1, 1), result("info-agent", 4, 0, 0)];

        let summary = Summary::new(&after, Some(&baseline));
        let text = render(&after, &summary, Some(&baseline), true);

        assert!(text.contains("AGENT STRUCTURE TEST RESULTS"));
        assert!(text.contains("3/4 (75%) [WARN] ↓ -25%"));
        assert!(text.contains("4/4 (100%) [PASS] ↑ +50%"));
        assert!(text.contains("✗ Required: AGENTS.md: MISSING"));
        assert!(text.contains("TOTAL: 7/8 passed (88%)"));
        assert!(text.contains("Baseline: 75% → 88% (+12%) IMPROVED"));
        assert!(text.contains("Warnings: 1 (recommended files missing)"));
        assert!(text.contains("REGRESSIONS: factory"));
        assert!(text.contains("IMPROVEMENTS: info-agent"));
        assert!(!summary.all_passed());
    }
}
