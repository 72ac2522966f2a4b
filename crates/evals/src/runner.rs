// Run the structure checks against agent workspaces

use crate::checks::{check_file_exists, check_pattern_in_file};
use crate::config::StructureConfig;
use crate::error::EvalResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Marker file that identifies an agent workspace during discovery
pub const AGENT_MARKER: &str = "AGENTS.md";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckDetail {
    pub test: String,
    pub passed: bool,
    pub status: String,
    /// Recommended file missing; not counted as a failure
    #[serde(default)]
    pub warning: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub agent: String,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub total: usize,
    /// Percent with one decimal
    pub score: f64,
    pub details: Vec<CheckDetail>,
}

impl AgentResult {
    fn new(agent: &str) -> Self {
        Self {
            agent: agent.to_string(),
            passed: 0,
            failed: 0,
            warnings: 0,
            total: 0,
            score: 0.0,
            details: Vec::new(),
        }
    }

    fn record(&mut self, test: String, passed: bool, status: String) {
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.details.push(CheckDetail {
            test,
            passed,
            status,
            warning: false,
        });
    }

    fn record_recommended(&mut self, test: String, passed: bool, status: String) {
        if passed {
            self.passed += 1;
        } else {
            self.warnings += 1;
        }
        self.details.push(CheckDetail {
            test,
            passed,
            status,
            warning: !passed,
        });
    }

    fn finish(mut self) -> Self {
        self.total = self.passed + self.failed;
        self.score = score(self.passed, self.total);
        self
    }
}

/// `passed / total` as a percentage rounded to one decimal; 0 without checks
pub fn score(passed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (passed as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Check one agent workspace. `name` labels the result; `dir` is where it lives.
pub fn test_agent(name: &str, dir: &Path, config: &StructureConfig) -> EvalResult<AgentResult> {
    let mut result = AgentResult::new(name);

    for filename in &config.required_files {
        let (passed, status) = check_file_exists(dir, filename);
        result.record(format!("Required: {}", filename), passed, status.to_string());
    }

    for filename in &config.recommended_files {
        let (passed, status) = check_file_exists(dir, filename);
        result.record_recommended(format!("Recommended: {}", filename), passed, status.to_string());
    }

    for (file, checks) in config.file_checks() {
        let path = dir.join(file);
        for check in checks {
            let (passed, count) =
                check_pattern_in_file(&path, &check.pattern, check.min_occurrences)?;
            let status = if passed {
                format!("found {}x", count)
            } else {
                format!("only {}x (need {})", count, check.min_occurrences)
            };
            result.record(format!("{}: {}", file, check.description), passed, status);
        }
    }

    let result = result.finish();
    debug!(agent = %name, passed = result.passed, failed = result.failed, "Agent checked");
    Ok(result)
}

/// Check every agent that exists under `root`; missing ones are skipped
/// with a warning and returned by name.
pub fn run_agents(
    root: &Path,
    agents: &[String],
    config: &StructureConfig,
) -> EvalResult<(Vec<AgentResult>, Vec<String>)> {
    let mut results = Vec::new();
    let mut skipped = Vec::new();

    for agent in agents {
        let dir = root.join(agent);
        if dir.exists() {
            results.push(test_agent(agent, &dir, config)?);
        } else {
            warn!(agent = %agent, "Agent directory not found, skipping");
            skipped.push(agent.clone());
        }
    }

    Ok((results, skipped))
}

/// Directories up to two levels below `root` that contain an `AGENTS.md`,
/// as `/`-separated paths relative to `root`, sorted.
pub fn discover_agents(root: &Path) -> Vec<String> {
    let mut agents: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(2)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .filter(|entry| entry.path().join(AGENT_MARKER).is_file())
        .filter_map(|entry| {
            entry.path().strip_prefix(root).ok().map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
        })
        .collect();

    agents.sort();
    agents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PatternCheck;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    fn config() -> StructureConfig {
        StructureConfig {
            required_files: vec!["AGENTS.md".to_string(), "TOOLS.md".to_string()],
            recommended_files: vec!["memory".to_string()],
            agents_md_checks: vec![PatternCheck {
                pattern: "## Boundaries".to_string(),
                description: "Has boundaries section".to_string(),
                min_occurrences: 1,
            }],
            tools_md_checks: vec![PatternCheck {
                pattern: "script".to_string(),
                description: "Documents scripts".to_string(),
                min_occurrences: 2,
            }],
            agents: vec!["alpha".to_string(), "beta".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_score_rounding() {
        assert_relative_eq!(score(2, 3), 66.7);
        assert_relative_eq!(score(1, 8), 12.5);
        assert_relative_eq!(score(4, 4), 100.0);
        assert_relative_eq!(score(0, 0), 0.0);
    }

    #[test]
    fn test_complete_agent_passes() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("AGENTS.md"), "## Boundaries\n").unwrap();
        std::fs::write(dir.path().join("TOOLS.md"), "script one, Script two").unwrap();
        std::fs::create_dir(dir.path().join("memory")).unwrap();

        let result = test_agent("alpha", dir.path(), &config()).unwrap();
        assert_eq!(result.passed, 5);
        assert_eq!(result.failed, 0);
        assert_eq!(result.warnings, 0);
        assert_relative_eq!(result.score, 100.0);
        assert_eq!(result.details[3].status, "found 1x");
    }

    #[test]
    fn test_missing_files_fail_and_recommended_warn() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("AGENTS.md"), "no sections here").unwrap();

        let result = test_agent("beta", dir.path(), &config()).unwrap();

        // AGENTS.md exists; TOOLS.md, both patterns fail; memory only warns
        assert_eq!(result.passed, 1);
        assert_eq!(result.failed, 3);
        assert_eq!(result.warnings, 1);
        assert_eq!(result.total, 4);
        assert_relative_eq!(result.score, 25.0);

        let memory = &result.details[2];
        assert_eq!(memory.test, "Recommended: memory");
        assert!(memory.warning);
        assert_eq!(result.details[4].status, "only 0x (need 2)");
    }

    #[test]
    fn test_run_agents_skips_missing_directories() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir(root.path().join("alpha")).unwrap();

        let config = config();
        let (results, skipped) = run_agents(root.path(), &config.agents, &config).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].agent, "alpha");
        assert_eq!(skipped, vec!["beta"]);
    }

    #[test]
    fn test_discover_agents_two_levels_deep() {
        let root = TempDir::new().unwrap();
        for dir in ["factory", "agents/info-agent", "agents/nested/too-deep", "docs"] {
            std::fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        std::fs::write(root.path().join("factory/AGENTS.md"), "").unwrap();
        std::fs::write(root.path().join("agents/info-agent/AGENTS.md"), "").unwrap();
        std::fs::write(root.path().join("agents/nested/too-deep/AGENTS.md"), "").unwrap();

        assert_eq!(
            discover_agents(root.path()),
            vec!["agents/info-agent", "factory"]
        );
    }
}
