// Rule set for agent workspace checks, loaded from YAML

use crate::error::EvalResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rule file location relative to the project root
pub const DEFAULT_CONFIG_PATH: &str = "knowledge/evals/tests/structure.yaml";

/// Baseline directory relative to the project root
pub const DEFAULT_RESULTS_DIR: &str = "knowledge/evals/results";

pub const DEFAULT_AGENTS: [&str; 4] = ["factory", "agent-reviewer", "info-agent", "brand-agent"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureConfig {
    #[serde(default)]
    pub required_files: Vec<String>,

    /// Missing recommended files only produce warnings
    #[serde(default)]
    pub recommended_files: Vec<String>,

    #[serde(default)]
    pub agents_md_checks: Vec<PatternCheck>,

    #[serde(default)]
    pub tools_md_checks: Vec<PatternCheck>,

    #[serde(default)]
    pub identity_md_checks: Vec<PatternCheck>,

    #[serde(default)]
    pub soul_md_checks: Vec<PatternCheck>,

    #[serde(default = "default_agents")]
    pub agents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternCheck {
    /// Case-insensitive regular expression
    pub pattern: String,
    pub description: String,
    #[serde(default = "default_min_occurrences")]
    pub min_occurrences: usize,
}

fn default_agents() -> Vec<String> {
    DEFAULT_AGENTS.iter().map(|a| a.to_string()).collect()
}

fn default_min_occurrences() -> usize {
    1
}

impl StructureConfig {
    pub fn load(path: &Path) -> EvalResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> EvalResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Pattern checks paired with the file they run against
    pub fn file_checks(&self) -> [(&'static str, &[PatternCheck]); 4] {
        [
            ("AGENTS.md", self.agents_md_checks.as_slice()),
            ("TOOLS.md", self.tools_md_checks.as_slice()),
            ("IDENTITY.md", self.identity_md_checks.as_slice()),
            ("SOUL.md", self.soul_md_checks.as_slice()),
        ]
    }
}
