// Structure checks for agent workspaces
//
// A YAML rule set lists required and recommended files plus regex checks
// for AGENTS.md, TOOLS.md, IDENTITY.md and SOUL.md. Scores can be saved as
// a baseline and later compared, which is what the pre-push gate uses.

pub mod baseline;
pub mod checks;
pub mod config;
pub mod error;
pub mod report;
pub mod runner;

pub use baseline::{Baseline, BaselineEntry, Comparison};
pub use checks::{check_file_exists, check_pattern_in_file};
pub use config::{PatternCheck, StructureConfig};
pub use error::{EvalError, EvalResult};
pub use report::{render, AgentStatus, Summary};
pub use runner::{discover_agents, run_agents, score, test_agent, AgentResult, CheckDetail};
