use crate::dcf::{
    DcfAssumptions, DEFAULT_GROWTH_RATE, DEFAULT_PROJECTION_YEARS, DEFAULT_TERMINAL_GROWTH,
    DEFAULT_WACC, MAX_GROWTH_RATE,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "stock-research.toml";
pub const CONFIG_ENV_VAR: &str = "STOCK_RESEARCH_CONFIG";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
pub const DEFAULT_SEC_USER_AGENT: &str = "StockResearchAgent/1.0 (research@example.com)";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchConfig {
    #[serde(default)]
    pub http: HttpSettings,

    #[serde(default)]
    pub dcf: DcfSettings,

    #[serde(default)]
    pub reports: ReportSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// SEC asks automated clients to identify themselves with a contact
    #[serde(default = "default_sec_user_agent")]
    pub sec_user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_sec_user_agent() -> String {
    DEFAULT_SEC_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            sec_user_agent: default_sec_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DcfSettings {
    #[serde(default = "default_wacc")]
    pub wacc: f64,

    #[serde(default = "default_terminal_growth")]
    pub terminal_growth: f64,

    #[serde(default = "default_projection_years")]
    pub projection_years: usize,

    #[serde(default = "default_max_growth_rate")]
    pub max_growth_rate: f64,

    #[serde(default = "default_growth_rate")]
    pub default_growth_rate: f64,
}

fn default_wacc() -> f64 {
    DEFAULT_WACC
}

fn default_terminal_growth() -> f64 {
    DEFAULT_TERMINAL_GROWTH
}

fn default_projection_years() -> usize {
    DEFAULT_PROJECTION_YEARS
}

fn default_max_growth_rate() -> f64 {
    MAX_GROWTH_RATE
}

fn default_growth_rate() -> f64 {
    DEFAULT_GROWTH_RATE
}

impl Default for DcfSettings {
    fn default() -> Self {
        Self {
            wacc: default_wacc(),
            terminal_growth: default_terminal_growth(),
            projection_years: default_projection_years(),
            max_growth_rate: default_max_growth_rate(),
            default_growth_rate: default_growth_rate(),
        }
    }
}

impl DcfSettings {
    /// Assumptions for a ticker valuation, with optional per-call overrides
    pub fn assumptions(
        &self,
        wacc: Option<f64>,
        terminal_growth: Option<f64>,
        growth_rate: Option<f64>,
    ) -> DcfAssumptions {
        DcfAssumptions {
            wacc: wacc.unwrap_or(self.wacc),
            terminal_growth: terminal_growth.unwrap_or(self.terminal_growth),
            projection_years: self.projection_years,
            growth_rate,
            max_growth_rate: self.max_growth_rate,
            default_growth_rate: self.default_growth_rate,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl ResearchConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::info!(
                path = %config_path.display(),
                "Configuration file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read configuration file {}", config_path.display()))?;
        let config = toml::from_str(&content).context("Failed to parse configuration file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ResearchConfig::load(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.http.sec_user_agent, DEFAULT_SEC_USER_AGENT);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.dcf.projection_years, 5);
        assert!(config.reports.output_dir.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stock-research.toml");
        std::fs::write(
            &path,
            "[dcf]\nwacc = 0.1\n\n[reports]\noutput_dir = \"out\"\n",
        )
        .unwrap();

        let config = ResearchConfig::load(&path).unwrap();
        assert_eq!(config.dcf.wacc, 0.1);
        assert_eq!(config.dcf.terminal_growth, DEFAULT_TERMINAL_GROWTH);
        assert_eq!(config.http.max_retries, 3);
        assert_eq!(config.reports.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[dcf\nwacc = ").unwrap();

        let err = ResearchConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse configuration file"));
    }

    #[test]
    fn test_assumption_overrides() {
        let settings = DcfSettings::default();
        let assumptions = settings.assumptions(Some(0.11), None, Some(0.07));

        assert_eq!(assumptions.wacc, 0.11);
        assert_eq!(assumptions.terminal_growth, DEFAULT_TERMINAL_GROWTH);
        assert_eq!(assumptions.growth_rate, Some(0.07));
    }
}
