//! End-to-end tests for the stock-research binary. Only offline paths are
//! exercised: manual DCF, argument validation and help output.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stock-research").unwrap();
    cmd.env("STOCK_RESEARCH_CONFIG", dir.path().join("absent.toml"))
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dcf"))
        .stdout(predicate::str::contains("filings"))
        .stdout(predicate::str::contains("analyze"));
}

#[test]
fn test_manual_dcf_markdown() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["dcf", "--fcf", "100", "--growth", "0.05", "--shares", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# DCF Valuation: MANUAL"))
        .stdout(predicate::str::contains("**$175.56**"))
        .stdout(predicate::str::contains("## Sensitivity Analysis"))
        .stdout(predicate::str::contains("vs Current Price").not());
}

#[test]
fn test_manual_dcf_json() {
    let dir = TempDir::new().unwrap();
    let output = cmd(&dir)
        .args([
            "-o", "json", "dcf", "--fcf", "100", "--growth", "0.05", "--shares", "10", "--years", "3",
            "--wacc", "0.09", "--terminal", "0.025",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["inputs"]["ticker"], "MANUAL");
    assert_eq!(value["inputs"]["growth_rates"].as_array().unwrap().len(), 3);
    assert!(value["current_price"].is_null());
    let sensitivity = value["sensitivity"].as_object().unwrap();
    assert_eq!(sensitivity.len(), 3);
    assert!(sensitivity.contains_key("8.0%"));
    assert!(value["sensitivity"]["9.0%"]["2.5%"].as_f64().unwrap() > 0.0);
    assert!(value["sensitivity"]["10.0%"]["3.0%"].is_number());
    assert!(value["results"]["intrinsic_value_per_share"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_manual_dcf_requires_inputs() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["dcf", "--fcf", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Either --ticker OR (--fcf, --growth, --shares) required"));
}

#[test]
fn test_dcf_rejects_wacc_below_terminal_growth() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args([
            "dcf", "--fcf", "100", "--growth", "0.05", "--shares", "10", "--wacc", "0.02",
            "--terminal", "0.03",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("WACC"));
}

#[test]
fn test_out_file_receives_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reports").join("manual.md");

    cmd(&dir)
        .args(["dcf", "--fcf", "100", "--growth", "0.05", "--shares", "10", "--out-file"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Report saved to:"));

    let report = std::fs::read_to_string(&path).unwrap();
    assert!(report.starts_with("# DCF Valuation: MANUAL"));
}

#[test]
fn test_compare_needs_two_tickers() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["compare", "GOLF"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Need at least 2 tickers to compare"));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[dcf\nwacc = ").unwrap();

    cmd(&dir)
        .args(["-c"])
        .arg(&path)
        .args(["dcf", "--fcf", "100", "--growth", "0.05", "--shares", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse configuration file"));
}
