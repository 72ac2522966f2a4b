// Agent structure test runner

use agent_evals::config::{DEFAULT_CONFIG_PATH, DEFAULT_RESULTS_DIR};
use agent_evals::{discover_agents, render, run_agents, Baseline, StructureConfig, Summary};
use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

/// Check agent workspaces against the knowledge base standards
#[derive(Parser, Debug)]
#[command(name = "agent-evals", version, about)]
struct Args {
    /// Save current scores as the baseline
    #[arg(long)]
    save_baseline: bool,

    /// Compare against the baseline and show deltas
    #[arg(long)]
    compare: bool,

    /// Exit 1 if any agent score decreased against the baseline
    #[arg(long)]
    gate: bool,

    /// Show every check
    #[arg(short, long)]
    verbose: bool,

    /// Project root containing the agent directories
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Rule file (defaults to knowledge/evals/tests/structure.yaml under the root)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Baseline directory (defaults to knowledge/evals/results under the root)
    #[arg(long)]
    results_dir: Option<PathBuf>,

    /// Test every directory up to two levels deep that has an AGENTS.md
    #[arg(long)]
    discover: bool,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| args.root.join(DEFAULT_CONFIG_PATH));
    let results_dir = args
        .results_dir
        .clone()
        .unwrap_or_else(|| args.root.join(DEFAULT_RESULTS_DIR));

    println!("\nRunning tests from: {}", args.root.display());
    println!("Time: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    let config = StructureConfig::load(&config_path)
        .with_context(|| format!("Failed to load rules from {}", config_path.display()))?;

    let agents = if args.discover {
        discover_agents(&args.root)
    } else {
        config.agents.clone()
    };

    let (results, skipped) = run_agents(&args.root, &agents, &config)?;
    for agent in &skipped {
        println!("{}", format!("Warning: {} not found, skipping", agent).yellow());
    }

    if args.save_baseline {
        let baseline = Baseline::from_results(&results, Utc::now());
        let path = baseline
            .save(&results_dir)
            .context("Failed to save baseline")?;
        println!("\n{}", format!("Baseline saved to: {}", path.display()).green());
        println!("Overall score: {}%", baseline.overall_score);
        println!("Timestamp: {}", baseline.timestamp.to_rfc3339());
        return Ok(ExitCode::SUCCESS);
    }

    let baseline = if args.compare || args.gate {
        let baseline = Baseline::load(&results_dir).context("Failed to load baseline")?;
        if baseline.is_none() {
            println!(
                "{}",
                "No baseline found. Run with --save-baseline first.".yellow()
            );
            if args.gate {
                return Ok(ExitCode::FAILURE);
            }
        }
        baseline
    } else {
        None
    };

    let summary = Summary::new(&results, baseline.as_ref());
    println!("{}\n", render(&results, &summary, baseline.as_ref(), args.verbose));

    if args.gate {
        let regressions = &summary.comparison.regressions;
        if regressions.is_empty() {
            println!("{}\n", "GATE PASSED: No regressions. Safe to push.".green());
            return Ok(ExitCode::SUCCESS);
        }
        println!(
            "{}",
            format!("GATE FAILED: Regressions detected in {}", regressions.join(", ")).red()
        );
        println!("{}\n", "Push blocked. Fix regressions before pushing.".red());
        return Ok(ExitCode::FAILURE);
    }

    Ok(if summary.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
