//! Output formatting utilities.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::cli::OutputFormat;

/// Where rendered reports go.
#[derive(Debug, Clone)]
pub struct Output {
    pub format: OutputFormat,
    pub out_file: Option<std::path::PathBuf>,
}

impl Output {
    /// Markdown from `markdown`, or `data` as pretty JSON.
    pub fn render<T: Serialize>(&self, data: &T, markdown: impl FnOnce() -> String) -> Result<()> {
        let text = match self.format {
            OutputFormat::Markdown => markdown(),
            OutputFormat::Json => to_json(data)?,
        };
        self.emit(&text)
    }

    /// Print `text` or write it to the output file.
    pub fn emit(&self, text: &str) -> Result<()> {
        match &self.out_file {
            Some(path) => {
                write_file(path, text)?;
                print_success(&format!("Report saved to: {}", path.display()));
            }
            None => println!("{}", text),
        }
        Ok(())
    }
}

pub fn to_json<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).context("Failed to serialize output")
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

/// Prints a success message.
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message);
}

/// Prints an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Prints a progress message.
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message);
}
