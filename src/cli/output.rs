//! Shared output formatting utilities for CLI commands
//!
//! Renders run reports and step plans as text, JSON or YAML, and prints run
//! failures in one consistent shape.

use std::str::FromStr;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::errors::SmokeError;
use crate::scenario::{RunReport, Step};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => anyhow::bail!("Unsupported output format: '{}'. Use 'text', 'json', or 'yaml'.", s),
        }
    }
}

impl OutputFormat {
    /// Human-readable progress lines only make sense for text output
    pub fn echoes_progress(self) -> bool {
        self == OutputFormat::Text
    }
}

/// One row of the planned step sequence
#[derive(Debug, Clone, Serialize)]
pub struct PlannedStep {
    pub order: usize,
    pub step: Step,
    pub method: String,
    pub path: &'static str,
    pub expected_status: u16,
    pub auth: bool,
}

pub fn plan_rows(steps: &[Step]) -> Vec<PlannedStep> {
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| PlannedStep {
            order: index + 1,
            step: *step,
            method: step.method().to_string(),
            path: step.path_template(),
            expected_status: step.expected_status().as_u16(),
            auth: step.requires_auth(),
        })
        .collect()
}

/// Print data in the specified format (json or yaml)
pub fn print_output<T: Serialize>(data: &T, format: &str) -> Result<()> {
    match format.parse::<OutputFormat>()? {
        OutputFormat::Json => print_json(data),
        OutputFormat::Yaml => print_yaml(data),
        OutputFormat::Text => {
            anyhow::bail!("Text format requires custom implementation per data type")
        }
    }
}

/// Print data as JSON
pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

/// Print data as YAML
pub fn print_yaml<T: Serialize>(data: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(data).context("Failed to serialize to YAML")?;
    println!("{}", yaml);
    Ok(())
}

pub fn print_report(report: &RunReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Yaml => print_yaml(report),
        OutputFormat::Text => {
            println!("\n{}", "All E2E API tests passed successfully!".green().bold());
            print_outcomes_table(report);
            Ok(())
        }
    }
}

pub fn print_plan(steps: &[Step], format: OutputFormat) -> Result<()> {
    let rows = plan_rows(steps);
    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Yaml => print_yaml(&rows),
        OutputFormat::Text => {
            print_table_header(&[
                ("#", 3),
                ("Step", 26),
                ("Method", 7),
                ("Path", 44),
                ("Expect", 6),
                ("Auth", 4),
            ]);
            for row in &rows {
                println!(
                    "{:<3} {:<26} {:<7} {:<44} {:<6} {}",
                    row.order,
                    row.step.label(),
                    row.method,
                    row.path,
                    row.expected_status,
                    if row.auth { "yes" } else { "no" }
                );
            }
            println!();
            Ok(())
        }
    }
}

fn print_outcomes_table(report: &RunReport) {
    print_table_header(&[("Step", 26), ("Method", 7), ("Status", 6), ("Time (ms)", 10)]);
    for outcome in &report.steps {
        println!(
            "{:<26} {:<7} {:<6} {:<10}",
            outcome.step.label(),
            outcome.method,
            outcome.status,
            outcome.elapsed_ms
        );
    }
    println!();
    println!(
        "{} steps passed in {} ms as {} (community {}, channel {})",
        report.passed_steps(),
        report.elapsed_ms,
        report.username,
        truncate(&report.community_id, 36),
        truncate(&report.channel_id, 36)
    );
}

/// Print a run failure. Step failures get `FAIL:`, everything else `ERROR:`.
pub fn print_failure(err: &anyhow::Error) {
    eprintln!("{}", format_failure(err));
}

fn format_failure(err: &anyhow::Error) -> String {
    match err.downcast_ref::<SmokeError>() {
        Some(failure) if failure.step().is_some() => {
            let mut text = format!("{} {:#}", "FAIL:".red().bold(), err);
            if let Some(body) = failure.error_body() {
                text.push_str(&format!("\n  Backend error: {}", body));
            }
            text
        }
        _ => format!("\n{} Tests failed with unexpected error: {:#}", "ERROR:".red().bold(), err),
    }
}

/// Truncate string to maximum length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print a horizontal separator line
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Print a table header
pub fn print_table_header(columns: &[(&str, usize)]) {
    println!();
    let mut header = String::new();
    for (name, width) in columns {
        header.push_str(&format!("{:<width$} ", name, width = width));
    }
    println!("{}", header.trim());

    let total_width: usize = columns.iter().map(|(_, w)| w + 1).sum();
    print_separator(total_width.saturating_sub(1));
}
