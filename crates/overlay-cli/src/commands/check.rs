//! Check command implementation

use colored::Colorize;
use overlay_core::{CheckStatus, DriftItem, Mode};

use super::Project;
use crate::error::{CliError, Result};

/// Compare the output for `mode` against its layers.
///
/// Fails when the output is not healthy, after printing the report.
pub fn run_check(project: &Project, mode: Mode, json: bool) -> Result<()> {
    let layout = project.layout(mode)?;
    let report = layout.check()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} Checking {} output {}",
            "=>".blue().bold(),
            mode,
            layout.output().display()
        );
        match report.status {
            CheckStatus::Healthy => {
                println!(
                    "{} Output is healthy. {} path(s) checked.",
                    "OK".green().bold(),
                    report.checked
                );
            }
            CheckStatus::Missing => {
                println!("{} Some files are missing:", "MISSING".yellow().bold());
                print_items("-".yellow(), &report.missing);
            }
            CheckStatus::Drifted => {
                println!("{} Output has drifted:", "DRIFTED".red().bold());
                print_items("!".red(), &report.drifted);
                print_items("+".red(), &report.extra);
                if !report.missing.is_empty() {
                    println!();
                    println!("{} Also missing:", "MISSING".yellow().bold());
                    print_items("-".yellow(), &report.missing);
                }
            }
        }
        if !report.is_healthy() {
            println!();
            let command = match mode {
                Mode::Build => "overlay build",
                Mode::Serve => "overlay serve",
            };
            println!("Run {} to rebuild.", command.cyan());
        }
    }

    if report.is_healthy() {
        Ok(())
    } else {
        Err(CliError::user(format!("{mode} output is out of date")))
    }
}

fn print_items(marker: colored::ColoredString, items: &[DriftItem]) {
    for item in items {
        let layer = item.layer.as_deref().unwrap_or("-");
        println!(
            "   {} {} ({}): {}",
            marker,
            item.path.cyan(),
            layer.dimmed(),
            item.description
        );
    }
}
