//! Build command implementation

use colored::Colorize;
use overlay_core::Mode;

use super::Project;
use crate::error::Result;

/// Merge every layer into the build output.
pub fn run_build(project: &Project, json: bool) -> Result<()> {
    let layout = project.layout(Mode::Build)?;
    let report = layout.merge()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} Merged {} layer(s) into {}",
        "OK".green().bold(),
        report.layers,
        layout.output().display().to_string().cyan()
    );
    println!(
        "   {} copies, {} overridden by a higher layer",
        report.files_copied, report.files_overwritten
    );
    Ok(())
}
