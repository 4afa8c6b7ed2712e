//! Serve command implementation

use colored::Colorize;
use overlay_core::Mode;

use super::Project;
use crate::error::Result;

/// Merge into the serve output, then reconcile changes until the watcher
/// stops or the process is interrupted.
pub fn run_serve(project: &Project) -> Result<()> {
    let layout = project.layout(Mode::Serve)?;

    println!(
        "{} Serving {} (Ctrl-C to stop)",
        "=>".blue().bold(),
        layout.output().display().to_string().cyan()
    );
    let stats = overlay_watch::serve(&layout)?;

    println!(
        "{} Stopped after {} event(s), {} failed",
        "OK".green().bold(),
        stats.events,
        stats.failed
    );
    Ok(())
}
