//! Init command implementation

use colored::Colorize;
use overlay_core::{MergeConfig, ProjectConfig};

use super::Project;
use crate::error::{CliError, Result};

/// Write a config listing `layers` and create each layer directory.
pub fn run_init(project: &Project, layers: &[String], force: bool) -> Result<()> {
    if project.config.exists() && !force {
        return Err(CliError::user(format!(
            "{} already exists (use --force to overwrite)",
            project.config.display()
        )));
    }

    let config = ProjectConfig::new(MergeConfig::with_layers(layers.iter().cloned()));
    config.validate()?;
    config.save(&project.config)?;

    let public = project.root.join(&config.merge.public_dir);
    for name in &config.merge.layers {
        std::fs::create_dir_all(public.join(name))?;
    }

    println!(
        "{} Wrote {} with {} layer(s)",
        "OK".green().bold(),
        project.config.display(),
        layers.len()
    );
    for (index, name) in layers.iter().enumerate() {
        println!("   {} {}", index.to_string().dimmed(), name.cyan());
    }
    Ok(())
}
