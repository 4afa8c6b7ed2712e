//! Layers command implementation

use std::path::PathBuf;

use colored::Colorize;
use overlay_core::Mode;
use serde::Serialize;

use super::Project;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct LayerInfo {
    index: usize,
    name: String,
    root: PathBuf,
    exists: bool,
}

#[derive(Debug, Serialize)]
struct LayersOutput {
    layers: Vec<LayerInfo>,
    build_output: PathBuf,
    serve_output: PathBuf,
}

/// Print the layers in priority order and both outputs.
pub fn run_layers(project: &Project, json: bool) -> Result<()> {
    let build = project.layout(Mode::Build)?;
    let serve = project.layout(Mode::Serve)?;

    let output = LayersOutput {
        layers: build
            .layers()
            .iter()
            .enumerate()
            .map(|(index, layer)| LayerInfo {
                index,
                name: layer.name().to_string(),
                root: layer.root().to_path_buf(),
                exists: layer.root().is_dir(),
            })
            .collect(),
        build_output: build.output().to_path_buf(),
        serve_output: serve.output().to_path_buf(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} (highest priority first):", "Layers".bold());
    for layer in &output.layers {
        let status = if layer.exists {
            "ok".green()
        } else {
            "missing".red()
        };
        println!(
            "  {} {} {} ({})",
            layer.index.to_string().dimmed(),
            layer.name.cyan(),
            layer.root.display(),
            status
        );
    }
    println!();
    println!("{}: {}", "Build output".dimmed(), output.build_output.display());
    println!("{}: {}", "Serve output".dimmed(), output.serve_output.display());
    Ok(())
}
