//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use overlay_core::{CONFIG_FILE, Mode};

/// Overlay - merge prioritized layer directories into one tree
#[derive(Parser, Debug)]
#[command(name = "overlay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root
    #[arg(short = 'C', long, global = true, env = "OVERLAY_ROOT")]
    pub root: Option<PathBuf>,

    /// Config file, relative to the project root
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Which output a command works on
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeArg {
    /// The build output under the dist directory
    #[default]
    Build,
    /// The live output under the public directory
    Serve,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Build => Mode::Build,
            ModeArg::Serve => Mode::Serve,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Write a config file and create the layer directories
    ///
    /// Examples:
    ///   overlay init brand base     # brand overrides base
    Init {
        /// Layer names, highest priority first
        #[arg(required = true)]
        layers: Vec<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Merge every layer into the build output
    Build {
        /// Output the merge report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge into the serve output, then keep it in sync until interrupted
    Serve,

    /// Compare an output against the layers
    Check {
        /// Output to check
        #[arg(short, long, value_enum, default_value_t)]
        mode: ModeArg,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved layers and outputs
    Layers {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
