//! Defines the command-line arguments and subcommands for the lrtree CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "lrtree",
    version,
    about = "Build concrete parse trees from recorded LR parser decisions."
)]
pub struct LrtreeArgs {
    /// Log filter directives, e.g. `debug` or `lrtree=trace`.
    #[arg(long, global = true, env = "LRTREE_LOG")]
    pub log_level: Option<String>,

    /// When to colour terminal output.
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay a trace script and print the resulting tree.
    Build {
        /// Trace script (.trace, .json, .yaml or .yml).
        #[arg(required = true)]
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,
        /// File name recorded in the tree, overriding the script's `file`.
        #[arg(long)]
        file_name: Option<String>,
    },
    /// Rebuild a tree from a JSON structural description.
    Rebuild {
        /// JSON description, as written by `build --format json`.
        #[arg(required = true)]
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,
        /// File name recorded in the tree; defaults to the description's path.
        #[arg(long)]
        file_name: Option<String>,
    },
    /// Replay every trace script under a directory and report which succeed.
    Check {
        /// Directory to search recursively.
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented outline.
    Tree,
    /// Structural description as JSON.
    Json,
    /// Graphviz digraph.
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl From<ColorMode> for termcolor::ColorChoice {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Auto => termcolor::ColorChoice::Auto,
            ColorMode::Always => termcolor::ColorChoice::Always,
            ColorMode::Never => termcolor::ColorChoice::Never,
        }
    }
}
