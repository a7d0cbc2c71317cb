//! The lrtree Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::path::Path;
use std::{fs, process};

use clap::Parser;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::cli::args::{Command, LrtreeArgs, OutputFormat};
use crate::cli::output::{print_check_report, render, CheckOutcome};
use crate::errors::{print_error, TreeError};
use crate::logging;
use crate::script::{Script, SCRIPT_EXTENSIONS};
use crate::tree::{IdGenerator, ParseSession, TreeDescription};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = LrtreeArgs::parse();
    if let Err(e) = logging::init(args.log_level.as_deref()) {
        eprintln!("warning: logging disabled: {e}");
    }

    // Dispatch to the appropriate subcommand handler.
    let result = match args.command {
        Command::Build {
            file,
            format,
            file_name,
        } => handle_build(&file, format, file_name),
        Command::Rebuild {
            file,
            format,
            file_name,
        } => handle_rebuild(&file, format, file_name),
        Command::Check { path } => handle_check(&path, args.color.into()),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            print_error(e);
            process::exit(1);
        }
    }
}

/// Handles the `build` subcommand.
fn handle_build(
    path: &Path,
    format: OutputFormat,
    file_name: Option<String>,
) -> Result<bool, TreeError> {
    let script = Script::load(path)?;
    let file_name = file_name.unwrap_or_else(|| script.file_name().to_string());
    let tree = script.run(ParseSession::with_ids(file_name, IdGenerator::process_wide()))?;
    info!(nodes = tree.len(), "built tree from {}", path.display());
    print!("{}", render(&tree, format)?);
    Ok(true)
}

/// Handles the `rebuild` subcommand.
fn handle_rebuild(
    path: &Path,
    format: OutputFormat,
    file_name: Option<String>,
) -> Result<bool, TreeError> {
    let text = fs::read_to_string(path)?;
    let description = TreeDescription::from_json(&text)?;
    let file_name = file_name.unwrap_or_else(|| path.display().to_string());
    let tree = description.rebuild(&ParseSession::with_ids(file_name, IdGenerator::process_wide()))?;
    print!("{}", render(&tree, format)?);
    Ok(true)
}

/// Handles the `check` subcommand. Returns `false` if any script failed.
fn handle_check(root: &Path, color: termcolor::ColorChoice) -> Result<bool, TreeError> {
    let mut outcomes = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_script(entry.path()) {
            continue;
        }

        let path = entry.path();
        let result = Script::load(path).and_then(|script| {
            let session = ParseSession::with_ids(script.file_name(), IdGenerator::process_wide());
            script.run(session).map(|tree| tree.len())
        });
        outcomes.push(CheckOutcome {
            path: path.to_path_buf(),
            result,
        });
    }

    print_check_report(&outcomes, color)?;
    Ok(outcomes.iter().all(CheckOutcome::passed))
}

fn is_script(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SCRIPT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}
