//! Handles all user-facing output for the CLI.
//!
//! Tree rendering in the requested format and the coloured `check` report live
//! here so every command prints the same way.

use std::io;
use std::path::PathBuf;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::cli::args::OutputFormat;
use crate::errors::TreeError;
use crate::tree::{render_dot, render_text, ParseTree};

/// Renders `tree` in the requested format.
pub fn render(tree: &ParseTree, format: OutputFormat) -> Result<String, TreeError> {
    match format {
        OutputFormat::Tree => Ok(render_text(tree)),
        OutputFormat::Dot => Ok(render_dot(tree)),
        OutputFormat::Json => match tree.describe() {
            Some(description) => Ok(format!("{}\n", description.to_json()?)),
            None => Ok("null\n".to_string()),
        },
    }
}

/// Result of replaying one script during `check`.
#[derive(Debug)]
pub struct CheckOutcome {
    pub path: PathBuf,
    pub result: Result<usize, TreeError>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Prints one PASS/FAIL line per script and a summary.
pub fn print_check_report(outcomes: &[CheckOutcome], color: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color);
    write_check_report(&mut stdout, outcomes)
}

pub fn write_check_report(out: &mut impl WriteColor, outcomes: &[CheckOutcome]) -> io::Result<()> {
    for outcome in outcomes {
        match &outcome.result {
            Ok(nodes) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
                write!(out, "PASS")?;
                out.reset()?;
                writeln!(out, " {} ({} nodes)", outcome.path.display(), nodes)?;
            }
            Err(error) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
                write!(out, "FAIL")?;
                out.reset()?;
                writeln!(out, " {}: {}", outcome.path.display(), error)?;
            }
        }
    }

    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    writeln!(
        out,
        "\n{} scripts, {} passed, {} failed",
        outcomes.len(),
        outcomes.len() - failed,
        failed
    )
}
