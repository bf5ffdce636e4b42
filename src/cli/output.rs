/// Output formatting: run banners, captured streams, option tables, JSON.
///
/// Writers take `&mut impl Write` so the dispatcher can be driven against
/// in-memory buffers.
use std::io::{self, Write};

use comfy_table::{Table, presets::UTF8_BORDERS_ONLY};
use serde::Serialize;

use super::args::OutputFormat;
use crate::process::{Captured, CommandLine, ProcessError};
use crate::suite::{OptionTable, options::token_alternatives};
use crate::types::{ErrorOutput, OptionOutput};

/// Title printed at startup.
pub const TITLE: &str = "RAG Application Test Runner";

const RULE_WIDTH: usize = 60;

/// Resolve the effective output format, handling the `--json` flag.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag { OutputFormat::Json } else { fmt }
}

/// Output context passed to all formatters.
#[derive(Debug, Clone, Copy)]
pub struct OutputCtx {
    pub format: OutputFormat,
    pub no_header: bool,
}

impl OutputCtx {
    /// Construct from CLI args.
    #[must_use]
    pub fn new(fmt: OutputFormat, json_flag: bool, no_header: bool) -> Self {
        Self {
            format: resolve_format(fmt, json_flag),
            no_header,
        }
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

/// The usage line printed for an unknown suite.
#[must_use]
pub fn usage_line() -> String {
    format!("Usage: run-tests [{}]", token_alternatives())
}

// --- Startup and menu ---

/// Title and working directory.
pub fn write_title(out: &mut impl Write, cwd: &std::path::Path) -> io::Result<()> {
    writeln!(out, "{TITLE}")?;
    writeln!(out, "Working directory: {}", cwd.display())
}

/// The option list followed by the selection prompt (no trailing newline).
pub fn write_menu(out: &mut impl Write, table: &OptionTable) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Available test options:")?;
    for option in table.iter() {
        writeln!(out, "  {}. {}", option.key, option.description)?;
    }
    write!(
        out,
        "\nSelect test option ({}) or 'q' to quit: ",
        table.key_range()
    )?;
    out.flush()
}

// --- Run reporting ---

/// Banner printed before a command is spawned.
pub fn write_run_header(
    out: &mut impl Write,
    description: &str,
    command: &CommandLine,
) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "Running: {description}")?;
    writeln!(out, "Command: {command}")?;
    writeln!(out, "{rule}")?;
    out.flush()
}

/// Captured streams (non-empty ones only) and the pass/fail line.
pub fn write_outcome(
    out: &mut impl Write,
    outcome: &Result<Captured, ProcessError>,
) -> io::Result<()> {
    let captured = match outcome {
        Ok(c) => c,
        Err(err) => return writeln!(out, "❌ {err}"),
    };

    if !captured.stdout.is_empty() {
        writeln!(out, "STDOUT:")?;
        writeln!(out, "{}", captured.stdout)?;
    }
    if !captured.stderr.is_empty() {
        writeln!(out, "STDERR:")?;
        writeln!(out, "{}", captured.stderr)?;
    }

    match captured.code {
        Some(0) => writeln!(out, "✅ Success!"),
        Some(code) => writeln!(out, "❌ Failed with return code: {code}"),
        None => writeln!(out, "❌ Terminated without a return code"),
    }
}

// --- Option listing ---

/// Write the option table (`--list`, or the resolved option on `--dry-run`).
pub fn write_options(
    out: &mut impl Write,
    options: &[OptionOutput],
    ctx: &OutputCtx,
) -> io::Result<()> {
    match ctx.format {
        OutputFormat::Json => write_json(out, options),
        OutputFormat::Human => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            if !ctx.no_header {
                table.set_header(["KEY", "SUITE", "DESCRIPTION", "COMMAND"]);
            }
            for option in options {
                table.add_row([
                    option.key.as_str(),
                    option.token.as_str(),
                    option.description.as_str(),
                    option.command.as_str(),
                ]);
            }
            writeln!(out, "{table}")
        }
    }
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &ErrorOutput, format: OutputFormat) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match format {
        OutputFormat::Json => {
            let s = serde_json::to_string_pretty(err).unwrap_or_default();
            let _ = writeln!(out, "{s}");
        }
        OutputFormat::Human => {
            let _ = writeln!(out, "Error: {}", err.error.message);
            if let Some(candidates) = &err.error.candidates {
                for c in candidates {
                    let _ = writeln!(out, "  Did you mean '{c}'?");
                }
            }
        }
    }
}

// --- Generic JSON helper ---

/// Pretty-printed JSON followed by a newline.
pub fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}
