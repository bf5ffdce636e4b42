/// CLI argument definitions via clap derive.
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::suite::options::DEFAULT_REQUIREMENTS;

/// run-tests — run preset test suites interactively or from the CLI.
#[derive(Debug, Parser)]
#[command(
    name = "run-tests",
    about = "Run preset test suites interactively or from the CLI",
    version
)]
pub struct Cli {
    /// Suite to run: all, unit, integration, retrieval, coverage, quick.
    /// Omit to pick from an interactive menu.
    #[arg(value_name = "SUITE")]
    pub suite: Option<String>,

    /// Extra positional arguments (ignored).
    #[arg(hide = true)]
    pub rest: Vec<String>,

    /// Output format.
    #[arg(long, value_name = "FORMAT", default_value = "human")]
    pub output: OutputFormat,

    /// Shorthand for --output json.
    #[arg(long, conflicts_with = "output")]
    pub json: bool,

    /// Omit table headers in --list output.
    #[arg(long)]
    pub no_header: bool,

    /// Print the available suites and exit.
    #[arg(long, conflicts_with = "suite")]
    pub list: bool,

    /// Resolve the suite and print its command without running anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Python interpreter used to run pytest and pip.
    #[arg(long, env = "RUN_TESTS_PYTHON", value_name = "PATH", default_value = "python3")]
    pub python: String,

    /// Project root to run from. Defaults to the parent of the directory
    /// holding this executable.
    #[arg(long, env = "RUN_TESTS_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Requirements manifest installed when pytest is missing.
    #[arg(
        long,
        env = "RUN_TESTS_REQUIREMENTS",
        value_name = "FILE",
        default_value = DEFAULT_REQUIREMENTS
    )]
    pub requirements: PathBuf,

    /// Do not probe for pytest before running.
    #[arg(long)]
    pub skip_tool_check: bool,

    /// Debug logging to stderr (overridden by RUST_LOG).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Banners and captured streams, as a person reads them.
    #[default]
    Human,
    /// A single JSON document on stdout; chatter moves to stderr.
    Json,
}
