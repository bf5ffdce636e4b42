#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::doc_markdown
)]
//! run-tests — run preset test suites interactively or from the CLI.

mod cli;
mod commands;
mod dispatcher;
mod logging;
mod process;
mod suite;
mod types;
mod workspace;

use clap::Parser;
use clap::error::ErrorKind;

use cli::output::usage_line;
use cli::{Cli, OutputCtx, write_error};
use types::ErrorOutput;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            println!("{}", usage_line());
            std::process::exit(1);
        }
    };

    let ctx = OutputCtx::new(cli.output, cli.json, cli.no_header);

    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let cwd = match workspace::enter_project_root(cli.root.as_deref()) {
        Ok(cwd) => cwd,
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(1);
        }
    };

    match commands::dispatch(&cli, &ctx, &cwd) {
        Ok(()) => {}
        Err(err) => {
            let error_output = ErrorOutput::from_run_error(&err);
            write_error(&error_output, ctx.format);
            std::process::exit(err.exit_code());
        }
    }
}
