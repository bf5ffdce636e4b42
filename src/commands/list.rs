/// `--list`: print the available suites without running anything.
use std::io;

use crate::cli::output::write_options;
use crate::cli::{Cli, OutputCtx};
use crate::suite::{OptionTable, RunError};
use crate::types::OptionOutput;

/// Run `run-tests --list`.
///
/// # Errors
///
/// Returns `RunError::Io` if stdout cannot be written.
pub fn run(cli: &Cli, ctx: &OutputCtx) -> Result<(), RunError> {
    let table = OptionTable::new(&cli.python);
    let options: Vec<OptionOutput> = table.iter().map(OptionOutput::from).collect();
    write_options(&mut io::stdout().lock(), &options, ctx)?;
    Ok(())
}
