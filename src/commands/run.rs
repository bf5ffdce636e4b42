/// Default command: check the tool, pick a suite, run it.
use std::io::{self, Write};
use std::path::Path;

use tracing::warn;

use crate::cli::output::write_title;
use crate::cli::{Cli, OutputCtx};
use crate::dispatcher::{Dispatcher, Settings};
use crate::process::SystemRunner;
use crate::suite::RunError;

/// Run `run-tests [SUITE]` from `cwd`.
///
/// # Errors
///
/// Propagates every `RunError` from the dispatcher.
pub fn run(cli: &Cli, ctx: &OutputCtx, cwd: &Path) -> Result<(), RunError> {
    if !cli.rest.is_empty() {
        warn!(ignored = ?cli.rest, "extra arguments ignored");
    }

    let settings = Settings {
        python: cli.python.clone(),
        requirements: cli.requirements.clone(),
        skip_tool_check: cli.skip_tool_check,
        dry_run: cli.dry_run,
    };
    let dispatcher = Dispatcher::new(SystemRunner, settings, *ctx);

    let mut input = io::stdin().lock();
    let mut out = io::stdout();
    let mut console: Box<dyn Write> = if ctx.is_json() {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };

    write_title(&mut console, cwd)?;
    dispatcher.run(cli.suite.as_deref(), &mut input, &mut out, &mut console)
}
