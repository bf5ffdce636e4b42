/// Command dispatch: routes parsed arguments to their implementations.
pub mod list;
pub mod run;

use std::path::Path;

use crate::cli::{Cli, OutputCtx};
use crate::suite::RunError;

/// Dispatch parsed arguments to a handler.
///
/// # Errors
///
/// Returns `RunError` on any command failure.
pub fn dispatch(cli: &Cli, ctx: &OutputCtx, cwd: &Path) -> Result<(), RunError> {
    if cli.list {
        list::run(cli, ctx)
    } else {
        run::run(cli, ctx, cwd)
    }
}
