/// Errors from the subprocess layer.
use thiserror::Error;

/// Typed errors from spawning child processes.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started (not found, not executable, ...).
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        /// The program that was being launched.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
}
