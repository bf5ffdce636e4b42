/// The subprocess seam: a trait for running a command to completion with
/// captured output, and the `std::process` implementation.
use std::process::Command;
use std::time::{Duration, Instant};

use tracing::debug;

use super::{command::CommandLine, errors::ProcessError};

/// Output of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    /// Exit code, or `None` if the child was terminated by a signal.
    pub code: Option<i32>,
    /// Standard output, lossily decoded as UTF-8.
    pub stdout: String,
    /// Standard error, lossily decoded as UTF-8.
    pub stderr: String,
    /// Wall-clock time from spawn to exit.
    pub elapsed: Duration,
}

impl Captured {
    /// True iff the child exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a command to completion, blocking, with stdout/stderr captured.
pub trait ProcessRunner {
    /// Spawn `cmd` in the current working directory and wait for it.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::Spawn` if the program could not be started.
    fn run(&self, cmd: &CommandLine) -> Result<Captured, ProcessError>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, cmd: &CommandLine) -> Result<Captured, ProcessError> {
        (**self).run(cmd)
    }
}

/// Runner backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, cmd: &CommandLine) -> Result<Captured, ProcessError> {
        debug!(command = %cmd, "spawning child process");
        let start = Instant::now();
        let output = Command::new(&cmd.program)
            .args(&cmd.args)
            .output()
            .map_err(|source| ProcessError::Spawn {
                program: cmd.program.clone(),
                source,
            })?;
        let elapsed = start.elapsed();

        let captured = Captured {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed,
        };
        debug!(
            command = %cmd,
            code = ?captured.code,
            elapsed_ms = elapsed.as_millis(),
            "child process exited"
        );
        Ok(captured)
    }
}
