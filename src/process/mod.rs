/// Subprocess layer: command lines, the runner seam, and spawn errors.
pub mod command;
pub mod errors;
pub mod runner;

pub use command::CommandLine;
pub use errors::ProcessError;
pub use runner::{Captured, ProcessRunner, SystemRunner};
