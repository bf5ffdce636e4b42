/// Test suite domain layer: the option table, selection resolution, errors.
pub mod errors;
pub mod options;
pub mod selection;
pub mod suggest;

pub use errors::{RunError, SelectionMode};
pub use options::{OptionTable, TestOption};
pub use selection::{Resolved, Selection, resolve_selection};
