/// Selection resolution: map a menu choice or CLI token to a `TestOption`.
use super::{
    errors::{RunError, SelectionMode},
    options::{OptionTable, TestOption},
    suggest::suggest,
};

/// Menu input that ends the run without executing anything.
pub const QUIT: &str = "q";

/// Raw selection input and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A line typed at the menu prompt.
    Interactive(String),
    /// The first positional argument.
    Argument(String),
}

/// Outcome of resolving a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    /// Run this option.
    Run(&'a TestOption),
    /// User asked to quit from the menu.
    Quit,
}

/// Resolve a selection against the option table.
///
/// Menu input is trimmed and matched against the digit keys; `q`/`Q` quits.
/// CLI tokens are matched exactly against the named tokens; the quit
/// sentinel is not accepted there.
///
/// # Errors
///
/// Returns `RunError::InvalidSelection` when nothing matches. For CLI tokens
/// the error carries the closest token, if any.
pub fn resolve_selection<'a>(
    table: &'a OptionTable,
    selection: &Selection,
) -> Result<Resolved<'a>, RunError> {
    match selection {
        Selection::Interactive(line) => {
            let choice = line.trim();
            if choice.eq_ignore_ascii_case(QUIT) {
                return Ok(Resolved::Quit);
            }
            table
                .by_key(choice)
                .map(Resolved::Run)
                .ok_or_else(|| RunError::InvalidSelection {
                    input: choice.to_owned(),
                    mode: SelectionMode::Interactive,
                    suggestion: None,
                })
        }
        Selection::Argument(token) => table
            .by_token(token)
            .map(Resolved::Run)
            .ok_or_else(|| RunError::InvalidSelection {
                input: token.clone(),
                mode: SelectionMode::Argument,
                suggestion: suggest(token, table.tokens()),
            }),
    }
}
