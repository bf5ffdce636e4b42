/// Locating the project root and moving into it.
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// The directory test commands run from.
///
/// An explicit root wins. Otherwise it is the parent of the directory that
/// holds the running executable (or that directory itself at the
/// filesystem root).
///
/// # Errors
///
/// Fails if the executable's own path cannot be determined.
pub fn project_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }
    let exe = env::current_exe().context("cannot locate the running executable")?;
    let exe_dir = exe
        .parent()
        .with_context(|| format!("executable path {} has no parent", exe.display()))?;
    Ok(exe_dir.parent().unwrap_or(exe_dir).to_path_buf())
}

/// Change the process working directory to the project root, once, and
/// return the resulting absolute working directory.
///
/// # Errors
///
/// Fails if the root cannot be determined or entered.
pub fn enter_project_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let root = project_root(explicit)?;
    env::set_current_dir(&root)
        .with_context(|| format!("cannot change directory to {}", root.display()))?;
    env::current_dir().context("cannot read the working directory")
}
