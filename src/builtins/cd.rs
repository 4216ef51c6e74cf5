use crate::error::{Result, ShellError};
use std::{env, path::PathBuf};

use tracing::debug;

/// Changes the interpreter's own working directory to the first argument.
pub fn run(args: &[&str]) -> Result<()> {
    let path = PathBuf::from(args.first().copied().ok_or(ShellError::MissingDirectory)?);

    env::set_current_dir(&path).map_err(|source| ShellError::ChangeDirectory {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), "changed directory");
    Ok(())
}
