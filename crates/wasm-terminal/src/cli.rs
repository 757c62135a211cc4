//! Command line arguments.

use wasm_terminal_core::{Error, Result};

/// Find the settings path given with `--config <path>`.
///
/// Returns `Ok(None)` when the flag is absent. A flag without a value, or
/// followed by another flag, is an error.
pub fn config_path(args: &[String]) -> Result<Option<&str>> {
    let Some(index) = args.iter().position(|arg| arg == "--config") else {
        return Ok(None);
    };
    match args.get(index + 1) {
        Some(path) if !path.starts_with("--") => Ok(Some(path.as_str())),
        _ => Err(Error::Config("--config requires a path".to_string())),
    }
}
