//! Configuration file loading.
//!
//! The configuration file is a flat TOML table of global options. A
//! missing file is not an error: every option has a declared default,
//! and directives can carry the rest.

use anyhow::{Context, Result};
use schemadoc_core::GlobalOptions;
use std::path::Path;

/// Load global options from a TOML file.
///
/// Returns the defaults when the file does not exist; a file that
/// exists but fails to parse is an error.
pub fn load_config(path: &Path) -> Result<GlobalOptions> {
    if !path.exists() {
        return Ok(GlobalOptions::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
