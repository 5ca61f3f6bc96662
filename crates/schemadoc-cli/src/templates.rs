//! Default templates and their on-disk provisioning.
//!
//! The default document and scheme templates ship inside the binary.
//! When a directive resolves to the default template name and no file
//! of that name exists in the project directory, the default is written
//! out so authors can start from a working template and edit it.

use anyhow::{Context, Result};
use std::path::Path;

/// Built-in Markdown documentation template.
pub const DEFAULT_DOC_TEMPLATE_SOURCE: &str = include_str!("../templates/schemadoc.md.j2");

/// Built-in PlantUML scheme template.
pub const DEFAULT_SCHEME_TEMPLATE_SOURCE: &str = include_str!("../templates/scheme.puml.j2");

/// Write `source` to `path` unless a file already exists there.
pub fn provision_if_missing(path: &Path, source: &str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    std::fs::write(path, source)
        .with_context(|| format!("Failed to write default template: {}", path.display()))
}

/// Read a template file as text.
pub fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read template: {}", path.display()))
}
