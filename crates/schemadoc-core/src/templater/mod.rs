//! Jinja rendering for schema documentation.
//!
//! Rendering is the last stage of directive processing:
//!
//! ```text
//! Rows → [dataset] → Dataset → [templater] → Markdown / PlantUML
//! ```
//!
//! Two render entry points mirror the two template kinds: the document
//! template receives the whole dataset, the scheme template only the
//! tables. Templates are author-supplied text; rendering never touches
//! the filesystem or the database.

mod error;
#[cfg(feature = "templating")]
mod jinja;

pub use error::TemplateError;

#[cfg(feature = "templating")]
pub use jinja::{render_doc, render_scheme};
