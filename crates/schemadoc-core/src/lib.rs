//! # schemadoc-core
//!
//! Schema introspection and documentation assembly for PostgreSQL.
//!
//! ## Architecture
//!
//! The core is a pipeline that turns flat catalog query results into a
//! nested dataset ready for template rendering:
//!
//! ```text
//! Options (config + directive) → [options]  → connection params + filters
//!                                     │
//!                                     ▼
//! Database connection → [query] six metadata queries ← [filter] predicates
//!                                     │
//!                                     ▼ [row] null-normalized rows
//!                                     │
//!                                     ▼ [dataset] nested-loop joins
//!                        Dataset {tables, functions, triggers}
//!                                     │
//!                                     ▼ [templater]
//!                             Markdown / PlantUML text
//! ```
//!
//! The database connection itself lives behind the [`QueryExecutor`]
//! trait; the CLI crate provides the sqlx-backed implementation. Every
//! operation takes the executor as an explicit argument — there is no
//! ambient connection state.

pub mod dataset;
pub mod filter;
pub mod options;
pub mod query;
pub mod row;
pub mod templater;

pub use dataset::{fetch_dataset, Column, Dataset, ForeignKey, Function, Parameter, Table, Trigger};
pub use filter::{FilterError, Filters};
pub use options::{resolve, DirectiveOptions, GlobalOptions, OptionsError, Priority, ResolvedOptions};
pub use query::{MetadataQuery, QueryError, QueryExecutor};
pub use row::Row;
pub use templater::TemplateError;
#[cfg(feature = "templating")]
pub use templater::{render_doc, render_scheme};
