//! schemadoc CLI library.
//!
//! The binary is a thin wrapper over this crate: argument parsing,
//! configuration loading, directive replacement in Markdown sources,
//! and the sqlx-backed database executor all live here so integration
//! tests can drive the same code paths.

pub mod cli;
pub mod config;
pub mod db;
pub mod directive;
pub mod processor;
pub mod templates;
