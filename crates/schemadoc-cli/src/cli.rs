//! CLI argument parsing using clap.

use clap::{Parser, ValueEnum};
use schemadoc_core::Priority;
use std::path::PathBuf;

/// schemadoc - PostgreSQL schema documentation preprocessor
#[derive(Parser, Debug)]
#[command(name = "schemadoc")]
#[command(
    about = "Replace <schemadoc> directives in Markdown with live database documentation",
    long_about = None
)]
#[command(version)]
pub struct Args {
    /// Markdown files or directories to process in place
    /// (reads stdin and writes stdout if none provided)
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Configuration file with global options
    #[arg(short, long, value_name = "FILE", default_value = "schemadoc.toml")]
    pub config: PathBuf,

    /// Directory where default templates are provisioned
    /// (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Which source wins when an option is set in both the
    /// configuration file and a directive
    #[arg(long, default_value = "tag", value_enum)]
    pub priority: PriorityArg,

    /// Suppress warnings on stderr
    #[arg(short, long)]
    pub quiet: bool,
}

/// Option merge priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    /// Directive attributes override the configuration file
    Tag,
    /// The configuration file overrides directive attributes
    Config,
}

impl From<PriorityArg> for Priority {
    fn from(p: PriorityArg) -> Self {
        match p {
            PriorityArg::Tag => Priority::Tag,
            PriorityArg::Config => Priority::Config,
        }
    }
}
