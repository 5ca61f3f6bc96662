//! schemadoc CLI - PostgreSQL schema documentation preprocessor

use schemadoc_cli::cli::Args;
use schemadoc_cli::config;
use schemadoc_cli::processor::Processor;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use walkdir::WalkDir;

/// A directive failed to process.
const EXIT_FAILURE: u8 = 1;
/// Configuration error (e.g. unreadable config file or input).
const EXIT_CONFIG_ERROR: u8 = 66;

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("schemadoc: error: {e:#}");
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

fn run(args: Args) -> Result<bool> {
    let config = config::load_config(&args.config)?;
    let project_dir = args
        .project_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let processor = Processor::new(config, project_dir, args.priority.into(), args.quiet);

    if args.files.is_empty() {
        return process_stdin(&processor);
    }

    let mut had_errors = false;
    for path in collect_markdown_files(&args.files)? {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let (processed, file_had_errors) = processor.process_document(&content);
        had_errors |= file_had_errors;

        if processed != content {
            fs::write(&path, processed)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }
    }

    Ok(had_errors)
}

fn process_stdin(processor: &Processor) -> Result<bool> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;

    let (processed, had_errors) = processor.process_document(&content);

    io::stdout()
        .write_all(processed.as_bytes())
        .context("Failed to write to stdout")?;

    Ok(had_errors)
}

/// Expand the positional arguments into a flat list of Markdown files.
///
/// Directories are walked recursively for `.md` files; explicit file
/// arguments are taken as-is, whatever their extension.
fn collect_markdown_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("Failed to walk directory: {}", path.display()))?;
                if entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "md")
                {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}
