//! Directive processing: options, templates, database, rendering.
//!
//! Each directive is processed independently. Configuration-authoring
//! mistakes (bad option values, unknown attributes) are loud and fail
//! the run; environmental failures (unreachable database, failing
//! query, broken template) degrade that one directive to an empty
//! substitution with a warning, so the rest of the document still
//! builds.

use crate::db::{ConnectError, PgExecutor};
use crate::directive;
use crate::templates;
use schemadoc_core::{
    fetch_dataset, render_doc, render_scheme, resolve, GlobalOptions, Priority, QueryExecutor,
    ResolvedOptions,
};
use std::path::{Path, PathBuf};

/// Opens database connections for directive processing.
///
/// Tests substitute stub connectors serving canned rows.
pub trait Connector {
    fn connect(&self, options: &ResolvedOptions) -> Result<Box<dyn QueryExecutor>, ConnectError>;
}

/// The production connector, backed by sqlx.
pub struct SqlxConnector;

impl Connector for SqlxConnector {
    fn connect(&self, options: &ResolvedOptions) -> Result<Box<dyn QueryExecutor>, ConnectError> {
        Ok(Box::new(PgExecutor::connect(options)?))
    }
}

enum DirectiveFailure {
    /// Fails the run; the substitution is still empty.
    Loud(String),
    /// Warns and substitutes empty; the run continues.
    Contained(String),
}

/// Processes `<schemadoc>` directives in Markdown content.
pub struct Processor {
    config: GlobalOptions,
    project_dir: PathBuf,
    priority: Priority,
    quiet: bool,
    connector: Box<dyn Connector>,
}

impl Processor {
    pub fn new(config: GlobalOptions, project_dir: PathBuf, priority: Priority, quiet: bool) -> Self {
        Self::with_connector(config, project_dir, priority, quiet, Box::new(SqlxConnector))
    }

    pub fn with_connector(
        config: GlobalOptions,
        project_dir: PathBuf,
        priority: Priority,
        quiet: bool,
        connector: Box<dyn Connector>,
    ) -> Self {
        Self {
            config,
            project_dir,
            priority,
            quiet,
            connector,
        }
    }

    /// Replace every directive in one document.
    ///
    /// Returns the processed content and whether any loud error
    /// occurred.
    pub fn process_document(&self, content: &str) -> (String, bool) {
        let mut had_errors = false;
        let (processed, _count) = directive::replace_directives(content, |attribute_text| {
            match self.render_directive(attribute_text) {
                Ok(rendered) => rendered,
                Err(DirectiveFailure::Loud(message)) => {
                    had_errors = true;
                    eprintln!("schemadoc: error: {message}");
                    String::new()
                }
                Err(DirectiveFailure::Contained(message)) => {
                    self.warn(&message);
                    String::new()
                }
            }
        });
        (processed, had_errors)
    }

    fn render_directive(&self, attribute_text: &str) -> Result<String, DirectiveFailure> {
        let options = directive::parse_options(attribute_text)
            .map_err(|e| DirectiveFailure::Loud(e.to_string()))?;
        let resolved = resolve(&self.config, &options, self.priority)
            .map_err(|e| DirectiveFailure::Loud(e.to_string()))?;

        let doc_template = self.load_template(
            &resolved,
            "doc_template",
            &resolved.doc_template,
            templates::DEFAULT_DOC_TEMPLATE_SOURCE,
        )?;
        let scheme_template = if resolved.draw {
            Some(self.load_template(
                &resolved,
                "scheme_template",
                &resolved.scheme_template,
                templates::DEFAULT_SCHEME_TEMPLATE_SOURCE,
            )?)
        } else {
            None
        };

        let mut executor = self
            .connector
            .connect(&resolved)
            .map_err(|e| DirectiveFailure::Contained(e.to_string()))?;
        let dataset = fetch_dataset(executor.as_mut(), &resolved.filters)
            .map_err(|e| DirectiveFailure::Contained(e.to_string()))?;
        executor.close();

        // A broken document template degrades to empty text, but a
        // requested scheme still renders and appends.
        let mut rendered = match render_doc(&dataset, &doc_template) {
            Ok(text) => text,
            Err(e) => {
                self.warn(&format!("failed to render document template: {e}"));
                String::new()
            }
        };

        if let Some(scheme_template) = scheme_template {
            match render_scheme(&dataset.tables, &scheme_template) {
                Ok(scheme) => {
                    rendered.push_str("\n\n");
                    rendered.push_str(&scheme);
                }
                Err(e) => {
                    self.warn(&format!("failed to render scheme template: {e}"));
                }
            }
        }

        Ok(rendered)
    }

    /// Resolve a template option to its source text.
    ///
    /// Default template names are provisioned on first use; a custom
    /// name must already exist on disk.
    fn load_template(
        &self,
        resolved: &ResolvedOptions,
        option_key: &str,
        template_name: &str,
        default_source: &str,
    ) -> Result<String, DirectiveFailure> {
        let path = self.template_path(template_name);
        if resolved.is_default(option_key) {
            templates::provision_if_missing(&path, default_source)
                .map_err(|e| DirectiveFailure::Contained(format!("{e:#}")))?;
        }
        templates::read_template(&path).map_err(|e| DirectiveFailure::Contained(format!("{e:#}")))
    }

    fn template_path(&self, template_name: &str) -> PathBuf {
        let path = Path::new(template_name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }

    fn warn(&self, message: &str) {
        if !self.quiet {
            eprintln!("schemadoc: warning: {message}");
        }
    }
}
