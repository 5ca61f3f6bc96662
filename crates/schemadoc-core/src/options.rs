//! Option resolution: merging document-global configuration with
//! per-directive options.
//!
//! The global configuration carries a full set of declared defaults;
//! directive options are sparse overrides parsed from attribute text.
//! [`resolve`] merges the two by priority and applies all type
//! conversions once, producing a fully typed [`ResolvedOptions`] —
//! conversion failures surface here, loudly, because they indicate a
//! configuration-authoring mistake rather than a runtime condition.

use crate::filter::{FilterError, Filters};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use thiserror::Error;

/// Default document template file name.
pub const DEFAULT_DOC_TEMPLATE: &str = "schemadoc.md.j2";
/// Default scheme (ER diagram) template file name.
pub const DEFAULT_SCHEME_TEMPLATE: &str = "scheme.puml.j2";

/// Errors raised during option resolution.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// A value could not be converted to the option's type.
    #[error("invalid value for option '{key}': {reason}")]
    Conversion {
        /// The offending option key.
        key: String,
        /// Why the conversion failed.
        reason: String,
    },

    /// The key names no known option.
    #[error("unknown option: {0}")]
    NotFound(String),

    /// A filter value had an illegal shape.
    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Which source wins for keys present in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    /// Directive options override configuration (the default).
    #[default]
    Tag,
    /// Configuration overrides directive options.
    Config,
}

/// Document-global options with their declared defaults.
///
/// Deserializable from the TOML configuration file; every field has a
/// default, so a missing file or sparse table resolves cleanly.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GlobalOptions {
    pub draw: bool,
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub schemas: Vec<String>,
    pub doc_template: String,
    pub scheme_template: String,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            draw: false,
            host: "localhost".to_string(),
            port: 5432,
            dbname: "postgres".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            schemas: Vec::new(),
            doc_template: DEFAULT_DOC_TEMPLATE.to_string(),
            scheme_template: DEFAULT_SCHEME_TEMPLATE.to_string(),
        }
    }
}

/// Sparse per-directive options, as parsed from attribute text.
///
/// All values are raw strings; typed conversion happens in [`resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveOptions {
    pub draw: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
    pub dbname: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub schemas: Option<String>,
    pub doc_template: Option<String>,
    pub scheme_template: Option<String>,
}

impl DirectiveOptions {
    /// Set one option by key. Unknown keys fail with
    /// [`OptionsError::NotFound`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), OptionsError> {
        let slot = match key {
            "draw" => &mut self.draw,
            "host" => &mut self.host,
            "port" => &mut self.port,
            "dbname" => &mut self.dbname,
            "user" => &mut self.user,
            "password" => &mut self.password,
            "schemas" => &mut self.schemas,
            "doc_template" => &mut self.doc_template,
            "scheme_template" => &mut self.scheme_template,
            other => return Err(OptionsError::NotFound(other.to_string())),
        };
        *slot = Some(value.to_string());
        Ok(())
    }
}

/// Fully resolved, typed options for one directive invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub draw: bool,
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub filters: Filters,
    /// Schema names as resolved, before filter conversion.
    pub schemas: Vec<String>,
    pub doc_template: String,
    pub scheme_template: String,
}

impl ResolvedOptions {
    /// Look up a resolved option by key, rendered as text.
    pub fn get(&self, key: &str) -> Result<String, OptionsError> {
        match key {
            "draw" => Ok(self.draw.to_string()),
            "host" => Ok(self.host.clone()),
            "port" => Ok(self.port.to_string()),
            "dbname" => Ok(self.dbname.clone()),
            "user" => Ok(self.user.clone()),
            "password" => Ok(self.password.clone()),
            "schemas" => Ok(self.schemas.join(", ")),
            "doc_template" => Ok(self.doc_template.clone()),
            "scheme_template" => Ok(self.scheme_template.clone()),
            other => Err(OptionsError::NotFound(other.to_string())),
        }
    }

    /// Whether the resolved value for `key` equals its declared
    /// default. Unknown keys are never default.
    ///
    /// Drives default-template provisioning, not filtering.
    pub fn is_default(&self, key: &str) -> bool {
        let defaults = GlobalOptions::default();
        match key {
            "draw" => self.draw == defaults.draw,
            "host" => self.host == defaults.host,
            "port" => self.port == defaults.port,
            "dbname" => self.dbname == defaults.dbname,
            "user" => self.user == defaults.user,
            "password" => self.password == defaults.password,
            "schemas" => self.schemas == defaults.schemas,
            "doc_template" => self.doc_template == defaults.doc_template,
            "scheme_template" => self.scheme_template == defaults.scheme_template,
            _ => false,
        }
    }
}

/// Merge global and directive options and apply typed conversions.
///
/// The merge is a full-key union: the global side always carries every
/// key, so with [`Priority::Config`] directive options never win, and
/// with [`Priority::Tag`] they win exactly where present.
pub fn resolve(
    global: &GlobalOptions,
    directive: &DirectiveOptions,
    priority: Priority,
) -> Result<ResolvedOptions, OptionsError> {
    let pick = |tag: &Option<String>| -> Option<String> {
        match priority {
            Priority::Tag => tag.clone(),
            Priority::Config => None,
        }
    };

    let draw = match pick(&directive.draw) {
        Some(raw) => parse_bool("draw", &raw)?,
        None => global.draw,
    };
    let port = match pick(&directive.port) {
        Some(raw) => raw.parse::<u16>().map_err(|e| OptionsError::Conversion {
            key: "port".to_string(),
            reason: e.to_string(),
        })?,
        None => global.port,
    };
    let schemas = match pick(&directive.schemas) {
        Some(raw) => split_schemas(&raw),
        None => global.schemas.clone(),
    };

    let filters = if schemas.is_empty() {
        Filters::new()
    } else {
        Filters::single("schema", schemas.clone())
    };
    filters.validate()?;

    Ok(ResolvedOptions {
        draw,
        port,
        host: pick(&directive.host).unwrap_or_else(|| global.host.clone()),
        dbname: pick(&directive.dbname).unwrap_or_else(|| global.dbname.clone()),
        user: pick(&directive.user).unwrap_or_else(|| global.user.clone()),
        password: pick(&directive.password).unwrap_or_else(|| global.password.clone()),
        filters,
        schemas,
        doc_template: pick(&directive.doc_template).unwrap_or_else(|| global.doc_template.clone()),
        scheme_template: pick(&directive.scheme_template)
            .unwrap_or_else(|| global.scheme_template.clone()),
    })
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, OptionsError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(OptionsError::Conversion {
            key: key.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

/// Split a textual schema list on commas with optional whitespace.
fn split_schemas(raw: &str) -> Vec<String> {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    let re = SEPARATOR.get_or_init(|| Regex::new(r",\s*").expect("Invalid regex pattern"));

    re.split(raw.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
