//! Declarative filters compiled into SQL predicate fragments.
//!
//! A [`Filters`] value maps a logical filter name (e.g. `schema`) to a
//! list of values. Each metadata query owns a whitelist mapping logical
//! names to the SQL field they constrain; compilation renders one
//! `AND <field> in (...)` line per recognized filter. Unknown logical
//! names are silently ignored, so one filters value can be handed to
//! every query regardless of which filters each supports.

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised for malformed filter values.
///
/// These indicate a configuration-authoring mistake and are surfaced
/// loudly at options-resolution time rather than silently producing
/// broken SQL.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A filter's value list is empty or leads with a non-string value.
    #[error("invalid value for filter '{filter}': expected a list of strings, got {found}")]
    InvalidValue {
        /// Logical filter name.
        filter: String,
        /// Description of the offending value.
        found: String,
    },
}

/// A mapping from logical filter name to a list of filter values.
///
/// Values are kept as JSON values so TOML configuration and directive
/// attributes share one validation path; only string values are legal,
/// enforced by [`Filters::validate`] and at compile time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    entries: BTreeMap<String, Vec<Value>>,
}

impl Filters {
    /// Create an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter set with a single entry of string values.
    pub fn single<S: Into<String>>(name: impl Into<String>, values: Vec<S>) -> Self {
        let mut filters = Self::new();
        filters.insert(
            name,
            values.into_iter().map(|v| Value::String(v.into())).collect(),
        );
        filters
    }

    /// Insert (or replace) a filter entry.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Value>) {
        self.entries.insert(name.into(), values);
    }

    /// Whether no filters are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check every entry for a legal value shape.
    ///
    /// Each value list must be non-empty and lead with a string.
    pub fn validate(&self) -> Result<(), FilterError> {
        for (name, values) in &self.entries {
            Self::check_values(name, values)?;
        }
        Ok(())
    }

    /// Compile the filters into a predicate fragment for one query.
    ///
    /// `whitelist` maps logical filter names to the SQL field they
    /// constrain for that query. The fragment is empty when no entry
    /// matches the whitelist; otherwise it is one
    /// `AND <field> in (<values>)\n` line per recognized filter,
    /// combining with implicit AND.
    pub fn compile(&self, whitelist: &[(&str, &str)]) -> Result<String, FilterError> {
        let mut fragment = String::new();
        for (name, values) in &self.entries {
            let Some((_, field)) = whitelist.iter().find(|(logical, _)| logical == name) else {
                continue;
            };
            Self::check_values(name, values)?;
            let quoted: Vec<String> = values.iter().map(quote_value).collect();
            fragment.push_str(&format!("AND {} in ({})\n", field, quoted.join(", ")));
        }
        Ok(fragment)
    }

    fn check_values(name: &str, values: &[Value]) -> Result<(), FilterError> {
        match values.first() {
            Some(Value::String(_)) => Ok(()),
            Some(other) => Err(FilterError::InvalidValue {
                filter: name.to_string(),
                found: other.to_string(),
            }),
            None => Err(FilterError::InvalidValue {
                filter: name.to_string(),
                found: "an empty list".to_string(),
            }),
        }
    }
}

/// Render one filter value as a quoted SQL literal.
///
/// Strings quote their raw content; other values (legal only past the
/// first position) quote their display form.
fn quote_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        other => format!("'{other}'"),
    }
}
