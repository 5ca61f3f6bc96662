//! Row materialization for metadata query results.
//!
//! Every metadata query produces a sequence of [`Row`]s: ordered
//! mappings from column name to field value. Null database values are
//! normalized to empty string when the row is built, so downstream code
//! (joins, templates) never handles null.

/// One materialized result row.
///
/// Field order matches the query's select list. Lookup of an absent
/// field yields the empty string, the same value a null field carries,
/// so entity construction never special-cases missing keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(name, value)` pairs, normalizing `None` to
    /// empty string.
    pub fn from_fields<I, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, Option<String>)>,
        N: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(name, value)| (name.into(), value.unwrap_or_default()))
            .collect();
        Self { fields }
    }

    /// Append a field, normalizing `None` to empty string.
    pub fn push(&mut self, name: impl Into<String>, value: Option<String>) {
        self.fields.push((name.into(), value.unwrap_or_default()));
    }

    /// Look up a field by name; absent fields read as empty string.
    pub fn field(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the row carries a field with this name (even if empty).
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Iterate fields in select-list order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of fields in the row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
