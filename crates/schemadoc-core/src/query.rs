//! The six fixed metadata queries and their shared execution path.
//!
//! Each query kind is a descriptor: a fixed base query text ending in a
//! WHERE anchor, plus a whitelist of filterable fields. One shared
//! execution path builds the final SQL and fetches rows through the
//! [`QueryExecutor`] trait — the query kinds are configuration data,
//! not a class hierarchy.
//!
//! All statements are read-only SELECTs against `information_schema`
//! and `pg_catalog` views.

use crate::filter::{FilterError, Filters};
use crate::row::Row;
use thiserror::Error;

/// Errors raised while building or executing a metadata query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A filter value had an illegal shape.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// The query failed against a live connection. Carries the
    /// underlying driver error; never retried.
    #[error("metadata query failed: {0}")]
    Execution(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Executes SQL text against a live database connection.
///
/// The CLI crate provides the sqlx-backed implementation; tests use
/// in-memory stubs. Implementations must funnel every field through the
/// [`Row`] null-normalization guarantee.
pub trait QueryExecutor {
    /// Run one SELECT and materialize its rows.
    fn fetch_rows(&mut self, sql: &str) -> Result<Vec<Row>, QueryError>;

    /// Release the underlying connection.
    ///
    /// Default is a no-op for executors with nothing to release.
    fn close(self: Box<Self>) {}
}

const TABLES_SQL: &str = "\
SELECT
  st.schemaname,
  st.relname,
  pd.description
FROM pg_catalog.pg_statio_all_tables AS st
LEFT JOIN pg_catalog.pg_description pd
       ON st.relid = pd.objoid
      AND pd.objsubid = 0
WHERE 1 = 1
";

const COLUMNS_SQL: &str = "\
SELECT
  c.table_name,
  c.ordinal_position,
  c.column_name,
  c.is_nullable,
  c.data_type,
  c.column_default,
  c.character_maximum_length,
  c.numeric_precision,
  pd.description
FROM information_schema.columns c
JOIN pg_catalog.pg_statio_all_tables st
  ON st.schemaname = c.table_schema
 AND st.relname = c.table_name
LEFT JOIN pg_catalog.pg_description pd
       ON pd.objoid = st.relid
      AND pd.objsubid = c.ordinal_position
WHERE 1 = 1
";

const FOREIGN_KEYS_SQL: &str = "\
SELECT
  tc.table_schema,
  tc.constraint_name,
  tc.table_name,
  kcu.column_name,
  ccu.table_schema AS foreign_table_schema,
  ccu.table_name AS foreign_table_name,
  ccu.column_name AS foreign_column_name
FROM information_schema.table_constraints AS tc
JOIN information_schema.key_column_usage AS kcu
  ON tc.constraint_name = kcu.constraint_name
 AND tc.table_schema = kcu.table_schema
JOIN information_schema.constraint_column_usage AS ccu
  ON ccu.constraint_name = tc.constraint_name
 AND ccu.table_schema = tc.table_schema
WHERE constraint_type = 'FOREIGN KEY'
";

const FUNCTIONS_SQL: &str = "\
SELECT
  routine_name,
  specific_name,
  data_type,
  routine_definition,
  external_language
FROM information_schema.routines
WHERE data_type != 'trigger'
";

const PARAMETERS_SQL: &str = "\
SELECT
  specific_name,
  parameter_name,
  parameter_mode,
  data_type,
  parameter_default
FROM information_schema.parameters
WHERE 1 = 1
";

const TRIGGERS_SQL: &str = "\
SELECT
  routine_name,
  routine_definition
FROM information_schema.routines
WHERE data_type = 'trigger'
";

/// One of the six metadata query kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataQuery {
    /// Tables with their comments, from the statistics view.
    Tables,
    /// Columns of all tables, joined to the owning table's statistics
    /// row for comments.
    Columns,
    /// All foreign key constraints. Not filterable: FK rows are
    /// cross-schema by nature.
    ForeignKeys,
    /// Stored functions (routines that are not triggers).
    Functions,
    /// Function parameters, keyed by specific_name.
    Parameters,
    /// Trigger routines.
    Triggers,
}

impl MetadataQuery {
    /// All query kinds in assembly order.
    pub const ALL: [MetadataQuery; 6] = [
        MetadataQuery::Tables,
        MetadataQuery::Columns,
        MetadataQuery::ForeignKeys,
        MetadataQuery::Functions,
        MetadataQuery::Parameters,
        MetadataQuery::Triggers,
    ];

    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            MetadataQuery::Tables => "tables",
            MetadataQuery::Columns => "columns",
            MetadataQuery::ForeignKeys => "foreign_keys",
            MetadataQuery::Functions => "functions",
            MetadataQuery::Parameters => "parameters",
            MetadataQuery::Triggers => "triggers",
        }
    }

    fn base_sql(&self) -> &'static str {
        match self {
            MetadataQuery::Tables => TABLES_SQL,
            MetadataQuery::Columns => COLUMNS_SQL,
            MetadataQuery::ForeignKeys => FOREIGN_KEYS_SQL,
            MetadataQuery::Functions => FUNCTIONS_SQL,
            MetadataQuery::Parameters => PARAMETERS_SQL,
            MetadataQuery::Triggers => TRIGGERS_SQL,
        }
    }

    /// Whitelist of filterable fields: logical name → SQL field.
    ///
    /// The Columns query filters on `st.schemaname` — the owning
    /// table's schema from the statistics join, not the column's own
    /// schema field — so its result stays consistent with the Tables
    /// result under a schema filter.
    pub fn filter_fields(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            MetadataQuery::Tables => &[("schema", "schemaname")],
            MetadataQuery::Columns => &[("schema", "st.schemaname")],
            MetadataQuery::ForeignKeys => &[],
            MetadataQuery::Functions => &[("schema", "routine_schema")],
            MetadataQuery::Parameters => &[("schema", "specific_schema")],
            MetadataQuery::Triggers => &[("schema", "routine_schema")],
        }
    }

    /// Build the final SQL text: base query plus compiled filters.
    pub fn sql(&self, filters: &Filters) -> Result<String, FilterError> {
        let fragment = filters.compile(self.filter_fields())?;
        Ok(format!("{}{}", self.base_sql(), fragment))
    }

    /// Execute the query and materialize its rows.
    ///
    /// Rows come back in the engine's natural result order; the query
    /// texts request no ordering.
    pub fn run(
        &self,
        executor: &mut dyn QueryExecutor,
        filters: &Filters,
    ) -> Result<Vec<Row>, QueryError> {
        let sql = self.sql(filters)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(query = self.name(), sql = %sql, "executing metadata query");
        executor.fetch_rows(&sql)
    }
}
