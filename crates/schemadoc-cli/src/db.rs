//! SQLx-backed query executor for live PostgreSQL connections.
//!
//! The core crate is synchronous; this module owns a tokio runtime and
//! drives the async sqlx connection with `block_on`. One executor wraps
//! exactly one connection, opened per directive and closed as soon as
//! the dataset has been fetched.

use schemadoc_core::{QueryError, QueryExecutor, ResolvedOptions, Row};
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::{Column, Connection, Row as SqlxRow};
use thiserror::Error;

/// Errors raised while opening a database connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The tokio runtime could not be created.
    #[error("failed to create async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    /// The connection attempt itself failed.
    #[error("failed to connect to {user}@{host}:{port}/{dbname}: {source}")]
    Connect {
        user: String,
        host: String,
        port: u16,
        dbname: String,
        source: sqlx::Error,
    },
}

/// A live PostgreSQL connection driving the six metadata queries.
#[derive(Debug)]
pub struct PgExecutor {
    runtime: tokio::runtime::Runtime,
    conn: Option<PgConnection>,
}

impl PgExecutor {
    /// Open a connection with the resolved connection options.
    pub fn connect(options: &ResolvedOptions) -> Result<Self, ConnectError> {
        let runtime = tokio::runtime::Runtime::new()?;

        let connect_options = PgConnectOptions::new()
            .host(&options.host)
            .port(options.port)
            .database(&options.dbname)
            .username(&options.user)
            .password(&options.password);

        let conn = runtime
            .block_on(PgConnection::connect_with(&connect_options))
            .map_err(|source| ConnectError::Connect {
                user: options.user.clone(),
                host: options.host.clone(),
                port: options.port,
                dbname: options.dbname.clone(),
                source,
            })?;

        Ok(Self {
            runtime,
            conn: Some(conn),
        })
    }
}

impl QueryExecutor for PgExecutor {
    fn fetch_rows(&mut self, sql: &str) -> Result<Vec<Row>, QueryError> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| QueryError::Execution("connection already closed".into()))?;

        let pg_rows = self
            .runtime
            .block_on(sqlx::query(sql).fetch_all(conn))
            .map_err(|e| QueryError::Execution(Box::new(e)))?;

        Ok(pg_rows.iter().map(materialize_row).collect())
    }

    fn close(mut self: Box<Self>) {
        if let Some(conn) = self.conn.take() {
            let _ = self.runtime.block_on(conn.close());
        }
    }
}

impl Drop for PgExecutor {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            let _ = self.runtime.block_on(conn.close());
        }
    }
}

/// Materialize one database row with nulls normalized to empty string.
fn materialize_row(pg_row: &PgRow) -> Row {
    let mut row = Row::new();
    for (index, column) in pg_row.columns().iter().enumerate() {
        row.push(column.name(), decode_field(pg_row, index));
    }
    row
}

/// Decode one field as text, whatever its catalog type.
///
/// The metadata queries mostly yield text-ish catalog domains, but
/// `ordinal_position` and the precision fields come back numeric.
/// Undecodable values read as null.
fn decode_field(row: &PgRow, index: usize) -> Option<String> {
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return value;
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return value.map(|v| v.to_string());
    }
    if let Ok(value) = row.try_get::<Option<i32>, _>(index) {
        return value.map(|v| v.to_string());
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
        return value.map(|v| v.to_string());
    }
    if let Ok(value) = row.try_get::<Option<bool>, _>(index) {
        return value.map(|v| v.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemadoc_core::{resolve, DirectiveOptions, GlobalOptions, Priority};

    #[test]
    fn unreachable_server_reports_connect_error() {
        let mut directive = DirectiveOptions::default();
        directive.set("host", "127.0.0.1").unwrap();
        directive.set("port", "1").unwrap();
        let options = resolve(&GlobalOptions::default(), &directive, Priority::Tag).unwrap();

        let err = PgExecutor::connect(&options).unwrap_err();
        match err {
            ConnectError::Connect { host, port, .. } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
