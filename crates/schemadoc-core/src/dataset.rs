//! Nested dataset assembly from flat metadata rows.
//!
//! The six queries return flat row sequences; assembly stitches them
//! into the nested object graph templates consume: columns (with their
//! resolved foreign keys) under their owning table, parameters under
//! their owning function, triggers passed through.
//!
//! Joins are nested-loop equality joins over in-memory sequences —
//! schema metadata, not data rows, so cardinalities are small. Each
//! join copies row data into fresh entity structs; the source row
//! sequences are never mutated and can be reused or inspected after
//! assembly.

use crate::filter::Filters;
use crate::query::{MetadataQuery, QueryError, QueryExecutor};
use crate::row::Row;
use serde::Serialize;

/// A table with its comment and columns.
///
/// Identity is keyed by `name` alone when joining columns; two
/// identically named tables in different selected schemas will
/// conflate. Known limitation, preserved because templates depend on
/// the grouping.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub description: String,
    pub columns: Vec<Column>,
}

impl Table {
    fn from_row(row: &Row) -> Self {
        Self {
            schema: row.field("schemaname").to_string(),
            name: row.field("relname").to_string(),
            description: row.field("description").to_string(),
            columns: Vec::new(),
        }
    }
}

/// A column attached to exactly one table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Column {
    pub table_name: String,
    pub ordinal_position: String,
    pub column_name: String,
    pub is_nullable: String,
    pub data_type: String,
    pub column_default: String,
    pub character_maximum_length: String,
    pub numeric_precision: String,
    pub description: String,
    /// Foreign keys whose (table, column) match this column; possibly
    /// empty, never absent.
    pub foreign_keys: Vec<ForeignKey>,
}

impl Column {
    fn from_row(row: &Row) -> Self {
        Self {
            table_name: row.field("table_name").to_string(),
            ordinal_position: row.field("ordinal_position").to_string(),
            column_name: row.field("column_name").to_string(),
            is_nullable: row.field("is_nullable").to_string(),
            data_type: row.field("data_type").to_string(),
            column_default: row.field("column_default").to_string(),
            character_maximum_length: row.field("character_maximum_length").to_string(),
            numeric_precision: row.field("numeric_precision").to_string(),
            description: row.field("description").to_string(),
            foreign_keys: Vec::new(),
        }
    }
}

/// One foreign key constraint row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ForeignKey {
    pub table_schema: String,
    pub constraint_name: String,
    pub table_name: String,
    pub column_name: String,
    pub foreign_table_schema: String,
    pub foreign_table_name: String,
    pub foreign_column_name: String,
}

impl ForeignKey {
    fn from_row(row: &Row) -> Self {
        Self {
            table_schema: row.field("table_schema").to_string(),
            constraint_name: row.field("constraint_name").to_string(),
            table_name: row.field("table_name").to_string(),
            column_name: row.field("column_name").to_string(),
            foreign_table_schema: row.field("foreign_table_schema").to_string(),
            foreign_table_name: row.field("foreign_table_name").to_string(),
            foreign_column_name: row.field("foreign_column_name").to_string(),
        }
    }
}

/// A stored function with its parameters.
///
/// `specific_name` is the join key: `routine_name` is not unique under
/// overloading.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Function {
    pub routine_name: String,
    pub specific_name: String,
    pub data_type: String,
    pub routine_definition: String,
    pub external_language: String,
    pub parameters: Vec<Parameter>,
}

impl Function {
    fn from_row(row: &Row) -> Self {
        Self {
            routine_name: row.field("routine_name").to_string(),
            specific_name: row.field("specific_name").to_string(),
            data_type: row.field("data_type").to_string(),
            routine_definition: row.field("routine_definition").to_string(),
            external_language: row.field("external_language").to_string(),
            parameters: Vec::new(),
        }
    }
}

/// One function parameter row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Parameter {
    pub specific_name: String,
    pub parameter_name: String,
    pub parameter_mode: String,
    pub data_type: String,
    pub parameter_default: String,
}

impl Parameter {
    fn from_row(row: &Row) -> Self {
        Self {
            specific_name: row.field("specific_name").to_string(),
            parameter_name: row.field("parameter_name").to_string(),
            parameter_mode: row.field("parameter_mode").to_string(),
            data_type: row.field("data_type").to_string(),
            parameter_default: row.field("parameter_default").to_string(),
        }
    }
}

/// One trigger routine row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Trigger {
    pub routine_name: String,
    pub routine_definition: String,
}

impl Trigger {
    fn from_row(row: &Row) -> Self {
        Self {
            routine_name: row.field("routine_name").to_string(),
            routine_definition: row.field("routine_definition").to_string(),
        }
    }
}

/// The root aggregate handed to the rendering boundary.
///
/// Immutable once assembled; nothing is cached across directive
/// invocations.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Dataset {
    pub tables: Vec<Table>,
    pub functions: Vec<Function>,
    pub triggers: Vec<Trigger>,
}

impl Dataset {
    /// Join flat query results into the nested dataset.
    ///
    /// Columns attach to the table whose `relname` matches their
    /// `table_name`; foreign keys attach to columns matching on
    /// (table_name, column_name); parameters attach to the function
    /// matching their `specific_name`. Rows matching no owner are
    /// dropped. Inputs are read-only; repeated assembly from the same
    /// rows yields structurally identical datasets.
    pub fn assemble(
        tables: &[Row],
        columns: &[Row],
        foreign_keys: &[Row],
        functions: &[Row],
        parameters: &[Row],
        triggers: &[Row],
    ) -> Self {
        let mut out_tables = Vec::with_capacity(tables.len());
        for table_row in tables {
            let mut table = Table::from_row(table_row);
            for column_row in columns
                .iter()
                .filter(|c| c.field("table_name") == table.name)
            {
                let mut column = Column::from_row(column_row);
                column.foreign_keys = foreign_keys
                    .iter()
                    .filter(|fk| {
                        fk.field("table_name") == table.name
                            && fk.field("column_name") == column.column_name
                    })
                    .map(ForeignKey::from_row)
                    .collect();
                table.columns.push(column);
            }
            out_tables.push(table);
        }

        let mut out_functions = Vec::with_capacity(functions.len());
        for function_row in functions {
            let mut function = Function::from_row(function_row);
            function.parameters = parameters
                .iter()
                .filter(|p| p.field("specific_name") == function.specific_name)
                .map(Parameter::from_row)
                .collect();
            out_functions.push(function);
        }

        Self {
            tables: out_tables,
            functions: out_functions,
            triggers: triggers.iter().map(Trigger::from_row).collect(),
        }
    }
}

/// Run all six metadata queries and assemble the dataset.
///
/// Queries run sequentially in assembly order over the one supplied
/// executor; a failing query aborts the whole fetch.
pub fn fetch_dataset(
    executor: &mut dyn QueryExecutor,
    filters: &Filters,
) -> Result<Dataset, QueryError> {
    let tables = MetadataQuery::Tables.run(executor, filters)?;
    let columns = MetadataQuery::Columns.run(executor, filters)?;
    let foreign_keys = MetadataQuery::ForeignKeys.run(executor, filters)?;
    let functions = MetadataQuery::Functions.run(executor, filters)?;
    let parameters = MetadataQuery::Parameters.run(executor, filters)?;
    let triggers = MetadataQuery::Triggers.run(executor, filters)?;

    Ok(Dataset::assemble(
        &tables,
        &columns,
        &foreign_keys,
        &functions,
        &parameters,
        &triggers,
    ))
}
