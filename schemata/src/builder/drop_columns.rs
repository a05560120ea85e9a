use crate::builder::ensure_distinct;
use crate::dialect::{ColumnListStyle, Dialect};
use crate::error::Result;
use crate::identifier;
use crate::statement::Statement;

/// Drops one or more columns of a table.
///
/// Named constraints are left alone: on dialects that require it, the calling step
/// discovers and drops them first.
///
/// ```
/// use schemata::{builder::DropColumnsBuilder, Dialect};
///
/// let statement = DropColumnsBuilder::new(Dialect::PostgreSql, "rules_profiles")
///     .column("is_default")
///     .build()
///     .unwrap();
///
/// assert_eq!(statement.sql(), ["ALTER TABLE rules_profiles DROP COLUMN is_default"]);
/// ```
#[derive(Debug, Clone)]
pub struct DropColumnsBuilder {
    dialect: Dialect,
    table: String,
    columns: Vec<String>,
}

impl DropColumnsBuilder {
    pub fn new(dialect: Dialect, table: impl Into<String>) -> Self {
        Self {
            dialect,
            table: table.into(),
            columns: Vec::new(),
        }
    }

    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(name.into());
        self
    }

    pub fn columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn build(&self) -> Result<Statement> {
        identifier::validate_table_name(&self.table)?;
        for column in &self.columns {
            identifier::validate_column_name(column)?;
        }
        ensure_distinct("column", self.columns.iter().map(String::as_str))?;

        let dialect = self.dialect;
        let table = dialect.identifier(&self.table);
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|column| dialect.identifier(column))
            .collect();

        let sql = match dialect.capabilities().column_list {
            ColumnListStyle::PerStatement => columns
                .iter()
                .map(|column| format!("ALTER TABLE {table} DROP COLUMN {column}"))
                .collect(),
            ColumnListStyle::CommaList => vec![format!(
                "ALTER TABLE {table} DROP COLUMN {}",
                columns.join(", ")
            )],
            ColumnListStyle::RepeatedClause => {
                let clauses: Vec<String> = columns
                    .iter()
                    .map(|column| format!("DROP COLUMN {column}"))
                    .collect();
                vec![format!("ALTER TABLE {table} {}", clauses.join(", "))]
            }
            ColumnListStyle::Parenthesized if columns.len() == 1 => {
                vec![format!("ALTER TABLE {table} DROP COLUMN {}", columns[0])]
            }
            ColumnListStyle::Parenthesized => vec![format!(
                "ALTER TABLE {table} DROP ({})",
                columns.join(", ")
            )],
        };

        Ok(Statement::new(sql))
    }
}
