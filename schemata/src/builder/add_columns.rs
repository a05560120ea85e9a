use crate::builder::{column_fragment, ensure_distinct};
use crate::column::ColumnDef;
use crate::dialect::{ColumnListStyle, Dialect};
use crate::error::{Error, Result};
use crate::identifier;
use crate::statement::Statement;

#[derive(Debug, Clone)]
pub struct AddColumnsBuilder {
    dialect: Dialect,
    table: String,
    columns: Vec<ColumnDef>,
}

impl AddColumnsBuilder {
    pub fn new(dialect: Dialect, table: impl Into<String>) -> Self {
        Self {
            dialect,
            table: table.into(),
            columns: Vec::new(),
        }
    }

    pub fn add_column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn build(&self) -> Result<Statement> {
        identifier::validate_table_name(&self.table)?;
        ensure_distinct("column", self.columns.iter().map(ColumnDef::name))?;

        // existing rows would violate the constraint
        if let Some(column) = self
            .columns
            .iter()
            .find(|column| !column.is_nullable() && column.default_value().is_none())
        {
            return Err(Error::invalid(format!(
                "column `{}` cannot be added as NOT NULL without a default value",
                column.name()
            )));
        }

        let dialect = self.dialect;
        let table = dialect.identifier(&self.table);
        let fragments: Vec<String> = self
            .columns
            .iter()
            .map(|column| column_fragment(dialect, column))
            .collect();

        let sql = match dialect.capabilities().column_list {
            ColumnListStyle::PerStatement => fragments
                .iter()
                .map(|fragment| format!("ALTER TABLE {table} ADD COLUMN {fragment}"))
                .collect(),
            ColumnListStyle::CommaList => {
                vec![format!("ALTER TABLE {table} ADD {}", fragments.join(", "))]
            }
            ColumnListStyle::RepeatedClause => {
                let clauses: Vec<String> = fragments
                    .iter()
                    .map(|fragment| format!("ADD COLUMN {fragment}"))
                    .collect();
                vec![format!("ALTER TABLE {table} {}", clauses.join(", "))]
            }
            ColumnListStyle::Parenthesized => {
                vec![format!("ALTER TABLE {table} ADD ({})", fragments.join(", "))]
            }
        };

        Ok(Statement::new(sql))
    }
}
