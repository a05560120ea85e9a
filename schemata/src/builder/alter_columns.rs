use crate::builder::{column_fragment, ensure_distinct, nullability};
use crate::column::ColumnDef;
use crate::dialect::{AlterStyle, Dialect};
use crate::error::{Error, Result};
use crate::identifier;
use crate::statement::Statement;

/// Brings existing columns to a target definition: type, nullability and default.
///
/// The type change always comes before the nullability change. Oracle cannot change
/// both in one clause, so it always gets at least two statements. `split(true)` asks for the
/// same separation on the other dialects that have a standalone nullability clause.
///
/// ```
/// use schemata::{builder::AlterColumnsBuilder, ColumnDef, Dialect};
///
/// let column = ColumnDef::varchar("component_uuid")
///     .limit(50)
///     .nullable(false)
///     .build()
///     .unwrap();
///
/// let statement = AlterColumnsBuilder::new(Dialect::Oracle, "events")
///     .update_column(column)
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     statement.sql(),
///     [
///         "ALTER TABLE events MODIFY (component_uuid VARCHAR2 (50 CHAR))",
///         "ALTER TABLE events MODIFY (component_uuid NOT NULL)",
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct AlterColumnsBuilder {
    dialect: Dialect,
    table: String,
    columns: Vec<ColumnDef>,
    split: bool,
}

impl AlterColumnsBuilder {
    pub fn new(dialect: Dialect, table: impl Into<String>) -> Self {
        Self {
            dialect,
            table: table.into(),
            columns: Vec::new(),
            split: false,
        }
    }

    pub fn update_column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn split(mut self, split: bool) -> Self {
        self.split = split;
        self
    }

    pub fn build(&self) -> Result<Statement> {
        identifier::validate_table_name(&self.table)?;
        ensure_distinct("column", self.columns.iter().map(ColumnDef::name))?;

        let capabilities = self.dialect.capabilities();

        if self.split && !capabilities.nullability_clause {
            return Err(Error::invalid(format!(
                "{} restates nullability with the column type, alter cannot be split",
                self.dialect
            )));
        }

        let table = self.dialect.identifier(&self.table);

        let sql = match capabilities.alter {
            AlterStyle::AlterColumn if self.split => self.set_clauses(&table, true),
            AlterStyle::AlterColumn => self.alter_column(&table),
            AlterStyle::ModifyColumn => self.modify_column(&table),
            AlterStyle::TypeClauses => self.set_clauses(&table, self.split),
            AlterStyle::SplitModify => self.split_modify(&table),
        };

        Ok(Statement::new(sql))
    }

    fn alter_column(&self, table: &str) -> Vec<String> {
        let dialect = self.dialect;
        let mut sql = Vec::new();

        for column in &self.columns {
            if !dialect.capabilities().default_as_constraint {
                sql.push(format!(
                    "ALTER TABLE {table} ALTER COLUMN {}",
                    column_fragment(dialect, column)
                ));
                continue;
            }

            let name = dialect.identifier(column.name());
            sql.push(format!(
                "ALTER TABLE {table} ALTER COLUMN {name} {}{}",
                dialect.type_name(&column.column_type()),
                nullability(column.is_nullable())
            ));

            if let Some(default) = column.default_value() {
                sql.push(format!(
                    "ALTER TABLE {table} ADD DEFAULT {} FOR {name}",
                    dialect.default_literal(default)
                ));
            }
        }

        sql
    }

    fn modify_column(&self, table: &str) -> Vec<String> {
        let clauses: Vec<String> = self
            .columns
            .iter()
            .map(|column| format!("MODIFY COLUMN {}", column_fragment(self.dialect, column)))
            .collect();

        vec![format!("ALTER TABLE {table} {}", clauses.join(", "))]
    }

    /// `ALTER COLUMN c TYPE`, `SET NOT NULL` and `SET DEFAULT` clauses, either all in
    /// one statement or one statement per kind of change.
    fn set_clauses(&self, table: &str, split: bool) -> Vec<String> {
        let dialect = self.dialect;
        let per_statement = dialect.capabilities().alter == AlterStyle::AlterColumn;

        let mut types = Vec::new();
        let mut nulls = Vec::new();
        let mut defaults = Vec::new();
        let mut combined = Vec::new();

        for column in &self.columns {
            let name = dialect.identifier(column.name());
            let type_name = dialect.type_name(&column.column_type());

            let type_clause = if per_statement {
                format!("ALTER COLUMN {name} SET DATA TYPE {type_name}")
            } else {
                format!("ALTER COLUMN {name} TYPE {type_name}")
            };
            let null_clause = match (column.is_nullable(), per_statement) {
                (false, _) => format!("ALTER COLUMN {name} SET NOT NULL"),
                (true, true) => format!("ALTER COLUMN {name} SET NULL"),
                (true, false) => format!("ALTER COLUMN {name} DROP NOT NULL"),
            };

            combined.push(type_clause.clone());
            combined.push(null_clause.clone());
            types.push(type_clause);
            nulls.push(null_clause);

            if let Some(default) = column.default_value() {
                let default_clause = format!(
                    "ALTER COLUMN {name} SET DEFAULT {}",
                    dialect.default_literal(default)
                );
                combined.push(default_clause.clone());
                defaults.push(default_clause);
            }
        }

        if per_statement {
            return types
                .into_iter()
                .chain(nulls)
                .chain(defaults)
                .map(|clause| format!("ALTER TABLE {table} {clause}"))
                .collect();
        }

        if !split {
            return vec![format!("ALTER TABLE {table} {}", combined.join(", "))];
        }

        [types, nulls, defaults]
            .into_iter()
            .filter(|clauses| !clauses.is_empty())
            .map(|clauses| format!("ALTER TABLE {table} {}", clauses.join(", ")))
            .collect()
    }

    /// Oracle rejects a nullability clause that does not change anything, so columns
    /// that stay nullable are made nullable in a block ignoring ORA-01451.
    fn split_modify(&self, table: &str) -> Vec<String> {
        let dialect = self.dialect;
        let mut types = Vec::new();
        let mut not_nulls = Vec::new();
        let mut nullables = Vec::new();

        for column in &self.columns {
            let name = dialect.identifier(column.name());
            let mut definition = format!("{name} {}", dialect.type_name(&column.column_type()));

            if let Some(default) = column.default_value() {
                definition.push_str(" DEFAULT ");
                definition.push_str(&dialect.default_literal(default));
            }

            types.push(definition);

            if column.is_nullable() {
                nullables.push(name);
            } else {
                not_nulls.push(format!("{name} NOT NULL"));
            }
        }

        let mut sql = vec![format!("ALTER TABLE {table} MODIFY ({})", types.join(", "))];

        if !not_nulls.is_empty() {
            sql.push(format!("ALTER TABLE {table} MODIFY ({})", not_nulls.join(", ")));
        }

        for name in nullables {
            // ORA-01451: column to be modified to NULL cannot be modified to NULL
            sql.push(format!(
                "BEGIN EXECUTE IMMEDIATE 'ALTER TABLE {table} MODIFY ({name} NULL)'; \
                 EXCEPTION WHEN OTHERS THEN IF SQLCODE != -1451 THEN RAISE; END IF; END;"
            ));
        }

        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component_uuid() -> ColumnDef {
        ColumnDef::varchar("component_uuid")
            .limit(50)
            .nullable(false)
            .build()
            .unwrap()
    }

    #[test]
    fn mssql_default_is_a_separate_constraint() {
        let column = ColumnDef::boolean("enabled")
            .nullable(false)
            .default_value(crate::column::DefaultValue::Boolean(true))
            .build()
            .unwrap();

        let statement = AlterColumnsBuilder::new(Dialect::MsSql, "rules")
            .update_column(column)
            .build()
            .unwrap();

        assert_eq!(
            statement.sql(),
            [
                "ALTER TABLE rules ALTER COLUMN enabled BIT NOT NULL",
                "ALTER TABLE rules ADD DEFAULT 1 FOR enabled",
            ]
        );
    }

    #[test]
    fn h2_split_uses_set_clauses() {
        let statement = AlterColumnsBuilder::new(Dialect::H2, "events")
            .update_column(component_uuid())
            .split(true)
            .build()
            .unwrap();

        assert_eq!(
            statement.sql(),
            [
                "ALTER TABLE events ALTER COLUMN component_uuid SET DATA TYPE VARCHAR (50)",
                "ALTER TABLE events ALTER COLUMN component_uuid SET NOT NULL",
            ]
        );
    }

    #[test]
    fn split_is_rejected_where_nullability_is_restated() {
        for dialect in [Dialect::MsSql, Dialect::MySql] {
            let err = AlterColumnsBuilder::new(dialect, "events")
                .update_column(component_uuid())
                .split(true)
                .build()
                .unwrap_err();

            assert!(err.is_configuration());
        }
    }

    #[test]
    fn oracle_keeps_nullable_columns_nullable_without_failing() {
        let kee = ColumnDef::varchar("kee").limit(400).build().unwrap();

        let statement = AlterColumnsBuilder::new(Dialect::Oracle, "issues")
            .update_column(kee)
            .build()
            .unwrap();

        assert_eq!(
            statement.sql(),
            [
                "ALTER TABLE issues MODIFY (kee VARCHAR2 (400 CHAR))",
                "BEGIN EXECUTE IMMEDIATE 'ALTER TABLE issues MODIFY (kee NULL)'; \
                 EXCEPTION WHEN OTHERS THEN IF SQLCODE != -1451 THEN RAISE; END IF; END;",
            ]
        );
    }
}
