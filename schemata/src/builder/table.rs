use crate::builder::{column_fragment, ensure_distinct};
use crate::column::{ColumnDef, ColumnType};
use crate::dialect::{AutoIncrementStyle, Dialect};
use crate::error::{Error, Result};
use crate::identifier;
use crate::statement::Statement;

fn primary_key_name(table: &str) -> String {
    format!("pk_{table}")
}

fn sequence_name(table: &str) -> String {
    format!("{table}_seq")
}

fn trigger_name(table: &str) -> String {
    format!("{table}_idt")
}

/// `CREATE TABLE` with an optional primary key and auto-increment column.
///
/// On Oracle an auto-increment column is fed by a `<table>_seq` sequence through a
/// `<table>_idt` trigger, created by the same statement.
///
/// ```
/// use schemata::{builder::CreateTableBuilder, ColumnDef, Dialect};
///
/// let statement = CreateTableBuilder::new(Dialect::PostgreSql, "rules_profiles")
///     .add_pk_column(ColumnDef::integer("id").nullable(false).build().unwrap())
///     .add_column(ColumnDef::varchar("name").limit(100).build().unwrap())
///     .auto_increment("id")
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     statement.sql(),
///     ["CREATE TABLE rules_profiles (id SERIAL NOT NULL, name VARCHAR (100) NULL, \
///       CONSTRAINT pk_rules_profiles PRIMARY KEY (id))"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CreateTableBuilder {
    dialect: Dialect,
    table: String,
    columns: Vec<ColumnDef>,
    primary_key: Vec<String>,
    auto_increment: Option<String>,
}

impl CreateTableBuilder {
    pub fn new(dialect: Dialect, table: impl Into<String>) -> Self {
        Self {
            dialect,
            table: table.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            auto_increment: None,
        }
    }

    pub fn add_column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds a column that is part of the primary key, in key order.
    pub fn add_pk_column(mut self, column: ColumnDef) -> Self {
        self.primary_key.push(column.name().to_owned());
        self.columns.push(column);
        self
    }

    pub fn auto_increment(mut self, column: impl Into<String>) -> Self {
        self.auto_increment = Some(column.into());
        self
    }

    pub fn build(&self) -> Result<Statement> {
        identifier::validate_table_name(&self.table)?;
        ensure_distinct("column", self.columns.iter().map(ColumnDef::name))?;

        if let Some(column) = self.columns.iter().find(|column| {
            column.is_nullable() && self.primary_key.iter().any(|pk| pk == column.name())
        }) {
            return Err(Error::invalid(format!(
                "primary key column `{}` must be NOT NULL",
                column.name()
            )));
        }

        let auto_increment = self
            .auto_increment
            .as_deref()
            .map(|name| self.auto_increment_column(name))
            .transpose()?;

        let dialect = self.dialect;
        let table = dialect.identifier(&self.table);

        let mut definitions: Vec<String> = self
            .columns
            .iter()
            .map(|column| match auto_increment {
                Some(auto) if auto.name() == column.name() => {
                    auto_increment_fragment(dialect, column)
                }
                _ => column_fragment(dialect, column),
            })
            .collect();

        if !self.primary_key.is_empty() {
            let columns: Vec<String> = self
                .primary_key
                .iter()
                .map(|column| dialect.identifier(column))
                .collect();

            definitions.push(format!(
                "CONSTRAINT {} PRIMARY KEY ({})",
                dialect.identifier(&primary_key_name(&self.table)),
                columns.join(", ")
            ));
        }

        let mut create = format!("CREATE TABLE {table} ({})", definitions.join(", "));
        if let Some(options) = dialect.capabilities().table_options {
            create.push(' ');
            create.push_str(options);
        }

        let mut sql = vec![create];

        if let (Some(auto), AutoIncrementStyle::SequenceTrigger) =
            (auto_increment, dialect.capabilities().auto_increment)
        {
            let sequence = dialect.identifier(&sequence_name(&self.table));
            let column = dialect.identifier(auto.name());

            sql.push(format!("CREATE SEQUENCE {sequence} START WITH 1 INCREMENT BY 1"));
            sql.push(format!(
                "CREATE OR REPLACE TRIGGER {} BEFORE INSERT ON {table} FOR EACH ROW \
                 BEGIN IF :new.{column} IS null THEN \
                 SELECT {sequence}.nextval INTO :new.{column} FROM dual; \
                 END IF; END;",
                dialect.identifier(&trigger_name(&self.table))
            ));
        }

        Ok(Statement::new(sql))
    }

    fn auto_increment_column(&self, name: &str) -> Result<&ColumnDef> {
        if self.primary_key.len() != 1 || self.primary_key[0] != name {
            return Err(Error::invalid(format!(
                "auto-increment column `{name}` must be the only primary key column"
            )));
        }

        let column = self
            .columns
            .iter()
            .find(|column| column.name() == name)
            .ok_or_else(|| Error::invalid(format!("unknown auto-increment column `{name}`")))?;

        if !matches!(
            column.column_type(),
            ColumnType::Integer | ColumnType::BigInteger
        ) || column.default_value().is_some()
        {
            return Err(Error::invalid(format!(
                "auto-increment column `{name}` must be an integer without default"
            )));
        }

        Ok(column)
    }
}

fn auto_increment_fragment(dialect: Dialect, column: &ColumnDef) -> String {
    let name = dialect.identifier(column.name());

    match dialect.capabilities().auto_increment {
        AutoIncrementStyle::Suffix(suffix) => format!(
            "{name} {} NOT NULL {suffix}",
            dialect.type_name(&column.column_type())
        ),
        AutoIncrementStyle::Serial if column.column_type() == ColumnType::BigInteger => {
            format!("{name} BIGSERIAL NOT NULL")
        }
        AutoIncrementStyle::Serial => format!("{name} SERIAL NOT NULL"),
        AutoIncrementStyle::SequenceTrigger => column_fragment(dialect, column),
    }
}

#[derive(Debug, Clone)]
pub struct DropTableBuilder {
    dialect: Dialect,
    table: String,
}

impl DropTableBuilder {
    pub fn new(dialect: Dialect, table: impl Into<String>) -> Self {
        Self {
            dialect,
            table: table.into(),
        }
    }

    pub fn build(&self) -> Result<Statement> {
        identifier::validate_table_name(&self.table)?;

        let dialect = self.dialect;
        let mut sql = vec![format!("DROP TABLE {}", dialect.identifier(&self.table))];

        if dialect.capabilities().auto_increment == AutoIncrementStyle::SequenceTrigger {
            // ORA-02289: sequence does not exist
            sql.push(format!(
                "BEGIN EXECUTE IMMEDIATE 'DROP SEQUENCE {}'; \
                 EXCEPTION WHEN OTHERS THEN IF SQLCODE != -2289 THEN RAISE; END IF; END;",
                dialect.identifier(&sequence_name(&self.table))
            ));
        }

        Ok(Statement::new(sql))
    }
}
