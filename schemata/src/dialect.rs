//! Supported database dialects and the capability table the builders read from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::column::{ColumnType, DefaultValue};
use crate::error::{Error, Result};
use crate::identifier;

/// A database product family.
///
/// Dialects are plain values: pass the active one to every builder and step.
///
/// ```
/// use schemata::Dialect;
///
/// let dialect: Dialect = "mssql".parse().unwrap();
/// assert!(dialect.requires_constraint_cleanup());
/// assert!("db2".parse::<Dialect>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Embedded, file-backed engine.
    H2,
    MsSql,
    MySql,
    Oracle,
    PostgreSql,
}

/// How a statement lists several columns of the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnListStyle {
    /// One statement per column.
    PerStatement,
    /// `ADD a T, b T` / `DROP COLUMN a, b`
    CommaList,
    /// `ADD COLUMN a T, ADD COLUMN b T` / `DROP COLUMN a, DROP COLUMN b`
    RepeatedClause,
    /// `ADD (a T, b T)` / `DROP (a, b)`
    Parenthesized,
}

/// How a column definition is changed in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlterStyle {
    /// `ALTER COLUMN c <type> [NOT] NULL`, one column per statement.
    AlterColumn,
    /// `MODIFY COLUMN c <type> [NOT] NULL`, several columns per statement.
    ModifyColumn,
    /// `ALTER COLUMN c TYPE <type>, ALTER COLUMN c SET NOT NULL`
    TypeClauses,
    /// `MODIFY (c <type>)` then `MODIFY (c NOT NULL)`: type and nullability can
    /// never share a statement.
    SplitModify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropIndexStyle {
    /// `DROP INDEX IF EXISTS idx`
    IfExists,
    /// `DROP INDEX idx ON table`
    OnTable,
    /// `DROP INDEX idx`
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoIncrementStyle {
    /// Appended to the column definition.
    Suffix(&'static str),
    /// `SERIAL` / `BIGSERIAL` replace the column type.
    Serial,
    /// A sequence and a trigger are created next to the table.
    SequenceTrigger,
}

/// Facts about a dialect that the builders and steps depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub quotes: (char, char),
    /// Unquoted identifiers are stored upper case, so quoted ones must be too.
    pub folds_to_upper: bool,
    pub transactional_ddl: bool,
    /// Constraint names must be looked up and dropped before a column drop/alter.
    pub constraint_cleanup: bool,
    pub column_list: ColumnListStyle,
    pub alter: AlterStyle,
    /// Nullability can be changed without restating the column type.
    pub nullability_clause: bool,
    /// Defaults are constraints that cannot be set through the alter clause.
    pub default_as_constraint: bool,
    pub drop_index: DropIndexStyle,
    pub auto_increment: AutoIncrementStyle,
    pub boolean_literals: (&'static str, &'static str),
    pub table_options: Option<&'static str>,
}

const H2: Capabilities = Capabilities {
    quotes: ('"', '"'),
    folds_to_upper: true,
    transactional_ddl: false,
    constraint_cleanup: false,
    column_list: ColumnListStyle::PerStatement,
    alter: AlterStyle::AlterColumn,
    nullability_clause: true,
    default_as_constraint: false,
    drop_index: DropIndexStyle::IfExists,
    auto_increment: AutoIncrementStyle::Suffix("AUTO_INCREMENT (1,1)"),
    boolean_literals: ("true", "false"),
    table_options: None,
};

const MSSQL: Capabilities = Capabilities {
    quotes: ('[', ']'),
    folds_to_upper: false,
    transactional_ddl: true,
    constraint_cleanup: true,
    column_list: ColumnListStyle::CommaList,
    alter: AlterStyle::AlterColumn,
    nullability_clause: false,
    default_as_constraint: true,
    drop_index: DropIndexStyle::OnTable,
    auto_increment: AutoIncrementStyle::Suffix("IDENTITY (1,1)"),
    boolean_literals: ("1", "0"),
    table_options: None,
};

const MYSQL: Capabilities = Capabilities {
    quotes: ('`', '`'),
    folds_to_upper: false,
    transactional_ddl: false,
    constraint_cleanup: false,
    column_list: ColumnListStyle::RepeatedClause,
    alter: AlterStyle::ModifyColumn,
    nullability_clause: false,
    default_as_constraint: false,
    drop_index: DropIndexStyle::OnTable,
    auto_increment: AutoIncrementStyle::Suffix("AUTO_INCREMENT"),
    boolean_literals: ("1", "0"),
    table_options: Some("ENGINE=InnoDB CHARACTER SET utf8 COLLATE utf8_bin"),
};

const ORACLE: Capabilities = Capabilities {
    quotes: ('"', '"'),
    folds_to_upper: true,
    transactional_ddl: false,
    constraint_cleanup: false,
    column_list: ColumnListStyle::Parenthesized,
    alter: AlterStyle::SplitModify,
    nullability_clause: true,
    default_as_constraint: false,
    drop_index: DropIndexStyle::Plain,
    auto_increment: AutoIncrementStyle::SequenceTrigger,
    boolean_literals: ("1", "0"),
    table_options: None,
};

const POSTGRESQL: Capabilities = Capabilities {
    quotes: ('"', '"'),
    folds_to_upper: false,
    transactional_ddl: true,
    constraint_cleanup: false,
    column_list: ColumnListStyle::RepeatedClause,
    alter: AlterStyle::TypeClauses,
    nullability_clause: true,
    default_as_constraint: false,
    drop_index: DropIndexStyle::IfExists,
    auto_increment: AutoIncrementStyle::Serial,
    boolean_literals: ("true", "false"),
    table_options: None,
};

impl Dialect {
    pub const ALL: [Dialect; 5] = [
        Dialect::H2,
        Dialect::MsSql,
        Dialect::MySql,
        Dialect::Oracle,
        Dialect::PostgreSql,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Dialect::H2 => "h2",
            Dialect::MsSql => "mssql",
            Dialect::MySql => "mysql",
            Dialect::Oracle => "oracle",
            Dialect::PostgreSql => "postgresql",
        }
    }

    pub fn from_key(key: &str) -> Result<Self> {
        let key = key.trim();

        Self::ALL
            .into_iter()
            .find(|dialect| dialect.id().eq_ignore_ascii_case(key))
            .ok_or_else(|| Error::UnsupportedDialect(key.to_owned()))
    }

    /// Detects the dialect from a connection URL, with or without a `jdbc:` prefix.
    pub fn from_url(url: &str) -> Result<Self> {
        let trimmed = url.trim();
        let lower = trimmed.to_ascii_lowercase();
        let scheme = lower.strip_prefix("jdbc:").unwrap_or(&lower);

        let dialect = match scheme.split(':').next().unwrap_or_default() {
            "h2" => Dialect::H2,
            "sqlserver" | "mssql" => Dialect::MsSql,
            "mysql" => Dialect::MySql,
            "oracle" => Dialect::Oracle,
            "postgres" | "postgresql" => Dialect::PostgreSql,
            _ => return Err(Error::UnsupportedDialect(trimmed.to_owned())),
        };

        Ok(dialect)
    }

    pub fn capabilities(&self) -> &'static Capabilities {
        match self {
            Dialect::H2 => &H2,
            Dialect::MsSql => &MSSQL,
            Dialect::MySql => &MYSQL,
            Dialect::Oracle => &ORACLE,
            Dialect::PostgreSql => &POSTGRESQL,
        }
    }

    pub fn supports_transactional_ddl(&self) -> bool {
        self.capabilities().transactional_ddl
    }

    pub fn requires_constraint_cleanup(&self) -> bool {
        self.capabilities().constraint_cleanup
    }

    /// Whether dropping a column also drops the constraints that reference it.
    pub fn supports_cascading_column_drop(&self) -> bool {
        !self.capabilities().constraint_cleanup
    }

    /// Native type for a logical column type.
    pub fn type_name(&self, column_type: &ColumnType) -> String {
        match (self, column_type) {
            (Dialect::MsSql, ColumnType::Varchar { limit }) => format!("NVARCHAR ({limit})"),
            (Dialect::Oracle, ColumnType::Varchar { limit }) => {
                format!("VARCHAR2 ({limit} CHAR)")
            }
            (_, ColumnType::Varchar { limit }) => format!("VARCHAR ({limit})"),

            (Dialect::H2, ColumnType::Clob) => "CLOB(2147483647)".to_owned(),
            (Dialect::MsSql, ColumnType::Clob) => "NVARCHAR (MAX)".to_owned(),
            (Dialect::MySql, ColumnType::Clob) => "LONGTEXT".to_owned(),
            (Dialect::Oracle, ColumnType::Clob) => "CLOB".to_owned(),
            (Dialect::PostgreSql, ColumnType::Clob) => "TEXT".to_owned(),

            (Dialect::MsSql, ColumnType::Integer) => "INT".to_owned(),
            (Dialect::Oracle, ColumnType::Integer) => "NUMBER(38,0)".to_owned(),
            (_, ColumnType::Integer) => "INTEGER".to_owned(),

            (Dialect::Oracle, ColumnType::BigInteger) => "NUMBER (38)".to_owned(),
            (_, ColumnType::BigInteger) => "BIGINT".to_owned(),

            (Dialect::MsSql, ColumnType::Boolean) => "BIT".to_owned(),
            (Dialect::MySql, ColumnType::Boolean) => "TINYINT(1)".to_owned(),
            (Dialect::Oracle, ColumnType::Boolean) => "NUMBER(1)".to_owned(),
            (_, ColumnType::Boolean) => "BOOLEAN".to_owned(),

            (Dialect::MsSql | Dialect::MySql, ColumnType::Timestamp) => "DATETIME".to_owned(),
            (Dialect::Oracle, ColumnType::Timestamp) => "TIMESTAMP (6)".to_owned(),
            (_, ColumnType::Timestamp) => "TIMESTAMP".to_owned(),

            (Dialect::Oracle | Dialect::PostgreSql, ColumnType::Decimal { precision, scale }) => {
                format!("NUMERIC ({precision},{scale})")
            }
            (_, ColumnType::Decimal { precision, scale }) => {
                format!("DECIMAL ({precision},{scale})")
            }

            (Dialect::MsSql, ColumnType::Blob) => "VARBINARY(MAX)".to_owned(),
            (Dialect::MySql, ColumnType::Blob) => "LONGBLOB".to_owned(),
            (Dialect::PostgreSql, ColumnType::Blob) => "BYTEA".to_owned(),
            (_, ColumnType::Blob) => "BLOB".to_owned(),
        }
    }

    /// Always quotes `name`, doubling any closing quote character it contains.
    ///
    /// On dialects that fold unquoted names to upper case the quoted name is upper
    /// cased too, so it still refers to the column created without quotes.
    pub fn quote_identifier(&self, name: &str) -> String {
        let capabilities = self.capabilities();
        let (open, close) = capabilities.quotes;
        let name = if capabilities.folds_to_upper {
            name.to_uppercase()
        } else {
            name.to_owned()
        };
        let escaped = name.replace(close, &format!("{close}{close}"));

        format!("{open}{escaped}{close}")
    }

    /// Renders `name` bare when it is a plain identifier, quoted otherwise.
    pub fn identifier(&self, name: &str) -> String {
        if identifier::is_plain(name) {
            name.to_owned()
        } else {
            self.quote_identifier(name)
        }
    }

    pub fn default_literal(&self, value: &DefaultValue) -> String {
        match value {
            DefaultValue::Boolean(value) => {
                let (yes, no) = self.capabilities().boolean_literals;
                let literal = if *value { yes } else { no };
                literal.to_owned()
            }
            DefaultValue::Integer(value) => value.to_string(),
            DefaultValue::Text(value) => format!("'{}'", value.replace('\'', "''")),
            DefaultValue::CurrentTimestamp => "CURRENT_TIMESTAMP".to_owned(),
        }
    }

    /// Catalog query listing the constraints that reference `table.column`, for
    /// dialects that refuse to drop or alter a constrained column.
    ///
    /// The query returns a single text column of constraint names.
    pub fn constraint_lookup(&self, table: &str, column: &str) -> Option<String> {
        if !self.requires_constraint_cleanup() {
            return None;
        }

        let table = table.replace('\'', "''");
        let column = column.replace('\'', "''");

        Some(format!(
            "SELECT CONSTRAINT_NAME FROM INFORMATION_SCHEMA.CONSTRAINT_COLUMN_USAGE \
             WHERE TABLE_NAME = '{table}' AND COLUMN_NAME = '{column}' \
             UNION \
             SELECT dc.name FROM sys.default_constraints dc \
             INNER JOIN sys.columns c ON c.object_id = dc.parent_object_id AND c.column_id = dc.parent_column_id \
             WHERE OBJECT_NAME(dc.parent_object_id) = '{table}' AND c.name = '{column}'"
        ))
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_key(s)
    }
}
