use crate::builder::ensure_distinct;
use crate::dialect::{Dialect, DropIndexStyle};
use crate::error::Result;
use crate::identifier;
use crate::statement::Statement;

/// Name, uniqueness and column order of an index.
///
/// Kept by a step that drops an index so it can recreate it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexSpec {
    table: String,
    name: String,
    unique: bool,
    columns: Vec<String>,
}

impl IndexSpec {
    pub fn new(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(name.into());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub(crate) fn validate(&self) -> Result<()> {
        identifier::validate_table_name(&self.table)?;
        identifier::validate_index_name(&self.name)?;
        for column in &self.columns {
            identifier::validate_column_name(column)?;
        }
        ensure_distinct("index column", self.columns.iter().map(String::as_str))
    }
}

/// `CREATE [UNIQUE] INDEX name ON table (columns)`
///
/// ```
/// use schemata::{builder::CreateIndexBuilder, Dialect};
///
/// let statement = CreateIndexBuilder::new(Dialect::MySql)
///     .table("events")
///     .name("events_component_uuid")
///     .column("component_uuid")
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     statement.sql(),
///     ["CREATE INDEX events_component_uuid ON events (component_uuid)"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CreateIndexBuilder {
    dialect: Dialect,
    spec: IndexSpec,
}

impl CreateIndexBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            spec: IndexSpec::default(),
        }
    }

    pub fn from_spec(dialect: Dialect, spec: IndexSpec) -> Self {
        Self { dialect, spec }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.spec.table = table.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.spec.name = name.into();
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.spec.unique = unique;
        self
    }

    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.spec.columns.push(name.into());
        self
    }

    pub fn spec(&self) -> &IndexSpec {
        &self.spec
    }

    pub fn build(&self) -> Result<Statement> {
        self.spec.validate()?;

        let dialect = self.dialect;
        let columns: Vec<String> = self
            .spec
            .columns
            .iter()
            .map(|column| dialect.identifier(column))
            .collect();

        Ok(Statement::single(format!(
            "CREATE {}INDEX {} ON {} ({})",
            if self.spec.unique { "UNIQUE " } else { "" },
            dialect.identifier(&self.spec.name),
            dialect.identifier(&self.spec.table),
            columns.join(", ")
        )))
    }
}

#[derive(Debug, Clone)]
pub struct DropIndexBuilder {
    dialect: Dialect,
    table: String,
    name: String,
}

impl DropIndexBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            table: String::new(),
            name: String::new(),
        }
    }

    pub fn from_spec(dialect: Dialect, spec: &IndexSpec) -> Self {
        Self::new(dialect).table(spec.table()).name(spec.name())
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn build(&self) -> Result<Statement> {
        identifier::validate_table_name(&self.table)?;
        identifier::validate_index_name(&self.name)?;

        let dialect = self.dialect;
        let name = dialect.identifier(&self.name);

        let sql = match dialect.capabilities().drop_index {
            DropIndexStyle::IfExists => format!("DROP INDEX IF EXISTS {name}"),
            DropIndexStyle::OnTable => {
                format!("DROP INDEX {name} ON {}", dialect.identifier(&self.table))
            }
            DropIndexStyle::Plain => format!("DROP INDEX {name}"),
        };

        Ok(Statement::single(sql))
    }
}
