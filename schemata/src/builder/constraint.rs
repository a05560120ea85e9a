use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::identifier;
use crate::statement::Statement;

/// `ALTER TABLE t DROP CONSTRAINT name`
///
/// The name usually comes from the server catalog (generated default constraint
/// names such as `DF__rules_pro__is_de__3B75D760`), so it is rendered but not
/// validated against the identifier rules.
#[derive(Debug, Clone)]
pub struct DropConstraintBuilder {
    dialect: Dialect,
    table: String,
    name: String,
}

impl DropConstraintBuilder {
    pub fn new(dialect: Dialect, table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            dialect,
            table: table.into(),
            name: name.into(),
        }
    }

    pub fn build(&self) -> Result<Statement> {
        identifier::validate_table_name(&self.table)?;

        if self.name.trim().is_empty() {
            return Err(Error::invalid(format!(
                "constraint name on table `{}` cannot be empty",
                self.table
            )));
        }

        Ok(Statement::single(format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            self.dialect.identifier(&self.table),
            self.dialect.identifier(&self.name)
        )))
    }
}
