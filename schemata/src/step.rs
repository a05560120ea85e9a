//! Migration steps: one schema change, applied once, in a fixed phase order.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::builder::{
    AddColumnsBuilder, AlterColumnsBuilder, CreateIndexBuilder, DropColumnsBuilder,
    DropConstraintBuilder, DropIndexBuilder, IndexSpec,
};
use crate::column::ColumnDef;
use crate::context::{Catalog, Context};
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::identifier;
use crate::statement::Statement;

/// Phases a step goes through, in order.
///
/// `Cleanup` only happens on dialects that require constraint cleanup and when the
/// step names cleanup columns. `IndexRebuild` only happens when indexes were
/// dropped. A failure stops the step in its current phase; nothing is rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Cleanup,
    StructuralChange,
    IndexRebuild,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::NotStarted => "not-started",
            Phase::Cleanup => "cleanup",
            Phase::StructuralChange => "structural-change",
            Phase::IndexRebuild => "index-rebuild",
            Phase::Done => "done",
        };

        f.write_str(name)
    }
}

/// A single schema change, executed once by an external runner that keeps track of
/// what was already applied.
#[async_trait]
pub trait MigrationStep: Send + Sync {
    fn description(&self) -> String;

    /// Submits the statements of the step to `context`, propagating the first failure
    /// unchanged.
    async fn execute(&self, context: &mut dyn Context) -> Result<()>;
}

/// A migration definition that produces its step once the dialect is known.
pub trait StepFactory: Send + Sync {
    fn step(&self, dialect: Dialect) -> Result<Box<dyn MigrationStep>>;
}

/// Generic [`MigrationStep`] on one table: cleanup, structural change, index rebuild.
///
/// ```
/// use schemata::{Dialect, DryRun, MigrationStep, SchemaChange};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> schemata::Result<()> {
/// let step = SchemaChange::on(Dialect::PostgreSql, "rules_profiles")
///     .drop_columns(["is_default"])
///     .build()?;
///
/// let mut dry_run = DryRun::new();
/// step.execute(&mut dry_run).await?;
///
/// assert_eq!(dry_run.sql(), ["ALTER TABLE rules_profiles DROP COLUMN is_default"]);
/// # Ok(())
/// # }
/// ```
pub struct SchemaChange {
    dialect: Dialect,
    table: String,
    description: String,
    catalog: Option<Arc<dyn Catalog>>,
    cleanup_columns: Vec<String>,
    drop_indexes: Vec<Statement>,
    changes: Vec<Statement>,
    create_indexes: Vec<Statement>,
}

impl SchemaChange {
    pub fn on(dialect: Dialect, table: impl Into<String>) -> SchemaChangeBuilder {
        let table = table.into();

        SchemaChangeBuilder {
            dialect,
            description: format!("alter table {table}"),
            table,
            catalog: None,
            cleanup_columns: Vec::new(),
            indexes: Vec::new(),
            changes: Vec::new(),
            error: None,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Phases this step will go through on its dialect.
    pub fn planned_phases(&self) -> Vec<Phase> {
        let mut phases = vec![Phase::NotStarted];

        if !self.cleanup_columns.is_empty() {
            phases.push(Phase::Cleanup);
        }

        phases.push(Phase::StructuralChange);

        if !self.create_indexes.is_empty() {
            phases.push(Phase::IndexRebuild);
        }

        phases.push(Phase::Done);
        phases
    }

    /// Every lookup completes before the first DDL statement is issued.
    async fn discover_constraints(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();

        let Some(catalog) = &self.catalog else {
            return Ok(names);
        };

        for column in &self.cleanup_columns {
            let Some(sql) = self.dialect.constraint_lookup(&self.table, column) else {
                continue;
            };

            let found = catalog
                .lookup(&sql)
                .await
                .map_err(|source| Error::discovery(&self.table, column, source))?;

            debug!(table = %self.table, %column, constraints = ?found, "constraints discovered");

            for name in found {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }

        Ok(names)
    }

    async fn run(
        &self,
        context: &mut dyn Context,
        phase: Phase,
        statements: &[Statement],
    ) -> Result<()> {
        if statements.is_empty() {
            return Ok(());
        }

        debug!(table = %self.table, %phase, "entering phase");

        for statement in statements {
            for sql in statement {
                debug!(dialect = %self.dialect, %sql, "executing");
            }

            context.execute(statement.clone()).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl MigrationStep for SchemaChange {
    fn description(&self) -> String {
        self.description.clone()
    }

    async fn execute(&self, context: &mut dyn Context) -> Result<()> {
        info!(dialect = %self.dialect, table = %self.table, "{} started", self.description);

        let constraints = self.discover_constraints().await?;
        let cleanup = constraints
            .iter()
            .map(|name| DropConstraintBuilder::new(self.dialect, &self.table, name).build())
            .collect::<Result<Vec<_>>>()?;

        let total: usize = cleanup
            .iter()
            .chain(&self.drop_indexes)
            .chain(&self.changes)
            .chain(&self.create_indexes)
            .map(Statement::len)
            .sum();

        if total > 1 && !self.dialect.supports_transactional_ddl() {
            warn!(
                dialect = %self.dialect,
                table = %self.table,
                statements = total,
                "{} has no transactional DDL, a failure leaves the change partially applied",
                self.dialect
            );
        }

        self.run(context, Phase::Cleanup, &cleanup).await?;

        let structural: Vec<Statement> = self
            .drop_indexes
            .iter()
            .chain(&self.changes)
            .cloned()
            .collect();
        self.run(context, Phase::StructuralChange, &structural).await?;

        self.run(context, Phase::IndexRebuild, &self.create_indexes).await?;

        info!(
            dialect = %self.dialect,
            table = %self.table,
            statements = total,
            "{} done",
            self.description
        );

        Ok(())
    }
}

/// Collects the changes of a [`SchemaChange`]. The first invalid change is reported
/// by [`SchemaChangeBuilder::build`].
pub struct SchemaChangeBuilder {
    dialect: Dialect,
    table: String,
    description: String,
    catalog: Option<Arc<dyn Catalog>>,
    cleanup_columns: Vec<String>,
    indexes: Vec<IndexSpec>,
    changes: Vec<Statement>,
    error: Option<Error>,
}

impl SchemaChangeBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Catalog used to discover constraint names. Required when the dialect needs
    /// constraint cleanup and the step has cleanup columns.
    pub fn catalog(mut self, catalog: Arc<dyn Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Drops `columns`, dropping their constraints first where the dialect requires it.
    pub fn drop_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let built = DropColumnsBuilder::new(self.dialect, &self.table)
            .columns(columns.iter().cloned())
            .build();

        if self.push(built) {
            for column in columns {
                self = self.cleanup_constraints(column);
            }
        }

        self
    }

    pub fn alter_columns(mut self, columns: impl IntoIterator<Item = ColumnDef>) -> Self {
        let builder = columns.into_iter().fold(
            AlterColumnsBuilder::new(self.dialect, &self.table),
            AlterColumnsBuilder::update_column,
        );

        self.push(builder.build());
        self
    }

    pub fn add_columns(mut self, columns: impl IntoIterator<Item = ColumnDef>) -> Self {
        let builder = columns.into_iter().fold(
            AddColumnsBuilder::new(self.dialect, &self.table),
            AddColumnsBuilder::add_column,
        );

        self.push(builder.build());
        self
    }

    /// Drops `index` before the structural change and recreates it afterwards with
    /// the same name, uniqueness and column order.
    pub fn preserve_index(mut self, index: IndexSpec) -> Self {
        self.indexes.push(index);
        self
    }

    /// Discovers and drops the constraints on `column` before the structural change,
    /// on dialects that require it. No-op elsewhere.
    pub fn cleanup_constraints(mut self, column: impl Into<String>) -> Self {
        let column = column.into();

        if let Err(err) = identifier::validate_column_name(&column) {
            self.error.get_or_insert(err);
            return self;
        }

        if self.dialect.requires_constraint_cleanup() && !self.cleanup_columns.contains(&column)
        {
            self.cleanup_columns.push(column);
        }

        self
    }

    /// Adds an already built statement to the structural change.
    pub fn statement(mut self, statement: Statement) -> Self {
        self.changes.push(statement);
        self
    }

    pub fn build(self) -> Result<SchemaChange> {
        if let Some(err) = self.error {
            return Err(err);
        }

        identifier::validate_table_name(&self.table)?;

        if self.changes.is_empty() && self.indexes.is_empty() {
            return Err(Error::invalid(format!(
                "schema change on `{}` has nothing to do",
                self.table
            )));
        }

        if !self.cleanup_columns.is_empty() && self.catalog.is_none() {
            return Err(Error::invalid(format!(
                "{} requires constraint cleanup on `{}` but no catalog was given",
                self.dialect, self.table
            )));
        }

        let mut drop_indexes = Vec::with_capacity(self.indexes.len());
        let mut create_indexes = Vec::with_capacity(self.indexes.len());

        for index in &self.indexes {
            drop_indexes.push(DropIndexBuilder::from_spec(self.dialect, index).build()?);
            create_indexes
                .push(CreateIndexBuilder::from_spec(self.dialect, index.clone()).build()?);
        }

        Ok(SchemaChange {
            dialect: self.dialect,
            table: self.table,
            description: self.description,
            catalog: self.catalog,
            cleanup_columns: self.cleanup_columns,
            drop_indexes,
            changes: self.changes,
            create_indexes,
        })
    }

    fn push(&mut self, built: Result<Statement>) -> bool {
        match built {
            Ok(statement) => {
                self.changes.push(statement);
                true
            }
            Err(err) => {
                self.error.get_or_insert(err);
                false
            }
        }
    }
}
