use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::statement::Statement;

/// Sink the statements of a step are written to.
///
/// Owned by the caller, which decides on the connection and on any surrounding
/// transaction.
#[async_trait]
pub trait Context: Send {
    /// Runs every SQL string of `statement` in order, stopping at the first rejected
    /// one with [`Error::Execution`](crate::Error::Execution).
    async fn execute(&mut self, statement: Statement) -> Result<()>;
}

/// Read access to the server catalog, used to discover generated constraint names.
///
/// Every lookup runs a single-column query on a short-lived connection that is
/// released before the step issues any DDL.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn lookup(&self, sql: &str) -> anyhow::Result<Vec<String>>;
}

/// Records statements without executing them.
#[derive(Debug, Clone, Default)]
pub struct DryRun {
    sql: Vec<String>,
}

impl DryRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sql(&self) -> &[String] {
        &self.sql
    }

    pub fn into_sql(self) -> Vec<String> {
        self.sql
    }
}

#[async_trait]
impl Context for DryRun {
    async fn execute(&mut self, statement: Statement) -> Result<()> {
        for sql in statement {
            debug!(%sql, "dry run");
            self.sql.push(sql);
        }

        Ok(())
    }
}
