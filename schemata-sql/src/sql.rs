use async_trait::async_trait;
use schemata::{Catalog, Context, Error, Statement};
use sqlx::{Database, Pool, Row};
use tracing::debug;

/// Executes statements on a borrowed sqlx connection.
///
/// The caller owns the connection and any transaction open on it.
pub struct SqlxContext<'c, DB: Database> {
    connection: &'c mut DB::Connection,
}

impl<'c, DB: Database> SqlxContext<'c, DB> {
    pub fn new(connection: &'c mut DB::Connection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl<'c, DB> Context for SqlxContext<'c, DB>
where
    DB: Database,
    for<'e> &'e mut DB::Connection: sqlx::Executor<'e, Database = DB>,
{
    async fn execute(&mut self, statement: Statement) -> schemata::Result<()> {
        for sql in statement {
            debug!(db = DB::NAME, %sql, "execute");

            let result = sqlx::raw_sql(&sql).execute(&mut *self.connection).await;

            if let Err(err) = result {
                return Err(Error::execution(sql, err));
            }
        }

        Ok(())
    }
}

/// Looks constraint names up through a pool.
///
/// Each lookup acquires its own connection and releases it before returning, so no
/// catalog connection is held while DDL runs.
pub struct SqlxCatalog<DB: Database> {
    pool: Pool<DB>,
}

impl<DB: Database> SqlxCatalog<DB> {
    pub fn new(pool: Pool<DB>) -> Self {
        Self { pool }
    }
}

impl<DB: Database> From<Pool<DB>> for SqlxCatalog<DB> {
    fn from(pool: Pool<DB>) -> Self {
        Self::new(pool)
    }
}

impl<DB: Database> Clone for SqlxCatalog<DB> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

#[async_trait]
impl<DB> Catalog for SqlxCatalog<DB>
where
    DB: Database,
    for<'c> &'c mut DB::Connection: sqlx::Executor<'c, Database = DB>,
    String: for<'r> sqlx::Decode<'r, DB> + sqlx::Type<DB>,
    usize: sqlx::ColumnIndex<DB::Row>,
{
    async fn lookup(&self, sql: &str) -> anyhow::Result<Vec<String>> {
        let rows = {
            let mut connection = self.pool.acquire().await?;
            sqlx::raw_sql(sql).fetch_all(&mut *connection).await?
        };

        let names = rows
            .iter()
            .map(|row| row.try_get::<String, usize>(0))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(db = DB::NAME, ?names, "catalog lookup");

        Ok(names)
    }
}
