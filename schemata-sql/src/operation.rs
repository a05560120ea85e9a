use schemata::{Dialect, Error, StepFactory};
use sqlx::Database;

use crate::sql::SqlxContext;

/// A sqlx database that schemata knows the dialect of.
pub trait SqlxDialect: Database {
    const DIALECT: Dialect;
}

#[cfg(feature = "mysql")]
impl SqlxDialect for sqlx::MySql {
    const DIALECT: Dialect = Dialect::MySql;
}

#[cfg(feature = "postgres")]
impl SqlxDialect for sqlx::Postgres {
    const DIALECT: Dialect = Dialect::PostgreSql;
}

/// Runs the step of a [`StepFactory`] as a [`sqlx_migrator::Operation`].
///
/// Steps are irreversible: `down` always fails.
pub struct SqlxStep<S>(pub S);

#[async_trait::async_trait]
impl<DB, S> sqlx_migrator::Operation<DB> for SqlxStep<S>
where
    DB: SqlxDialect,
    S: StepFactory,
    for<'c> &'c mut DB::Connection: sqlx::Executor<'c, Database = DB>,
{
    async fn up(&self, connection: &mut DB::Connection) -> Result<(), sqlx_migrator::Error> {
        let step = self.0.step(DB::DIALECT).map_err(into_sqlx_error)?;
        let mut context = SqlxContext::<DB>::new(connection);

        step.execute(&mut context).await.map_err(into_sqlx_error)?;

        Ok(())
    }

    async fn down(&self, _connection: &mut DB::Connection) -> Result<(), sqlx_migrator::Error> {
        let step = self.0.step(DB::DIALECT).map_err(into_sqlx_error)?;

        Err(sqlx::Error::Configuration(
            format!("`{}` cannot be reverted", step.description()).into(),
        )
        .into())
    }
}

/// Maps a schemata error to the sqlx error sqlx_migrator reports.
///
/// A statement rejected by the server comes back as the original database error.
pub fn into_sqlx_error(err: Error) -> sqlx::Error {
    match err {
        Error::Execution { statement, source } => match source.downcast::<sqlx::Error>() {
            Ok(err) => err,
            Err(source) => sqlx::Error::Protocol(format!("{statement}: {source}")),
        },
        err => sqlx::Error::Configuration(Box::new(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_stay_configuration() {
        let err = into_sqlx_error(Error::invalid("varchar without limit"));
        assert!(matches!(err, sqlx::Error::Configuration(_)));
        assert!(err.to_string().contains("varchar without limit"));
    }

    #[test]
    fn database_errors_are_recovered() {
        let err = into_sqlx_error(Error::execution(
            "DROP TABLE missing",
            sqlx::Error::RowNotFound,
        ));
        assert!(matches!(err, sqlx::Error::RowNotFound));

        let err = into_sqlx_error(Error::execution(
            "DROP TABLE missing",
            anyhow::anyhow!("unreachable"),
        ));
        assert!(matches!(
            err,
            sqlx::Error::Protocol(message) if message.contains("DROP TABLE missing")
        ));
    }

    #[cfg(feature = "sqlite")]
    mod sqlite {
        use schemata::{MigrationStep, SchemaChange};
        use sqlx::{Connection, SqliteConnection};
        use sqlx_migrator::Operation;

        use super::*;

        impl SqlxDialect for sqlx::Sqlite {
            const DIALECT: Dialect = Dialect::H2;
        }

        struct DropName;

        impl StepFactory for DropName {
            fn step(&self, dialect: Dialect) -> schemata::Result<Box<dyn MigrationStep>> {
                let step = SchemaChange::on(dialect, "rules_profiles")
                    .description("drop rules_profiles.name")
                    .drop_columns(["name"])
                    .build()?;

                Ok(Box::new(step))
            }
        }

        async fn connect() -> anyhow::Result<SqliteConnection> {
            let mut conn = SqliteConnection::connect("sqlite::memory:").await?;
            sqlx::raw_sql("CREATE TABLE rules_profiles (id INTEGER NOT NULL, name VARCHAR (100))")
                .execute(&mut conn)
                .await?;

            Ok(conn)
        }

        #[tokio::test]
        async fn up_runs_the_step() -> anyhow::Result<()> {
            let mut conn = connect().await?;

            Operation::<sqlx::Sqlite>::up(&SqlxStep(DropName), &mut conn).await?;

            let columns: Vec<String> =
                sqlx::query_scalar("SELECT name FROM pragma_table_info('rules_profiles')")
                    .fetch_all(&mut conn)
                    .await?;
            assert_eq!(columns, ["id"]);

            Ok(())
        }

        #[tokio::test]
        async fn down_cannot_revert() -> anyhow::Result<()> {
            let mut conn = connect().await?;

            let err = Operation::<sqlx::Sqlite>::down(&SqlxStep(DropName), &mut conn)
                .await
                .unwrap_err();
            let message = err.to_string();

            assert!(message.contains("cannot be reverted"), "{message}");
            assert!(message.contains("drop rules_profiles.name"), "{message}");

            let columns: Vec<String> =
                sqlx::query_scalar("SELECT name FROM pragma_table_info('rules_profiles')")
                    .fetch_all(&mut conn)
                    .await?;
            assert_eq!(columns, ["id", "name"]);

            Ok(())
        }
    }
}
