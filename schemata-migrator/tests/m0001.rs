use std::sync::Arc;

use schemata::{Catalog, Dialect, DryRun, MigrationStep, StepFactory};
use schemata_migrator::M0001;

struct DefaultConstraint;

#[async_trait::async_trait]
impl Catalog for DefaultConstraint {
    async fn lookup(&self, sql: &str) -> anyhow::Result<Vec<String>> {
        anyhow::ensure!(sql.contains("'is_default'"), "unexpected lookup {sql}");

        Ok(vec!["DF__rules_pro__is_de__xyz".to_owned()])
    }
}

async fn dry_run(dialect: Dialect) -> anyhow::Result<Vec<String>> {
    let mut context = DryRun::new();

    for factory in M0001::steps(Some(Arc::new(DefaultConstraint))) {
        factory.step(dialect)?.execute(&mut context).await?;
    }

    Ok(context.into_sql())
}

#[tokio::test]
async fn m0001_mssql() -> anyhow::Result<()> {
    assert_eq!(
        dry_run(Dialect::MsSql).await?,
        [
            "ALTER TABLE rules_profiles DROP CONSTRAINT DF__rules_pro__is_de__xyz",
            "ALTER TABLE rules_profiles DROP COLUMN is_default",
            "DROP INDEX events_component_uuid ON events",
            "ALTER TABLE events ALTER COLUMN component_uuid NVARCHAR (50) NOT NULL",
            "CREATE INDEX events_component_uuid ON events (component_uuid)",
        ]
    );

    Ok(())
}

#[tokio::test]
async fn m0001_postgresql() -> anyhow::Result<()> {
    assert_eq!(
        dry_run(Dialect::PostgreSql).await?,
        [
            "ALTER TABLE rules_profiles DROP COLUMN is_default",
            "DROP INDEX IF EXISTS events_component_uuid",
            "ALTER TABLE events ALTER COLUMN component_uuid TYPE VARCHAR (50), \
             ALTER COLUMN component_uuid SET NOT NULL",
            "CREATE INDEX events_component_uuid ON events (component_uuid)",
        ]
    );

    Ok(())
}

#[tokio::test]
async fn m0001_oracle() -> anyhow::Result<()> {
    assert_eq!(
        dry_run(Dialect::Oracle).await?,
        [
            "ALTER TABLE rules_profiles DROP COLUMN is_default",
            "DROP INDEX events_component_uuid",
            "ALTER TABLE events MODIFY (component_uuid VARCHAR2 (50 CHAR))",
            "ALTER TABLE events MODIFY (component_uuid NOT NULL)",
            "CREATE INDEX events_component_uuid ON events (component_uuid)",
        ]
    );

    Ok(())
}

#[tokio::test]
async fn m0001_without_catalog_fails_on_mssql_only() -> anyhow::Result<()> {
    for dialect in Dialect::ALL {
        let result = M0001::steps(None)[0].step(dialect);

        assert_eq!(result.is_err(), dialect == Dialect::MsSql, "{dialect}");
    }

    Ok(())
}

#[test]
fn migrator_registers_m0001() -> anyhow::Result<()> {
    schemata_migrator::new::<sqlx::Postgres>()?;
    schemata_migrator::new::<sqlx::MySql>()?;

    Ok(())
}
