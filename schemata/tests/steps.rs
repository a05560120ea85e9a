mod common;

use common::{Entry, FakeCatalog, Journal, RecordingContext};
use schemata::{
    builder::IndexSpec, ColumnDef, Dialect, DryRun, Error, MigrationStep, Phase, SchemaChange,
};

const DEFAULT_CONSTRAINT: &str = "DF__rules_pro__is_de__xyz";

fn drop_is_default(dialect: Dialect, journal: &Journal) -> schemata::Result<SchemaChange> {
    SchemaChange::on(dialect, "rules_profiles")
        .catalog(FakeCatalog::returning(journal, &[DEFAULT_CONSTRAINT]))
        .drop_columns(["is_default"])
        .build()
}

fn component_uuid_not_null(dialect: Dialect) -> schemata::Result<SchemaChange> {
    let column = ColumnDef::varchar("component_uuid")
        .limit(50)
        .nullable(false)
        .build()?;

    SchemaChange::on(dialect, "events")
        .preserve_index(IndexSpec::new("events", "events_component_uuid").column("component_uuid"))
        .alter_columns([column])
        .build()
}

#[tokio::test]
async fn drop_default_column_on_mssql() -> anyhow::Result<()> {
    let journal = Journal::default();
    let step = drop_is_default(Dialect::MsSql, &journal)?;

    step.execute(&mut RecordingContext::new(&journal)).await?;

    assert_eq!(
        journal.executed(),
        [
            "ALTER TABLE rules_profiles DROP CONSTRAINT DF__rules_pro__is_de__xyz",
            "ALTER TABLE rules_profiles DROP COLUMN is_default",
        ]
    );

    let entries = journal.entries();
    assert!(matches!(&entries[0], Entry::Lookup(sql) if sql.contains("CONSTRAINT_COLUMN_USAGE")));
    assert_eq!(entries.len(), 3);

    Ok(())
}

#[tokio::test]
async fn drop_default_column_elsewhere() -> anyhow::Result<()> {
    for dialect in [Dialect::H2, Dialect::MySql, Dialect::Oracle, Dialect::PostgreSql] {
        let journal = Journal::default();
        let step = drop_is_default(dialect, &journal)?;

        step.execute(&mut RecordingContext::new(&journal)).await?;

        assert_eq!(
            journal.entries(),
            [Entry::Execute(
                "ALTER TABLE rules_profiles DROP COLUMN is_default".to_owned()
            )],
            "{dialect}"
        );
    }

    Ok(())
}

#[tokio::test]
async fn discovery_failure_aborts_before_any_ddl() -> anyhow::Result<()> {
    let journal = Journal::default();
    let step = SchemaChange::on(Dialect::MsSql, "rules_profiles")
        .catalog(FakeCatalog::failing(&journal))
        .drop_columns(["is_default"])
        .build()?;

    let err = step
        .execute(&mut RecordingContext::new(&journal))
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        Error::Discovery { table, column, .. } if table == "rules_profiles" && column == "is_default"
    ));
    assert!(journal.executed().is_empty());

    Ok(())
}

#[tokio::test]
async fn execution_failure_is_propagated_unchanged() -> anyhow::Result<()> {
    let journal = Journal::default();
    let step = drop_is_default(Dialect::MsSql, &journal)?;

    let err = step
        .execute(&mut RecordingContext::rejecting(&journal, "DROP CONSTRAINT"))
        .await
        .unwrap_err();

    match err {
        Error::Execution { statement, source } => {
            assert_eq!(
                statement,
                "ALTER TABLE rules_profiles DROP CONSTRAINT DF__rules_pro__is_de__xyz"
            );
            assert_eq!(
                source.to_string(),
                "Cannot find the object because it does not exist"
            );
        }
        other => panic!("unexpected error {other:?}"),
    }

    // no rollback, nothing after the failure
    assert!(journal.executed().is_empty());

    Ok(())
}

#[tokio::test]
async fn make_component_uuid_not_nullable() -> anyhow::Result<()> {
    let expected = [
        (
            Dialect::H2,
            vec![
                "DROP INDEX IF EXISTS events_component_uuid",
                "ALTER TABLE events ALTER COLUMN component_uuid VARCHAR (50) NOT NULL",
                "CREATE INDEX events_component_uuid ON events (component_uuid)",
            ],
        ),
        (
            Dialect::MsSql,
            vec![
                "DROP INDEX events_component_uuid ON events",
                "ALTER TABLE events ALTER COLUMN component_uuid NVARCHAR (50) NOT NULL",
                "CREATE INDEX events_component_uuid ON events (component_uuid)",
            ],
        ),
        (
            Dialect::MySql,
            vec![
                "DROP INDEX events_component_uuid ON events",
                "ALTER TABLE events MODIFY COLUMN component_uuid VARCHAR (50) NOT NULL",
                "CREATE INDEX events_component_uuid ON events (component_uuid)",
            ],
        ),
        (
            Dialect::Oracle,
            vec![
                "DROP INDEX events_component_uuid",
                "ALTER TABLE events MODIFY (component_uuid VARCHAR2 (50 CHAR))",
                "ALTER TABLE events MODIFY (component_uuid NOT NULL)",
                "CREATE INDEX events_component_uuid ON events (component_uuid)",
            ],
        ),
        (
            Dialect::PostgreSql,
            vec![
                "DROP INDEX IF EXISTS events_component_uuid",
                "ALTER TABLE events ALTER COLUMN component_uuid TYPE VARCHAR (50), \
                 ALTER COLUMN component_uuid SET NOT NULL",
                "CREATE INDEX events_component_uuid ON events (component_uuid)",
            ],
        ),
    ];

    for (dialect, sql) in expected {
        let step = component_uuid_not_null(dialect)?;
        assert_eq!(
            step.planned_phases(),
            [
                Phase::NotStarted,
                Phase::StructuralChange,
                Phase::IndexRebuild,
                Phase::Done
            ]
        );

        let mut dry_run = DryRun::new();
        step.execute(&mut dry_run).await?;

        assert_eq!(dry_run.sql(), sql, "{dialect}");
    }

    Ok(())
}

#[tokio::test]
async fn preserved_index_is_recreated_identically() -> anyhow::Result<()> {
    let index = IndexSpec::new("issues", "issues_project_kee")
        .unique(true)
        .column("project_uuid")
        .column("kee");

    for dialect in Dialect::ALL {
        let step = SchemaChange::on(dialect, "issues")
            .preserve_index(index.clone())
            .drop_columns(["locations"])
            .catalog(FakeCatalog::returning(&Journal::default(), &[]))
            .build()?;

        let mut dry_run = DryRun::new();
        step.execute(&mut dry_run).await?;

        let sql = dry_run.into_sql();
        assert!(sql[0].starts_with("DROP INDEX"), "{dialect}");
        assert!(sql[0].contains("issues_project_kee"), "{dialect}");
        assert_eq!(
            sql.last().map(String::as_str),
            Some("CREATE UNIQUE INDEX issues_project_kee ON issues (project_uuid, kee)"),
            "{dialect}"
        );
    }

    Ok(())
}

#[tokio::test]
#[tracing_test::traced_test]
async fn warns_without_transactional_ddl() -> anyhow::Result<()> {
    let step = component_uuid_not_null(Dialect::MySql)?;
    step.execute(&mut DryRun::new()).await?;

    assert!(logs_contain("mysql has no transactional DDL"));
    assert!(logs_contain("alter table events done"));

    Ok(())
}

#[tokio::test]
#[tracing_test::traced_test]
async fn no_warning_with_transactional_ddl() -> anyhow::Result<()> {
    let step = component_uuid_not_null(Dialect::PostgreSql)?;
    step.execute(&mut DryRun::new()).await?;

    assert!(!logs_contain("has no transactional DDL"));
    assert!(logs_contain("entering phase"));

    Ok(())
}
