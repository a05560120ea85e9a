use sea_query::Iden;

use schemata::{
    builder::IndexSpec, ColumnDef, Dialect, MigrationStep, SchemaChange, StepFactory,
    UUID_VARCHAR_SIZE,
};

use crate::Events;

const INDEX_NAME: &str = "events_component_uuid";

pub struct Operation;

impl StepFactory for Operation {
    fn step(&self, dialect: Dialect) -> schemata::Result<Box<dyn MigrationStep>> {
        let table = Events::Table.to_string();
        let column = Events::ComponentUuid.to_string();

        let step = SchemaChange::on(dialect, &table)
            .description("make events.component_uuid not nullable")
            .preserve_index(IndexSpec::new(&table, INDEX_NAME).column(&column))
            .alter_columns([ColumnDef::varchar(column)
                .limit(UUID_VARCHAR_SIZE)
                .nullable(false)
                .build()?])
            .build()?;

        Ok(Box::new(step))
    }
}
