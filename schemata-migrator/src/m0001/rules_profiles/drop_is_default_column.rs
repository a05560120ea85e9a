use std::sync::Arc;

use sea_query::Iden;

use schemata::{Catalog, Dialect, MigrationStep, SchemaChange, StepFactory};

use crate::RulesProfiles;

#[derive(Default)]
pub struct Operation {
    pub catalog: Option<Arc<dyn Catalog>>,
}

impl StepFactory for Operation {
    fn step(&self, dialect: Dialect) -> schemata::Result<Box<dyn MigrationStep>> {
        let mut change = SchemaChange::on(dialect, RulesProfiles::Table.to_string())
            .description("drop rules_profiles.is_default")
            .drop_columns([RulesProfiles::IsDefault.to_string()]);

        if let Some(catalog) = &self.catalog {
            change = change.catalog(catalog.clone());
        }

        Ok(Box::new(change.build()?))
    }
}
