//! Removes the `is_default` flag of rules profiles and makes every event reference
//! its component.

mod events;
mod rules_profiles;

use std::sync::Arc;

use schemata::{Catalog, StepFactory};
use schemata_sql::SqlxStep;
use sqlx_migrator::vec_box;

/// ## Changes
///
/// 1. **Drops `rules_profiles.is_default`** - On SQL Server the generated default
///    constraint of the column is discovered and dropped first.
/// 2. **Makes `events.component_uuid` NOT NULL** - The `events_component_uuid` index
///    is dropped before the change and recreated after it.
pub struct M0001;

impl M0001 {
    /// Steps of this migration, in order.
    ///
    /// `catalog` is only consulted on dialects that require constraint cleanup.
    pub fn steps(catalog: Option<Arc<dyn Catalog>>) -> Vec<Box<dyn StepFactory>> {
        vec![
            Box::new(rules_profiles::drop_is_default_column::Operation { catalog }),
            Box::new(events::make_component_uuid_not_nullable::Operation),
        ]
    }
}

#[cfg(feature = "mysql")]
sqlx_migrator::mysql_migration!(
    M0001,
    "main",
    "m0001",
    vec_box![],
    vec_box![
        SqlxStep(rules_profiles::drop_is_default_column::Operation::default()),
        SqlxStep(events::make_component_uuid_not_nullable::Operation),
    ]
);

#[cfg(feature = "postgres")]
sqlx_migrator::postgres_migration!(
    M0001,
    "main",
    "m0001",
    vec_box![],
    vec_box![
        SqlxStep(rules_profiles::drop_is_default_column::Operation::default()),
        SqlxStep(events::make_component_uuid_not_nullable::Operation),
    ]
);
