//! Schema migrations built on schemata steps.
//!
//! Each migration is a list of [`schemata::StepFactory`] definitions wrapped in
//! [`SqlxStep`](schemata_sql::SqlxStep) so that [`sqlx_migrator`] can run them and
//! record what was applied. The statements themselves come from the dialect of the
//! connection.
//!
//! # Features
//!
//! - **`mysql`** - Enables MySQL support
//! - **`postgres`** - Enables PostgreSQL support
//!
//! # Usage
//!
//! ```rust,ignore
//! use sqlx_migrator::{Migrate, Plan};
//!
//! let mut conn = pool.acquire().await?;
//! let migrator = schemata_migrator::new::<sqlx::Postgres>()?;
//!
//! migrator.run(&mut *conn, &Plan::apply_all()).await?;
//! ```
//!
//! Runners that are not backed by sqlx (or need a catalog for constraint cleanup)
//! take the steps directly from [`M0001::steps`].
//!
//! # Migrations
//!
//! - [`M0001`] - Drops `rules_profiles.is_default` and makes
//!   `events.component_uuid` non-nullable

use sqlx_migrator::{Info, Migrator};

mod m0001;
mod schema;

pub use m0001::M0001;
pub use schema::{Events, RulesProfiles};

/// Creates a new [`Migrator`] instance with all migrations registered.
///
/// # Errors
///
/// Returns an error if migration registration fails.
pub fn new<DB: sqlx::Database>() -> Result<Migrator<DB>, sqlx_migrator::Error>
where
    M0001: sqlx_migrator::Migration<DB>,
{
    let mut migrator = Migrator::default();
    migrator.add_migration(Box::new(M0001))?;

    Ok(migrator)
}
