//! sqlx adapters for schemata migration steps.
//!
//! This crate runs [`schemata`] steps against a sqlx connection, either directly or
//! as operations of a [`sqlx_migrator`] migration.
//!
//! # Features
//!
//! - **`sqlite`** - Enables the SQLite driver (contexts and catalogs only, SQLite is
//!   not a migration dialect)
//! - **`mysql`** - Enables MySQL support
//! - **`postgres`** - Enables PostgreSQL support
//!
//! All features are enabled by default.
//!
//! # Usage
//!
//! ```rust,ignore
//! use schemata::{Dialect, MigrationStep, SchemaChange};
//! use schemata_sql::SqlxContext;
//!
//! let step = SchemaChange::on(Dialect::PostgreSql, "rules_profiles")
//!     .drop_columns(["is_default"])
//!     .build()?;
//!
//! let mut conn = pool.acquire().await?;
//! step.execute(&mut SqlxContext::<sqlx::Postgres>::new(&mut *conn)).await?;
//! ```
//!
//! Inside a migration, wrap a [`StepFactory`](schemata::StepFactory) in [`SqlxStep`]:
//!
//! ```rust,ignore
//! sqlx_migrator::postgres_migration!(
//!     M0001,
//!     "main",
//!     "m0001",
//!     vec_box![],
//!     vec_box![schemata_sql::SqlxStep(DropIsDefault::default())]
//! );
//! ```

mod operation;
mod sql;

pub use operation::{into_sqlx_error, SqlxDialect, SqlxStep};
pub use sql::{SqlxCatalog, SqlxContext};
