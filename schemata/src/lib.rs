//! Cross-dialect schema migration steps.
//!
//! This crate turns a logical schema change ("drop this column", "make this column
//! non-nullable and re-index it") into the SQL statements each supported database
//! needs, including the cleanup statements some dialects silently require. It
//! supports H2, SQL Server, MySQL, Oracle and PostgreSQL.
//!
//! # Building blocks
//!
//! - [`Dialect`] - the database family, with its native types, quoting rules and
//!   capabilities
//! - [`ColumnDef`] - a dialect-agnostic column definition
//! - [`builder`] - DDL builders producing a [`Statement`] for a dialect
//! - [`SchemaChange`] - a [`MigrationStep`] running cleanup, structural change and
//!   index rebuild in order
//! - [`Context`] - the sink statements are written to, supplied by the caller
//!
//! # Usage
//!
//! ```rust,ignore
//! use schemata::{builder::IndexSpec, ColumnDef, Dialect, MigrationStep, SchemaChange};
//!
//! let column = ColumnDef::varchar("component_uuid")
//!     .limit(50)
//!     .nullable(false)
//!     .build()?;
//!
//! let step = SchemaChange::on(Dialect::PostgreSql, "events")
//!     .preserve_index(IndexSpec::new("events", "events_component_uuid").column("component_uuid"))
//!     .alter_columns([column])
//!     .build()?;
//!
//! step.execute(&mut context).await?;
//! ```
//!
//! Connection handling, version bookkeeping and transactions are left to the
//! caller. See the `schemata-sql` crate for sqlx based contexts.

pub mod builder;
pub mod config;
pub mod identifier;

mod column;
mod context;
mod dialect;
mod error;
mod statement;
mod step;

pub use column::{
    ColumnDef, ColumnDefBuilder, ColumnKind, ColumnType, DefaultValue,
    DEFAULT_DECIMAL_PRECISION, DEFAULT_DECIMAL_SCALE, MAX_VARCHAR_SIZE, UUID_SIZE,
    UUID_VARCHAR_SIZE,
};
pub use context::{Catalog, Context, DryRun};
pub use dialect::{
    AlterStyle, AutoIncrementStyle, Capabilities, ColumnListStyle, Dialect, DropIndexStyle,
};
pub use error::{Error, Result};
pub use statement::Statement;
pub use step::{MigrationStep, Phase, SchemaChange, SchemaChangeBuilder, StepFactory};
