//! DDL builders.
//!
//! Every builder takes the active [`Dialect`] and produces a [`Statement`]: the
//! ordered SQL commands that achieve one intent on that dialect. Validation happens
//! in `build()`, before any SQL exists.

mod add_columns;
mod alter_columns;
mod constraint;
mod drop_columns;
mod index;
mod table;

pub use add_columns::AddColumnsBuilder;
pub use alter_columns::AlterColumnsBuilder;
pub use constraint::DropConstraintBuilder;
pub use drop_columns::DropColumnsBuilder;
pub use index::{CreateIndexBuilder, DropIndexBuilder, IndexSpec};
pub use table::{CreateTableBuilder, DropTableBuilder};

use std::collections::HashSet;

use crate::column::ColumnDef;
use crate::dialect::Dialect;
use crate::error::{Error, Result};

/// `name TYPE [DEFAULT value] [NOT] NULL`
pub(crate) fn column_fragment(dialect: Dialect, column: &ColumnDef) -> String {
    let mut fragment = format!(
        "{} {}",
        dialect.identifier(column.name()),
        dialect.type_name(&column.column_type())
    );

    if let Some(default) = column.default_value() {
        fragment.push_str(" DEFAULT ");
        fragment.push_str(&dialect.default_literal(default));
    }

    fragment.push_str(nullability(column.is_nullable()));
    fragment
}

pub(crate) fn nullability(nullable: bool) -> &'static str {
    if nullable {
        " NULL"
    } else {
        " NOT NULL"
    }
}

pub(crate) fn ensure_distinct<'a>(
    what: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let mut seen = HashSet::new();

    for name in names {
        if !seen.insert(name) {
            return Err(Error::invalid(format!("{what} `{name}` is listed twice")));
        }
    }

    if seen.is_empty() {
        return Err(Error::invalid(format!("at least one {what} must be set")));
    }

    Ok(())
}
