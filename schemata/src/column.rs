//! Dialect-agnostic column definitions.

use crate::error::{Error, Result};
use crate::identifier;

/// Size of a varchar column storing a UUID.
pub const UUID_VARCHAR_SIZE: u32 = 50;

/// Size of a varchar column storing a UUID generated by the application.
pub const UUID_SIZE: u32 = 40;

/// Largest varchar limit accepted on every dialect (Oracle `VARCHAR2`).
pub const MAX_VARCHAR_SIZE: u32 = 4000;

pub const DEFAULT_DECIMAL_PRECISION: u8 = 38;
pub const DEFAULT_DECIMAL_SCALE: u8 = 20;

/// Logical type of a column, without its size parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Varchar,
    Clob,
    Integer,
    BigInteger,
    Boolean,
    Timestamp,
    Decimal,
    Blob,
}

/// Logical type of a column with its size parameters resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Limit in characters, translated to the native unit by the dialect.
    Varchar { limit: u32 },
    Clob,
    Integer,
    BigInteger,
    Boolean,
    Timestamp,
    Decimal { precision: u8, scale: u8 },
    Blob,
}

impl ColumnType {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnType::Varchar { .. } => ColumnKind::Varchar,
            ColumnType::Clob => ColumnKind::Clob,
            ColumnType::Integer => ColumnKind::Integer,
            ColumnType::BigInteger => ColumnKind::BigInteger,
            ColumnType::Boolean => ColumnKind::Boolean,
            ColumnType::Timestamp => ColumnKind::Timestamp,
            ColumnType::Decimal { .. } => ColumnKind::Decimal,
            ColumnType::Blob => ColumnKind::Blob,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    Boolean(bool),
    Integer(i64),
    Text(String),
    CurrentTimestamp,
}

/// An immutable column description, created through [`ColumnDefBuilder`].
///
/// ```
/// use schemata::{ColumnDef, UUID_VARCHAR_SIZE};
///
/// let column = ColumnDef::varchar("component_uuid")
///     .limit(UUID_VARCHAR_SIZE)
///     .nullable(false)
///     .build()
///     .unwrap();
///
/// assert!(!column.is_nullable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    name: String,
    column_type: ColumnType,
    nullable: bool,
    default: Option<DefaultValue>,
}

impl ColumnDef {
    pub fn builder(name: impl Into<String>, kind: ColumnKind) -> ColumnDefBuilder {
        ColumnDefBuilder {
            name: name.into(),
            kind,
            limit: None,
            precision: None,
            nullable: true,
            default: None,
        }
    }

    pub fn varchar(name: impl Into<String>) -> ColumnDefBuilder {
        Self::builder(name, ColumnKind::Varchar)
    }

    pub fn clob(name: impl Into<String>) -> ColumnDefBuilder {
        Self::builder(name, ColumnKind::Clob)
    }

    pub fn integer(name: impl Into<String>) -> ColumnDefBuilder {
        Self::builder(name, ColumnKind::Integer)
    }

    pub fn big_integer(name: impl Into<String>) -> ColumnDefBuilder {
        Self::builder(name, ColumnKind::BigInteger)
    }

    pub fn boolean(name: impl Into<String>) -> ColumnDefBuilder {
        Self::builder(name, ColumnKind::Boolean)
    }

    pub fn timestamp(name: impl Into<String>) -> ColumnDefBuilder {
        Self::builder(name, ColumnKind::Timestamp)
    }

    pub fn decimal(name: impl Into<String>) -> ColumnDefBuilder {
        Self::builder(name, ColumnKind::Decimal)
    }

    pub fn blob(name: impl Into<String>) -> ColumnDefBuilder {
        Self::builder(name, ColumnKind::Blob)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct ColumnDefBuilder {
    name: String,
    kind: ColumnKind,
    limit: Option<u32>,
    precision: Option<(u8, u8)>,
    nullable: bool,
    default: Option<DefaultValue>,
}

impl ColumnDefBuilder {
    /// Character limit of a varchar column.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Precision and scale of a decimal column.
    pub fn precision(mut self, precision: u8, scale: u8) -> Self {
        self.precision = Some((precision, scale));
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn build(self) -> Result<ColumnDef> {
        identifier::validate_column_name(&self.name)?;

        if self.limit.is_some() && self.kind != ColumnKind::Varchar {
            return Err(Error::invalid(format!(
                "column `{}`: a limit only applies to varchar columns",
                self.name
            )));
        }

        if self.precision.is_some() && self.kind != ColumnKind::Decimal {
            return Err(Error::invalid(format!(
                "column `{}`: precision only applies to decimal columns",
                self.name
            )));
        }

        let column_type = match self.kind {
            ColumnKind::Varchar => {
                let limit = self.limit.ok_or_else(|| {
                    Error::invalid(format!("column `{}`: limit must be set", self.name))
                })?;

                if limit == 0 || limit > MAX_VARCHAR_SIZE {
                    return Err(Error::invalid(format!(
                        "column `{}`: limit must be between 1 and {MAX_VARCHAR_SIZE}, got {limit}",
                        self.name
                    )));
                }

                ColumnType::Varchar { limit }
            }
            ColumnKind::Decimal => {
                let (precision, scale) = self
                    .precision
                    .unwrap_or((DEFAULT_DECIMAL_PRECISION, DEFAULT_DECIMAL_SCALE));

                if precision == 0 || precision > 38 || scale > precision {
                    return Err(Error::invalid(format!(
                        "column `{}`: invalid decimal precision ({precision},{scale})",
                        self.name
                    )));
                }

                ColumnType::Decimal { precision, scale }
            }
            ColumnKind::Clob => ColumnType::Clob,
            ColumnKind::Integer => ColumnType::Integer,
            ColumnKind::BigInteger => ColumnType::BigInteger,
            ColumnKind::Boolean => ColumnType::Boolean,
            ColumnKind::Timestamp => ColumnType::Timestamp,
            ColumnKind::Blob => ColumnType::Blob,
        };

        if let Some(default) = &self.default {
            check_default(&self.name, &column_type, default)?;
        }

        Ok(ColumnDef {
            name: self.name,
            column_type,
            nullable: self.nullable,
            default: self.default,
        })
    }
}

fn check_default(name: &str, column_type: &ColumnType, default: &DefaultValue) -> Result<()> {
    let compatible = match (default, column_type) {
        (DefaultValue::Boolean(_), ColumnType::Boolean) => true,
        (
            DefaultValue::Integer(_),
            ColumnType::Integer | ColumnType::BigInteger | ColumnType::Decimal { .. },
        ) => true,
        (DefaultValue::Text(value), ColumnType::Varchar { limit }) => {
            if value.chars().count() > *limit as usize {
                return Err(Error::invalid(format!(
                    "column `{name}`: default value exceeds limit {limit}"
                )));
            }
            true
        }
        (DefaultValue::Text(_), ColumnType::Clob) => true,
        (DefaultValue::CurrentTimestamp, ColumnType::Timestamp) => true,
        _ => false,
    };

    if !compatible {
        return Err(Error::invalid(format!(
            "column `{name}`: default {default:?} does not match type {column_type:?}"
        )));
    }

    Ok(())
}
