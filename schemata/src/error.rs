/// Errors raised while building or executing a schema change.
///
/// Configuration errors ([`Error::UnsupportedDialect`], [`Error::InvalidDefinition`])
/// are raised before any statement reaches the database. Database errors
/// ([`Error::Execution`], [`Error::Discovery`]) carry the underlying failure untouched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported dialect `{0}`")]
    UnsupportedDialect(String),

    #[error("invalid definition: {0}")]
    InvalidDefinition(String),

    #[error("statement `{statement}` failed: {source}")]
    Execution {
        statement: String,
        source: anyhow::Error,
    },

    #[error("constraint lookup on {table}.{column} failed: {source}")]
    Discovery {
        table: String,
        column: String,
        source: anyhow::Error,
    },
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidDefinition(message.into())
    }

    pub fn execution(statement: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Error::Execution {
            statement: statement.into(),
            source: source.into(),
        }
    }

    pub fn discovery(
        table: impl Into<String>,
        column: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Error::Discovery {
            table: table.into(),
            column: column.into(),
            source: source.into(),
        }
    }

    /// Returns true for errors raised before anything reached the database.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedDialect(_) | Error::InvalidDefinition(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
