//! Database settings used to pick the active dialect.
//!
//! The dialect is chosen once per run: either named explicitly or derived from the
//! connection URL.

use serde::Deserialize;

use crate::dialect::Dialect;
use crate::error::{Error, Result};

/// Settings naming the database a migration runs against.
///
/// Deserializable so it can be embedded in an application configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    /// Explicit dialect id (`h2`, `mssql`, `mysql`, `oracle`, `postgresql`).
    #[serde(default)]
    pub dialect: Option<String>,

    /// Connection URL, with or without a `jdbc:` prefix.
    #[serde(default)]
    pub url: Option<String>,
}

impl DatabaseSettings {
    pub fn builder() -> DatabaseSettingsBuilder {
        DatabaseSettingsBuilder::new()
    }

    /// Resolves the active dialect. An explicit dialect wins over the URL.
    pub fn resolve(&self) -> Result<Dialect> {
        if let Some(key) = self.dialect.as_deref().filter(|key| !key.trim().is_empty()) {
            return Dialect::from_key(key);
        }

        match self.url.as_deref().filter(|url| !url.trim().is_empty()) {
            Some(url) => Dialect::from_url(url),
            None => Err(Error::invalid(
                "database settings name neither a dialect nor a url",
            )),
        }
    }
}

/// Builder for [`DatabaseSettings`]
#[derive(Debug, Default)]
pub struct DatabaseSettingsBuilder {
    settings: DatabaseSettings,
}

impl DatabaseSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialect(mut self, dialect: impl Into<String>) -> Self {
        self.settings.dialect = Some(dialect.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.settings.url = Some(url.into());
        self
    }

    pub fn build(self) -> DatabaseSettings {
        self.settings
    }
}
