#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use schemata::{Catalog, Context, Error, Statement};

/// Shared record of what reached the database, catalog lookups included.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Entry>>>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Lookup(String),
    Execute(String),
}

impl Journal {
    pub fn entries(&self) -> Vec<Entry> {
        self.0.lock().unwrap().clone()
    }

    pub fn executed(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Execute(sql) => Some(sql),
                Entry::Lookup(_) => None,
            })
            .collect()
    }

    fn push(&self, entry: Entry) {
        self.0.lock().unwrap().push(entry);
    }
}

pub struct FakeCatalog {
    journal: Journal,
    names: Vec<String>,
    fail: bool,
}

impl FakeCatalog {
    pub fn returning(journal: &Journal, names: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            journal: journal.clone(),
            names: names.iter().map(|name| name.to_string()).collect(),
            fail: false,
        })
    }

    pub fn failing(journal: &Journal) -> Arc<Self> {
        Arc::new(Self {
            journal: journal.clone(),
            names: Vec::new(),
            fail: true,
        })
    }
}

#[async_trait::async_trait]
impl Catalog for FakeCatalog {
    async fn lookup(&self, sql: &str) -> anyhow::Result<Vec<String>> {
        self.journal.push(Entry::Lookup(sql.to_owned()));

        if self.fail {
            anyhow::bail!("connection refused");
        }

        Ok(self.names.clone())
    }
}

/// Context that records every statement and rejects the first one containing
/// `reject`.
pub struct RecordingContext {
    journal: Journal,
    reject: Option<String>,
}

impl RecordingContext {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            reject: None,
        }
    }

    pub fn rejecting(journal: &Journal, reject: &str) -> Self {
        Self {
            journal: journal.clone(),
            reject: Some(reject.to_owned()),
        }
    }
}

#[async_trait::async_trait]
impl Context for RecordingContext {
    async fn execute(&mut self, statement: Statement) -> schemata::Result<()> {
        for sql in statement {
            if let Some(reject) = &self.reject {
                if sql.contains(reject.as_str()) {
                    return Err(Error::execution(
                        sql,
                        anyhow::anyhow!("Cannot find the object because it does not exist"),
                    ));
                }
            }

            self.journal.push(Entry::Execute(sql));
        }

        Ok(())
    }
}
