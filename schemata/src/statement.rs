use std::fmt;

/// Ordered SQL commands produced by a builder. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement(Vec<String>);

impl Statement {
    pub(crate) fn new(sql: Vec<String>) -> Self {
        debug_assert!(!sql.is_empty(), "statement without sql");
        Self(sql)
    }

    pub(crate) fn single(sql: impl Into<String>) -> Self {
        Self(vec![sql.into()])
    }

    pub fn sql(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn into_sql(self) -> Vec<String> {
        self.0
    }
}

impl IntoIterator for Statement {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Statement {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(";\n"))
    }
}
