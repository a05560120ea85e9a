//! Identifier validation and quoting.
//!
//! Names handed to the builders (tables, columns, indexes) must be plain lower-case
//! identifiers so that every supported dialect folds them the same way. Names read
//! back from a server catalog, such as generated constraint names, are only
//! rendered, never validated.

use crate::error::{Error, Result};

/// Tables leave room for derived names (`pk_<table>`, `<table>_seq`) within
/// [`MAX_NAME_LENGTH`].
pub const MAX_TABLE_NAME_LENGTH: usize = 25;

/// Oracle limit, the strictest of the supported dialects.
pub const MAX_NAME_LENGTH: usize = 30;

const RESERVED_WORDS: &[&str] = &[
    "all",
    "alter",
    "and",
    "as",
    "asc",
    "between",
    "by",
    "check",
    "column",
    "constraint",
    "create",
    "default",
    "delete",
    "desc",
    "distinct",
    "drop",
    "exists",
    "from",
    "grant",
    "group",
    "having",
    "in",
    "index",
    "insert",
    "into",
    "is",
    "key",
    "level",
    "like",
    "not",
    "null",
    "number",
    "or",
    "order",
    "primary",
    "references",
    "select",
    "set",
    "size",
    "table",
    "to",
    "union",
    "unique",
    "update",
    "user",
    "value",
    "values",
    "where",
    "with",
];

pub fn validate_table_name(name: &str) -> Result<()> {
    validate(name, "table name", MAX_TABLE_NAME_LENGTH)
}

pub fn validate_column_name(name: &str) -> Result<()> {
    validate(name, "column name", MAX_NAME_LENGTH)
}

pub fn validate_index_name(name: &str) -> Result<()> {
    validate(name, "index name", MAX_NAME_LENGTH)
}

fn validate(name: &str, what: &str, max: usize) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid(format!("{what} cannot be empty")));
    }

    if name.len() > max {
        return Err(Error::invalid(format!(
            "{what} `{name}` exceeds {max} characters"
        )));
    }

    let mut chars = name.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    let rest_is_plain = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if !starts_with_letter || !rest_is_plain {
        return Err(Error::invalid(format!(
            "{what} `{name}` must be lower case and contain only alphanumeric chars or '_'"
        )));
    }

    Ok(())
}

/// Returns true when `name` can be written without quotes on every dialect.
pub fn is_plain(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');

    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !is_reserved(name)
}

pub fn is_reserved(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    RESERVED_WORDS.binary_search(&lower.as_str()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_words_are_sorted() {
        let mut sorted = RESERVED_WORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, RESERVED_WORDS);
    }

    #[test]
    fn accepts_plain_lower_case_names() {
        assert!(validate_table_name("rules_profiles").is_ok());
        assert!(validate_column_name("component_uuid").is_ok());
        assert!(validate_index_name("events_component_uuid").is_ok());
    }

    #[test]
    fn rejects_bad_names() {
        assert!(validate_column_name("").is_err());
        assert!(validate_column_name("Kee").is_err());
        assert!(validate_column_name("1st").is_err());
        assert!(validate_column_name("is-default").is_err());
        assert!(validate_table_name("a_table_name_that_is_way_too_long").is_err());
        assert!(validate_index_name(&"i".repeat(31)).is_err());
    }

    #[test]
    fn plain_names() {
        assert!(is_plain("is_default"));
        assert!(is_plain("DF__rules_pro__is_de__xyz"));
        assert!(!is_plain("order"));
        assert!(!is_plain("Value"));
        assert!(!is_plain("with space"));
        assert!(!is_plain(""));
    }
}
