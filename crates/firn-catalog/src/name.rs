use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use firn_connect::SessionContext;

use crate::error::{CatalogError, CatalogResult};

lazy_static! {
    static ref IDENTIFIER: Regex = {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap()
    };
}

const MAX_IDENTIFIER_LENGTH: usize = 255;

/// Whether a string is a valid unquoted identifier: a letter or underscore
/// followed by letters, digits, and underscores.
pub fn is_valid_identifier(name: &str) -> bool {
    name.len() <= MAX_IDENTIFIER_LENGTH && IDENTIFIER.is_match(name)
}

fn validate_identifier(name: &str) -> CatalogResult<()> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(CatalogError::InvalidArgument(format!(
            "invalid identifier '{name}': only unquoted identifiers are supported \
             (letters, digits, underscores; must start with a letter or underscore)"
        )))
    }
}

/// A fully qualified three-part table name of validated unquoted
/// identifiers, uppercased on construction to match the remote system's
/// default identifier folding. Quoted (case-sensitive) identifiers are
/// rejected here; they are not supported by this layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    database: String,
    schema: String,
    table: String,
}

impl TableName {
    pub fn new(
        database: impl AsRef<str>,
        schema: impl AsRef<str>,
        table: impl AsRef<str>,
    ) -> CatalogResult<Self> {
        let database = database.as_ref();
        let schema = schema.as_ref();
        let table = table.as_ref();
        validate_identifier(database)?;
        validate_identifier(schema)?;
        validate_identifier(table)?;
        Ok(Self {
            database: database.to_uppercase(),
            schema: schema.to_uppercase(),
            table: table.to_uppercase(),
        })
    }

    /// Parses a dotted name, filling in missing parts from the defaults:
    /// `"table"`, `"schema.table"`, or `"database.schema.table"`.
    pub fn parse(
        name: &str,
        default_database: Option<&str>,
        default_schema: Option<&str>,
    ) -> CatalogResult<Self> {
        if name.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "table name cannot be empty".to_string(),
            ));
        }
        let parts = name.split('.').collect::<Vec<_>>();
        match parts.as_slice() {
            [table] => {
                let database = default_database.ok_or_else(|| {
                    CatalogError::InvalidArgument(format!(
                        "cannot resolve database for '{name}': provide a qualified name \
                         or set a database on the connection"
                    ))
                })?;
                let schema = default_schema.ok_or_else(|| {
                    CatalogError::InvalidArgument(format!(
                        "cannot resolve schema for '{name}': provide a qualified name \
                         or set a schema on the connection"
                    ))
                })?;
                Self::new(database, schema, table)
            }
            [schema, table] => {
                let database = default_database.ok_or_else(|| {
                    CatalogError::InvalidArgument(format!(
                        "cannot resolve database for '{name}': provide a qualified name \
                         or set a database on the connection"
                    ))
                })?;
                Self::new(database, schema, table)
            }
            [database, schema, table] => Self::new(database, schema, table),
            _ => Err(CatalogError::InvalidArgument(format!(
                "invalid table name '{name}': expected 'table', 'schema.table', \
                 or 'database.schema.table'"
            ))),
        }
    }

    /// Parses a dotted name, resolving missing parts from the session.
    pub async fn resolve(name: &str, ctx: &SessionContext) -> CatalogResult<Self> {
        let parts = name.split('.').count();
        if parts >= 3 {
            return Self::parse(name, None, None);
        }
        let database = ctx.current_database().await?;
        let schema = if parts == 1 {
            ctx.current_schema().await?
        } else {
            None
        };
        Self::parse(name, database.as_deref(), schema.as_deref())
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// A table name in the same database and schema.
    pub fn sibling(&self, table: &str) -> CatalogResult<Self> {
        Self::new(&self.database, &self.schema, table)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.database, self.schema, self.table)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_is_valid_identifier() {
        assert!(is_valid_identifier("my_table"));
        assert!(is_valid_identifier("_hidden"));
        assert!(is_valid_identifier("T2"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("123bad"));
        assert!(!is_valid_identifier("has-dash"));
        assert!(!is_valid_identifier("has space"));
        assert!(!is_valid_identifier("\"Quoted\""));
        assert!(!is_valid_identifier(&"x".repeat(256)));
    }

    #[test]
    fn test_parse_fully_qualified() {
        let name = TableName::parse("analytics.public.events", None, None).unwrap();
        assert_eq!(name.database(), "ANALYTICS");
        assert_eq!(name.schema(), "PUBLIC");
        assert_eq!(name.table(), "EVENTS");
        assert_eq!(name.to_string(), "ANALYTICS.PUBLIC.EVENTS");
    }

    #[test]
    fn test_parse_with_defaults() {
        let name = TableName::parse("events", Some("analytics"), Some("public")).unwrap();
        assert_eq!(name.to_string(), "ANALYTICS.PUBLIC.EVENTS");

        let name = TableName::parse("public.events", Some("analytics"), None).unwrap();
        assert_eq!(name.to_string(), "ANALYTICS.PUBLIC.EVENTS");
    }

    #[test]
    fn test_parse_missing_defaults() {
        assert!(TableName::parse("events", None, Some("public")).is_err());
        assert!(TableName::parse("events", Some("analytics"), None).is_err());
        assert!(TableName::parse("public.events", None, None).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_parts() {
        assert!(TableName::parse("", None, None).is_err());
        assert!(TableName::parse("a.b.c.d", None, None).is_err());
        assert!(TableName::parse("db.schema.bad-name", None, None).is_err());
        assert!(TableName::parse("db..table", None, None).is_err());
    }

    #[test]
    fn test_sibling() {
        let name = TableName::parse("DB.S.T", None, None).unwrap();
        let sibling = name.sibling("t_other").unwrap();
        assert_eq!(sibling.to_string(), "DB.S.T_OTHER");
    }
}
