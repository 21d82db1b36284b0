use std::sync::Arc;

use firn_connect::{SqlExecutor, SqlValue};

use crate::error::{CatalogError, CatalogResult};
use crate::name::{is_valid_identifier, TableName};
use crate::table::Table;

/// A handle to a schema within a database.
#[derive(Clone)]
pub struct Schema {
    database: String,
    name: String,
    executor: Arc<dyn SqlExecutor>,
}

impl Schema {
    pub fn new(
        database: impl AsRef<str>,
        name: impl AsRef<str>,
        executor: Arc<dyn SqlExecutor>,
    ) -> CatalogResult<Self> {
        let database = database.as_ref();
        let name = name.as_ref();
        for part in [database, name] {
            if !is_valid_identifier(part) {
                return Err(CatalogError::InvalidArgument(format!(
                    "invalid identifier '{part}'"
                )));
            }
        }
        Ok(Self {
            database: database.to_uppercase(),
            name: name.to_uppercase(),
            executor,
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn list_tables(&self) -> CatalogResult<Vec<String>> {
        let output = self
            .executor
            .execute(
                &format!("SHOW TABLES IN {}.{}", self.database, self.name),
                &[],
            )
            .await?;
        let index = output.column_index("name").ok_or_else(|| {
            CatalogError::NotFound("'name' column missing from SHOW TABLES output".to_string())
        })?;
        Ok(output
            .rows
            .iter()
            .filter_map(|row| match row.get(index) {
                Some(SqlValue::Str(s)) => Some(s.clone()),
                _ => None,
            })
            .collect())
    }

    /// Whether a table with the given name exists in this schema,
    /// compared case-insensitively.
    pub async fn has_table(&self, table: &str) -> CatalogResult<bool> {
        let tables = self.list_tables().await?;
        Ok(tables.iter().any(|t| t.eq_ignore_ascii_case(table)))
    }

    pub fn table(&self, name: impl AsRef<str>) -> CatalogResult<Table> {
        let name = TableName::new(&self.database, &self.name, name)?;
        Ok(Table::new(name, self.executor.clone()))
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("database", &self.database)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
