use std::sync::Arc;

use firn_connect::{SqlExecutor, SqlValue};

use crate::error::{CatalogError, CatalogResult};
use crate::name::is_valid_identifier;
use crate::schema::Schema;

/// A handle to a remote database. Holds no remote state; every method
/// issues a fresh query through the executor.
#[derive(Clone)]
pub struct Database {
    name: String,
    executor: Arc<dyn SqlExecutor>,
}

impl Database {
    pub fn new(name: impl AsRef<str>, executor: Arc<dyn SqlExecutor>) -> CatalogResult<Self> {
        let name = name.as_ref();
        if !is_valid_identifier(name) {
            return Err(CatalogError::InvalidArgument(format!(
                "invalid database name '{name}'"
            )));
        }
        Ok(Self {
            name: name.to_uppercase(),
            executor,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn exists(&self) -> CatalogResult<bool> {
        let output = self
            .executor
            .execute(&format!("SHOW DATABASES LIKE '{}'", self.name), &[])
            .await?;
        Ok(!output.rows.is_empty())
    }

    pub async fn list_schemas(&self) -> CatalogResult<Vec<String>> {
        let output = self
            .executor
            .execute(&format!("SHOW SCHEMAS IN DATABASE {}", self.name), &[])
            .await?;
        let index = output.column_index("name").ok_or_else(|| {
            CatalogError::NotFound("'name' column missing from SHOW SCHEMAS output".to_string())
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

    pub fn schema(&self, name: impl AsRef<str>) -> CatalogResult<Schema> {
        Schema::new(&self.name, name, self.executor.clone())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("name", &self.name).finish_non_exhaustive()
    }
}
