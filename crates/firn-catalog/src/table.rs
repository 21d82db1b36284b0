use std::sync::Arc;

use indexmap::IndexMap;

use firn_connect::{ConnectError, SqlExecutor, SqlValue};

use crate::error::CatalogResult;
use crate::name::TableName;

/// A handle to a remote table.
#[derive(Clone)]
pub struct Table {
    name: TableName,
    executor: Arc<dyn SqlExecutor>,
}

impl Table {
    pub fn new(name: TableName, executor: Arc<dyn SqlExecutor>) -> Self {
        Self { name, executor }
    }

    pub fn name(&self) -> &TableName {
        &self.name
    }

    pub async fn exists(&self) -> CatalogResult<bool> {
        match self.executor.describe_table(&self.name.to_string()).await {
            Ok(_) => Ok(true),
            Err(ConnectError::TableNotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// The declared type of each column, in table order.
    pub async fn describe(&self) -> CatalogResult<IndexMap<String, String>> {
        Ok(self.executor.describe_table(&self.name.to_string()).await?)
    }

    pub async fn row_count(&self) -> CatalogResult<u64> {
        let output = self
            .executor
            .execute(&format!("SELECT COUNT(*) FROM {}", self.name), &[])
            .await?;
        Ok(match output.first_row().and_then(|row| row.first()) {
            Some(SqlValue::Int(n)) => u64::try_from(*n).unwrap_or(0),
            _ => 0,
        })
    }

    pub async fn drop(&self) -> CatalogResult<()> {
        self.executor
            .execute(&format!("DROP TABLE IF EXISTS {}", self.name), &[])
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table").field("name", &self.name).finish_non_exhaustive()
    }
}
