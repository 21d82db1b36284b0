//! Shared test utilities: an in-memory executor that interprets the small
//! SQL dialect the ingest pipeline emits.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use indexmap::IndexMap;

use firn_common::config::{Authenticator, Profile};
use firn_connect::{
    ConnectError, ConnectResult, SessionContext, SqlExecutor, SqlValue, StatementOutput,
};
use firn_frame::Frame;

#[derive(Debug, Clone)]
pub struct MockTable {
    pub columns: IndexMap<String, String>,
    pub rows: u64,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub tables: HashMap<String, MockTable>,
    pub statements: Vec<String>,
    pub describes: Vec<String>,
    pub bulk_loads: Vec<(String, Frame)>,
}

/// An executor backed by an in-memory table registry. Records every call so
/// tests can assert on the exact statement sequence.
#[derive(Default)]
pub struct MockExecutor {
    state: Mutex<MockState>,
    fail_on: Mutex<Option<String>>,
}

impl MockExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed_table(&self, name: &str, columns: &[(&str, &str)], rows: u64) {
        self.state.lock().unwrap().tables.insert(
            name.to_string(),
            MockTable {
                columns: columns
                    .iter()
                    .map(|(column, data_type)| (column.to_string(), data_type.to_string()))
                    .collect(),
                rows,
            },
        );
    }

    /// Makes every statement containing `needle` fail.
    pub fn fail_on(&self, needle: &str) {
        *self.fail_on.lock().unwrap() = Some(needle.to_string());
    }

    pub fn table(&self, name: &str) -> Option<MockTable> {
        self.state.lock().unwrap().tables.get(name).cloned()
    }

    pub fn table_names(&self) -> Vec<String> {
        let mut names = self
            .state
            .lock()
            .unwrap()
            .tables
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    pub fn statements(&self) -> Vec<String> {
        self.state.lock().unwrap().statements.clone()
    }

    pub fn describes(&self) -> Vec<String> {
        self.state.lock().unwrap().describes.clone()
    }

    pub fn bulk_loads(&self) -> Vec<(String, Frame)> {
        self.state.lock().unwrap().bulk_loads.clone()
    }
}

#[async_trait]
impl SqlExecutor for MockExecutor {
    async fn execute(&self, sql: &str, _bindings: &[SqlValue]) -> ConnectResult<StatementOutput> {
        if let Some(needle) = self.fail_on.lock().unwrap().as_deref() {
            if sql.contains(needle) {
                return Err(ConnectError::Sql(format!("injected failure: {sql}")));
            }
        }
        let mut state = self.state.lock().unwrap();
        state.statements.push(sql.to_string());

        if let Some(rest) = sql.strip_prefix("CREATE OR REPLACE TABLE ") {
            let (name, table) = parse_create(rest);
            state.tables.insert(name, table);
        } else if let Some(rest) = sql.strip_prefix("CREATE TABLE ") {
            let (name, table) = parse_create(rest);
            if state.tables.contains_key(&name) {
                return Err(ConnectError::Sql(format!("table {name} already exists")));
            }
            state.tables.insert(name, table);
        } else if let Some(rest) = sql.strip_prefix("DROP TABLE IF EXISTS ") {
            state.tables.remove(rest.trim());
        } else if let Some(rest) = sql.strip_prefix("ALTER TABLE ") {
            let (name, operation) = rest.split_once(' ').expect("malformed ALTER TABLE");
            let table = state
                .tables
                .get_mut(name)
                .ok_or_else(|| ConnectError::Sql(format!("table {name} does not exist")))?;
            if let Some(definition) = operation.strip_prefix("ADD COLUMN ") {
                let (column, data_type) =
                    definition.split_once(' ').expect("malformed ADD COLUMN");
                table
                    .columns
                    .insert(column.to_string(), data_type.to_string());
            } else if let Some(promotion) = operation.strip_prefix("ALTER COLUMN ") {
                let column = promotion.split_whitespace().next().expect("missing column");
                let slot = table
                    .columns
                    .get_mut(column)
                    .ok_or_else(|| ConnectError::Sql(format!("column {column} does not exist")))?;
                *slot = "VARIANT".to_string();
            }
        } else if let Some(rest) = sql.strip_prefix("INSERT INTO ") {
            let target = rest.split(' ').next().expect("missing target").to_string();
            let source = rest.rsplit(' ').next().expect("missing source").to_string();
            let moved = state
                .tables
                .get(&source)
                .ok_or_else(|| ConnectError::Sql(format!("table {source} does not exist")))?
                .rows;
            let table = state
                .tables
                .get_mut(&target)
                .ok_or_else(|| ConnectError::Sql(format!("table {target} does not exist")))?;
            table.rows += moved;
            return Ok(StatementOutput::affected(moved));
        }
        Ok(StatementOutput::default())
    }

    async fn describe_table(&self, table: &str) -> ConnectResult<IndexMap<String, String>> {
        let mut state = self.state.lock().unwrap();
        state.describes.push(table.to_string());
        state
            .tables
            .get(table)
            .map(|t| t.columns.clone())
            .ok_or_else(|| ConnectError::TableNotFound(table.to_string()))
    }

    async fn bulk_load(
        &self,
        table: &str,
        data: &Frame,
        create_if_absent: bool,
    ) -> ConnectResult<u64> {
        let mut state = self.state.lock().unwrap();
        state.bulk_loads.push((table.to_string(), data.clone()));
        let height = data.height() as u64;
        match state.tables.get_mut(table) {
            Some(existing) => existing.rows += height,
            None if create_if_absent => {
                state.tables.insert(
                    table.to_string(),
                    MockTable {
                        columns: data
                            .columns()
                            .iter()
                            .map(|c| (c.name().to_string(), "VARCHAR".to_string()))
                            .collect(),
                        rows: height,
                    },
                );
            }
            None => return Err(ConnectError::Sql(format!("table {table} does not exist"))),
        }
        Ok(height)
    }
}

/// `"{NAME} (A INT, B VARCHAR)"` into a table entry.
fn parse_create(rest: &str) -> (String, MockTable) {
    let (name, definitions) = rest.split_once(" (").expect("malformed CREATE TABLE");
    let columns = definitions
        .trim_end_matches(')')
        .split(", ")
        .filter(|definition| !definition.is_empty())
        .map(|definition| {
            let (column, data_type) = definition
                .split_once(' ')
                .expect("malformed column definition");
            (column.to_string(), data_type.to_string())
        })
        .collect();
    (name.to_string(), MockTable { columns, rows: 0 })
}

#[allow(dead_code)]
pub fn session(executor: Arc<MockExecutor>) -> SessionContext {
    let profile = Profile {
        account: "test-org".to_string(),
        user: "tester".to_string(),
        role: None,
        warehouse: None,
        database: Some("ANALYTICS".to_string()),
        schema: Some("PUBLIC".to_string()),
        authenticator: Authenticator::Password,
    };
    SessionContext::new(profile, executor)
}
