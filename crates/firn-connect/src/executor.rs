use indexmap::IndexMap;

use firn_frame::Frame;

use crate::error::ConnectResult;

/// A single value in a statement binding or a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

pub type SqlRow = Vec<SqlValue>;

/// The outcome of a statement: result rows for queries, an affected-row
/// count for DML, or both empty for DDL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementOutput {
    pub columns: Vec<String>,
    pub rows: Vec<SqlRow>,
    pub affected_rows: u64,
}

impl StatementOutput {
    pub fn rows(columns: Vec<String>, rows: Vec<SqlRow>) -> Self {
        Self {
            columns,
            rows,
            affected_rows: 0,
        }
    }

    pub fn affected(affected_rows: u64) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            affected_rows,
        }
    }

    pub fn first_row(&self) -> Option<&SqlRow> {
        self.rows.first()
    }

    /// Position of a result column by name, matched case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }
}

/// The seam between this library and a concrete warehouse connection.
///
/// Implementations own authentication, transport, timeouts, and retries;
/// callers here never construct raw connections and never retry on their
/// own. Table identifiers are rendered `DATABASE.SCHEMA.TABLE` strings of
/// unquoted identifiers.
#[async_trait::async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Executes a statement, optionally with positional bindings.
    async fn execute(&self, sql: &str, bindings: &[SqlValue]) -> ConnectResult<StatementOutput>;

    /// Returns the declared type of each column of a table, in table order.
    /// Fails with [`ConnectError::TableNotFound`] when the table is absent.
    ///
    /// [`ConnectError::TableNotFound`]: crate::ConnectError::TableNotFound
    async fn describe_table(&self, table: &str) -> ConnectResult<IndexMap<String, String>>;

    /// Appends the frame's rows to a table through the fastest path the
    /// connection offers, returning the number of rows loaded. The frame's
    /// columns must already match the table's columns by name.
    async fn bulk_load(
        &self,
        table: &str,
        data: &Frame,
        create_if_absent: bool,
    ) -> ConnectResult<u64>;
}
