use indexmap::IndexMap;

use firn_catalog::TableName;
use firn_connect::{ConnectError, SqlExecutor};

use crate::error::IngestResult;

/// Classification of a remote column's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteType {
    /// A recognized scalar type (numbers, text, booleans, temporal, binary).
    Scalar,
    /// A semi-structured type that accepts JSON values.
    Variant,
    /// Anything this layer does not recognize.
    Other,
}

/// A remote column: the declared type string as reported by the remote
/// system, and its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteColumn {
    pub declared: String,
    pub classification: RemoteType,
}

/// The probed schema of a write target. Recomputed on every write call;
/// never cached across calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteSchema {
    /// The table does not exist.
    Missing,
    Present(IndexMap<String, RemoteColumn>),
}

impl RemoteSchema {
    pub fn exists(&self) -> bool {
        matches!(self, RemoteSchema::Present(_))
    }

    /// Looks up a column by name, matched case-insensitively.
    pub fn column(&self, name: &str) -> Option<&RemoteColumn> {
        match self {
            RemoteSchema::Missing => None,
            RemoteSchema::Present(columns) => columns
                .iter()
                .find(|(column, _)| column.eq_ignore_ascii_case(name))
                .map(|(_, remote)| remote),
        }
    }
}

/// Fetches and classifies the target table's schema. A missing table is a
/// normal outcome, not an error.
pub async fn probe_table(
    executor: &dyn SqlExecutor,
    table: &TableName,
) -> IngestResult<RemoteSchema> {
    match executor.describe_table(&table.to_string()).await {
        Ok(columns) => Ok(RemoteSchema::Present(
            columns
                .into_iter()
                .map(|(name, declared)| {
                    let classification = classify_declared_type(&declared);
                    (
                        name,
                        RemoteColumn {
                            declared,
                            classification,
                        },
                    )
                })
                .collect(),
        )),
        Err(ConnectError::TableNotFound(_)) => Ok(RemoteSchema::Missing),
        Err(error) => Err(error.into()),
    }
}

/// Classifies a declared type string. Length and precision suffixes such as
/// `VARCHAR(16777216)` or `NUMBER(38,0)` are ignored.
pub fn classify_declared_type(declared: &str) -> RemoteType {
    let base = declared
        .split('(')
        .next()
        .unwrap_or_default()
        .trim()
        .to_uppercase();
    match base.as_str() {
        "VARIANT" | "OBJECT" | "ARRAY" => RemoteType::Variant,
        "NUMBER" | "DECIMAL" | "NUMERIC" | "INT" | "INTEGER" | "BIGINT" | "SMALLINT"
        | "TINYINT" | "BYTEINT" | "FLOAT" | "FLOAT4" | "FLOAT8" | "DOUBLE"
        | "DOUBLE PRECISION" | "REAL" | "VARCHAR" | "CHAR" | "CHARACTER" | "STRING" | "TEXT"
        | "BOOLEAN" | "DATE" | "DATETIME" | "TIME" | "TIMESTAMP" | "TIMESTAMP_LTZ"
        | "TIMESTAMP_NTZ" | "TIMESTAMP_TZ" | "BINARY" | "VARBINARY" => RemoteType::Scalar,
        _ => RemoteType::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_declared_type() {
        assert_eq!(classify_declared_type("VARIANT"), RemoteType::Variant);
        assert_eq!(classify_declared_type("OBJECT"), RemoteType::Variant);
        assert_eq!(classify_declared_type("ARRAY"), RemoteType::Variant);
        assert_eq!(
            classify_declared_type("VARCHAR(16777216)"),
            RemoteType::Scalar
        );
        assert_eq!(classify_declared_type("NUMBER(38,0)"), RemoteType::Scalar);
        assert_eq!(classify_declared_type("timestamp_ntz"), RemoteType::Scalar);
        assert_eq!(classify_declared_type("GEOGRAPHY"), RemoteType::Other);
        assert_eq!(classify_declared_type(""), RemoteType::Other);
    }

    #[test]
    fn test_column_lookup_is_case_insensitive() {
        let schema = RemoteSchema::Present(
            [(
                "DATA".to_string(),
                RemoteColumn {
                    declared: "VARIANT".to_string(),
                    classification: RemoteType::Variant,
                },
            )]
            .into_iter()
            .collect(),
        );
        assert!(schema.column("data").is_some());
        assert!(schema.column("DATA").is_some());
        assert!(schema.column("other").is_none());
    }
}
