use chrono::{DateTime, NaiveDate, Utc};

use crate::value::CellValue;

/// The storage class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Int64,
    Float64,
    Boolean,
    Utf8,
    Binary,
    Date,
    Timestamp,
    Object,
}

impl DataKind {
    /// Whether the column holds dynamically typed cells.
    pub fn is_object(&self) -> bool {
        matches!(self, DataKind::Object)
    }
}

/// Column storage. Every cell is optional; `None` means the cell is
/// missing entirely (and becomes a true NULL on the remote side).
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    Boolean(Vec<Option<bool>>),
    Utf8(Vec<Option<String>>),
    Binary(Vec<Option<Vec<u8>>>),
    Date(Vec<Option<NaiveDate>>),
    Timestamp(Vec<Option<DateTime<Utc>>>),
    Object(Vec<Option<CellValue>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int64(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
            ColumnData::Utf8(v) => v.len(),
            ColumnData::Binary(v) => v.len(),
            ColumnData::Date(v) => v.len(),
            ColumnData::Timestamp(v) => v.len(),
            ColumnData::Object(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> DataKind {
        match self {
            ColumnData::Int64(_) => DataKind::Int64,
            ColumnData::Float64(_) => DataKind::Float64,
            ColumnData::Boolean(_) => DataKind::Boolean,
            ColumnData::Utf8(_) => DataKind::Utf8,
            ColumnData::Binary(_) => DataKind::Binary,
            ColumnData::Date(_) => DataKind::Date,
            ColumnData::Timestamp(_) => DataKind::Timestamp,
            ColumnData::Object(_) => DataKind::Object,
        }
    }

    pub fn null_count(&self) -> usize {
        match self {
            ColumnData::Int64(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Float64(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Boolean(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Utf8(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Binary(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Date(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Timestamp(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Object(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn int64(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        Self::new(name, ColumnData::Int64(values))
    }

    pub fn float64(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Float64(values))
    }

    pub fn boolean(name: impl Into<String>, values: Vec<Option<bool>>) -> Self {
        Self::new(name, ColumnData::Boolean(values))
    }

    pub fn utf8(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self::new(name, ColumnData::Utf8(values))
    }

    pub fn object(name: impl Into<String>, values: Vec<Option<CellValue>>) -> Self {
        Self::new(name, ColumnData::Object(values))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn kind(&self) -> DataKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self::new(name, self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_len() {
        let column = Column::int64("id", vec![Some(1), None, Some(3)]);
        assert_eq!(column.kind(), DataKind::Int64);
        assert_eq!(column.len(), 3);
        assert_eq!(column.data().null_count(), 1);
        assert!(!column.kind().is_object());
    }

    #[test]
    fn test_object_column() {
        let column = Column::object("data", vec![Some(CellValue::Int(1)), None]);
        assert!(column.kind().is_object());
        assert_eq!(column.data().null_count(), 1);
    }
}
