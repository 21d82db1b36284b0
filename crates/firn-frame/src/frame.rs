use std::collections::HashSet;

use crate::column::Column;
use crate::error::{FrameError, FrameResult};

/// An in-memory columnar table: an ordered set of equal-length named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    columns: Vec<Column>,
}

impl Frame {
    /// Builds a frame, validating that all columns have the same length and
    /// that column names are unique.
    pub fn new(columns: Vec<Column>) -> FrameResult<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name().to_string()) {
                return Err(FrameError::DuplicateColumn(column.name().to_string()));
            }
        }
        if let Some(first) = columns.first() {
            let expected = first.len();
            for column in &columns {
                if column.len() != expected {
                    return Err(FrameError::LengthMismatch {
                        column: column.name().to_string(),
                        expected,
                        actual: column.len(),
                    });
                }
            }
        }
        Ok(Self { columns })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Replaces a column in place, keeping its position.
    pub fn replace_column(&mut self, column: Column) -> FrameResult<()> {
        let slot = self
            .columns
            .iter_mut()
            .find(|c| c.name() == column.name())
            .ok_or_else(|| FrameError::ColumnNotFound(column.name().to_string()))?;
        if column.len() != slot.len() {
            return Err(FrameError::LengthMismatch {
                column: column.name().to_string(),
                expected: slot.len(),
                actual: column.len(),
            });
        }
        *slot = column;
        Ok(())
    }

    /// Returns a copy of the frame with every column renamed through `f`.
    /// Fails if the mapping introduces duplicate names.
    pub fn renamed(&self, f: impl Fn(&str) -> String) -> FrameResult<Self> {
        Self::new(
            self.columns
                .iter()
                .map(|c| c.renamed(f(c.name())))
                .collect(),
        )
    }
}
