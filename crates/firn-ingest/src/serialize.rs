use firn_frame::{CellJsonError, Column, ColumnData};

use crate::error::{IngestError, IngestResult};

/// Serializes an object column into a text column of canonical JSON.
///
/// Missing cells stay missing (they load as true NULLs); an explicit null
/// *inside* a value is rendered as the JSON `null` literal. The two never
/// collapse into each other. Pure; the input column is not modified.
pub fn serialize_column(column: &Column) -> IngestResult<Column> {
    let ColumnData::Object(cells) = column.data() else {
        return Err(IngestError::InvalidArgument(format!(
            "column '{}' is not an object column",
            column.name()
        )));
    };
    let mut values = Vec::with_capacity(cells.len());
    for cell in cells {
        match cell {
            None => values.push(None),
            Some(value) => {
                let json = value.to_json().map_err(|error| match error {
                    CellJsonError::NonFiniteFloat => IngestError::NonFiniteValue {
                        column: column.name().to_string(),
                    },
                    CellJsonError::Unrepresentable(name) => IngestError::NonSerializableValue {
                        column: column.name().to_string(),
                        detail: name.to_string(),
                    },
                })?;
                values.push(Some(json.to_string()));
            }
        }
    }
    Ok(Column::utf8(column.name(), values))
}
