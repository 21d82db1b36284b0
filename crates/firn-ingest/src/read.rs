use serde_json::Value as JsonValue;

use firn_catalog::TableName;
use firn_connect::{SessionContext, SqlValue, StatementOutput};
use firn_frame::{CellValue, Column, Frame};

use crate::error::IngestResult;

#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Lowercase column names on the way in. On by default, mirroring the
    /// uppercase folding applied on the way out.
    pub lowercase_columns: bool,
    /// Parse text columns whose every value is a JSON object or array back
    /// into structured cells.
    pub parse_json: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            lowercase_columns: true,
            parse_json: false,
        }
    }
}

/// Reads an entire table into a frame.
pub async fn read_table(
    ctx: &SessionContext,
    table: &str,
    options: &ReadOptions,
) -> IngestResult<Frame> {
    let name = TableName::resolve(table, ctx).await?;
    fetch_frame(ctx, &format!("SELECT * FROM {name}"), options).await
}

/// Runs a query and maps its result rows into a frame.
pub async fn fetch_frame(
    ctx: &SessionContext,
    sql: &str,
    options: &ReadOptions,
) -> IngestResult<Frame> {
    let output = ctx.executor().execute(sql, &[]).await?;
    frame_from_output(&output, options)
}

fn frame_from_output(output: &StatementOutput, options: &ReadOptions) -> IngestResult<Frame> {
    let mut columns = Vec::with_capacity(output.columns.len());
    for (index, name) in output.columns.iter().enumerate() {
        let name = if options.lowercase_columns {
            name.to_lowercase()
        } else {
            name.clone()
        };
        let cells = output
            .rows
            .iter()
            .map(|row| row.get(index).unwrap_or(&SqlValue::Null))
            .collect::<Vec<_>>();
        columns.push(column_from_cells(name, &cells, options));
    }
    Ok(Frame::new(columns)?)
}

/// Picks the narrowest column type that holds every value: integers, then
/// floats, booleans, text, and text as a last resort for mixed values.
fn column_from_cells(name: String, cells: &[&SqlValue], options: &ReadOptions) -> Column {
    let mut ints = false;
    let mut floats = false;
    let mut bools = false;
    let mut strs = false;
    for cell in cells {
        match cell {
            SqlValue::Null => {}
            SqlValue::Int(_) => ints = true,
            SqlValue::Float(_) => floats = true,
            SqlValue::Bool(_) => bools = true,
            SqlValue::Str(_) => strs = true,
        }
    }
    if ints && !floats && !bools && !strs {
        Column::int64(
            name,
            cells
                .iter()
                .map(|cell| match cell {
                    SqlValue::Int(i) => Some(*i),
                    _ => None,
                })
                .collect(),
        )
    } else if (floats || ints) && !bools && !strs {
        Column::float64(
            name,
            cells
                .iter()
                .map(|cell| match cell {
                    SqlValue::Float(f) => Some(*f),
                    SqlValue::Int(i) => Some(*i as f64),
                    _ => None,
                })
                .collect(),
        )
    } else if bools && !ints && !floats && !strs {
        Column::boolean(
            name,
            cells
                .iter()
                .map(|cell| match cell {
                    SqlValue::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect(),
        )
    } else {
        let values = cells
            .iter()
            .map(|cell| match cell {
                SqlValue::Null => None,
                SqlValue::Str(s) => Some(s.clone()),
                SqlValue::Int(i) => Some(i.to_string()),
                SqlValue::Float(f) => Some(f.to_string()),
                SqlValue::Bool(b) => Some(b.to_string()),
            })
            .collect::<Vec<_>>();
        if options.parse_json && strs && !ints && !floats && !bools {
            if let Some(parsed) = parse_json_cells(&values) {
                return Column::object(name, parsed);
            }
        }
        Column::utf8(name, values)
    }
}

/// Parses every present value as JSON, keeping the column only when all of
/// them are objects or arrays. Plain text columns stay text.
fn parse_json_cells(values: &[Option<String>]) -> Option<Vec<Option<CellValue>>> {
    let mut cells = Vec::with_capacity(values.len());
    for value in values {
        match value {
            None => cells.push(None),
            Some(text) => match serde_json::from_str::<JsonValue>(text) {
                Ok(json @ (JsonValue::Object(_) | JsonValue::Array(_))) => {
                    cells.push(Some(CellValue::from_json(&json)));
                }
                _ => return None,
            },
        }
    }
    Some(cells)
}
