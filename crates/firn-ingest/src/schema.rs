use firn_frame::{DataKind, Frame};

/// The remote scalar type a local column loads into.
///
/// Object columns map to text here: by the time DDL is generated they have
/// either been serialized to JSON text (and are later promoted to VARIANT)
/// or they hold scalar-only values that load as text.
pub fn remote_scalar_type(kind: DataKind) -> &'static str {
    match kind {
        DataKind::Int64 => "INT",
        DataKind::Float64 => "FLOAT",
        DataKind::Boolean => "BOOLEAN",
        DataKind::Utf8 => "VARCHAR",
        DataKind::Binary => "BINARY",
        DataKind::Date => "DATE",
        DataKind::Timestamp => "TIMESTAMP_NTZ",
        DataKind::Object => "VARCHAR",
    }
}

/// Column definitions for the table that receives the bulk load, in frame
/// order. Structured columns are text at this point; promotion happens
/// after the load.
pub(crate) fn load_column_defs(frame: &Frame) -> Vec<(String, String)> {
    frame
        .columns()
        .iter()
        .map(|column| {
            (
                column.name().to_string(),
                remote_scalar_type(column.kind()).to_string(),
            )
        })
        .collect()
}
