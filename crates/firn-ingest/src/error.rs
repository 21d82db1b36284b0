use thiserror::Error;

use firn_catalog::CatalogError;
use firn_connect::ConnectError;
use firn_frame::FrameError;

pub type IngestResult<T> = Result<T, IngestError>;

#[derive(Debug, Error)]
pub enum IngestError {
    /// A structured column holds a NaN or infinite float somewhere in its
    /// values. Raised before any remote call.
    #[error("column '{column}' contains a non-finite float, which has no JSON representation")]
    NonFiniteValue { column: String },
    /// A structured column holds a value that cannot be rendered as JSON.
    /// Raised before any remote call.
    #[error("column '{column}' contains a {detail} value, which has no JSON representation")]
    NonSerializableValue { column: String, detail: String },
    /// The remote column's declared type is not recognized, so there is no
    /// safe way to load structured data into it.
    #[error("column '{column}' has unrecognized remote type '{declared}'")]
    RemoteSchemaConflict { column: String, declared: String },
    #[error("table {table} already exists")]
    AlreadyExists { table: String },
    /// The merge or promotion step failed after rows were staged. The
    /// staging table has been dropped and the target table is unmodified.
    #[error("write to {table} aborted after staging load; target unmodified: {source}")]
    PartialWrite {
        table: String,
        #[source]
        source: Box<IngestError>,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Connect(#[from] ConnectError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Frame(#[from] FrameError),
}
