//! Moving frames in and out of remote tables.
//!
//! The write path reconciles local columns that hold nested values against
//! the remote table's schema: structured columns are serialized to JSON
//! text, loaded, and converted to VARIANT — directly when the target is
//! being created, or through an ephemeral staging table when appending to
//! an existing VARIANT column.

mod eligibility;
mod error;
mod execute;
mod plan;
mod probe;
mod read;
mod schema;
mod serialize;
mod sql;
mod write;

pub use eligibility::*;
pub use error::*;
pub use execute::*;
pub use plan::*;
pub use probe::*;
pub use read::*;
pub use schema::*;
pub use serialize::*;
pub use write::*;
