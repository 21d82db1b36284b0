use thiserror::Error;

pub type ConnectResult<T> = Result<T, ConnectError>;

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("profile error: {0}")]
    Profile(String),
    #[error("table not found: {0}")]
    TableNotFound(String),
    /// A failure reported by the remote system, passed through unchanged.
    #[error("sql error: {0}")]
    Sql(String),
    #[error("internal error: {0}")]
    Internal(String),
}
