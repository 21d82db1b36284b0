use std::sync::Arc;

use firn_common::config::{ClientConfig, Profile};

use crate::error::{ConnectError, ConnectResult};
use crate::executor::{SqlExecutor, SqlValue};

/// A session pairs a connection profile with the executor that serves it.
///
/// The session itself holds no connection state; the executor decides when
/// to connect and how long to keep the connection alive.
#[derive(Clone)]
pub struct SessionContext {
    profile: Profile,
    executor: Arc<dyn SqlExecutor>,
}

impl SessionContext {
    pub fn new(profile: Profile, executor: Arc<dyn SqlExecutor>) -> Self {
        Self { profile, executor }
    }

    /// Builds a session from a named profile in the client configuration.
    pub fn from_config(
        config: &ClientConfig,
        profile: Option<&str>,
        executor: Arc<dyn SqlExecutor>,
    ) -> ConnectResult<Self> {
        let profile = config
            .profile(profile)
            .map_err(|e| ConnectError::Profile(e.to_string()))?
            .clone();
        Ok(Self::new(profile, executor))
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn executor(&self) -> &Arc<dyn SqlExecutor> {
        &self.executor
    }

    /// The database the session currently resolves unqualified names against.
    /// Queries the connection first and falls back to the profile default.
    pub async fn current_database(&self) -> ConnectResult<Option<String>> {
        match self.query_scalar("SELECT CURRENT_DATABASE()").await? {
            Some(db) => Ok(Some(db)),
            None => Ok(self.profile.database.clone()),
        }
    }

    pub async fn current_schema(&self) -> ConnectResult<Option<String>> {
        match self.query_scalar("SELECT CURRENT_SCHEMA()").await? {
            Some(schema) => Ok(Some(schema)),
            None => Ok(self.profile.schema.clone()),
        }
    }

    pub async fn current_warehouse(&self) -> ConnectResult<Option<String>> {
        match self.query_scalar("SELECT CURRENT_WAREHOUSE()").await? {
            Some(warehouse) => Ok(Some(warehouse)),
            None => Ok(self.profile.warehouse.clone()),
        }
    }

    pub async fn current_role(&self) -> ConnectResult<Option<String>> {
        match self.query_scalar("SELECT CURRENT_ROLE()").await? {
            Some(role) => Ok(Some(role)),
            None => Ok(self.profile.role.clone()),
        }
    }

    async fn query_scalar(&self, sql: &str) -> ConnectResult<Option<String>> {
        let output = self.executor.execute(sql, &[]).await?;
        let value = output.first_row().and_then(|row| row.first());
        Ok(match value {
            Some(SqlValue::Str(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("account", &self.profile.account)
            .field("user", &self.profile.user)
            .finish_non_exhaustive()
    }
}
