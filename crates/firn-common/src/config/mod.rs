use std::collections::HashMap;
use std::path::Path;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{CommonError, CommonResult};

const DEFAULT_CONFIG: &str = include_str!("default.toml");

/// The default profile file searched in the working directory.
pub const PROFILES_FILE: &str = "profiles.toml";

/// Client configuration holding named connection profiles.
///
/// Configuration is merged from three layers, later layers winning:
/// built-in defaults, the profile file, and `FIRN__`-prefixed environment
/// variables (with `__` as the section separator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub default_profile: String,
    pub profiles: HashMap<String, Profile>,
}

/// A single connection profile.
///
/// Credential material and the wire protocol are owned by the executor
/// implementation; the profile only carries the parameters needed to
/// establish and scope a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub account: String,
    pub user: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub warehouse: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub authenticator: Authenticator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Authenticator {
    #[default]
    Password,
    KeyPair,
    ExternalBrowser,
}

impl ClientConfig {
    pub fn load() -> CommonResult<Self> {
        Self::load_from(PROFILES_FILE)
    }

    pub fn load_from(path: impl AsRef<Path>) -> CommonResult<Self> {
        Figment::from(Toml::string(DEFAULT_CONFIG))
            .admerge(Toml::file(path))
            .admerge(Env::prefixed("FIRN__").map(|p| p.as_str().replace("__", ".").into()))
            .extract()
            .map_err(|e| CommonError::Configuration(e.to_string()))
    }

    /// Looks up a profile by name, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> CommonResult<&Profile> {
        let name = name.unwrap_or(&self.default_profile);
        self.profiles.get(name).ok_or_else(|| {
            let mut available = self.profiles.keys().cloned().collect::<Vec<_>>();
            available.sort();
            CommonError::Configuration(format!(
                "profile '{}' not found (available profiles: {})",
                name,
                available.join(", ")
            ))
        })
    }

    pub fn profile_names(&self) -> Vec<&str> {
        let mut names = self.profiles.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}
