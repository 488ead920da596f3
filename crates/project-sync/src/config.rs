//! Application configuration
//!
//! Loaded from `config.json` in the app config directory, then overridden
//! by environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::{DomainError, DomainResult};

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_GIST_API: &str = "https://api.github.com";

pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_GIST_API: &str = "PROJECT_CARDS_GIST_API";
pub const ENV_USER: &str = "PROJECT_CARDS_USER";
pub const ENV_USER_NAME: &str = "PROJECT_CARDS_USER_NAME";

/// Local account used by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub uid: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Gist export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub github_token: Option<String>,
    #[serde(default = "default_gist_api")]
    pub api_base: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            api_base: default_gist_api(),
        }
    }
}

fn default_gist_api() -> String {
    DEFAULT_GIST_API.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub account: Option<AccountConfig>,
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    /// Read `config.json` from `dir`. A missing file yields defaults.
    pub fn load_file(dir: &Path) -> DomainResult<Self> {
        let path = dir.join(CONFIG_FILE);
        match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                DomainError::InvalidInput(format!("{}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(DomainError::Internal(format!("{}: {}", path.display(), e))),
        }
    }

    /// Load from `dir` and apply the process environment
    pub fn load(dir: &Path) -> DomainResult<Self> {
        let mut config = Self::load_file(dir)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from `lookup`; empty values are ignored
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get(ENV_GITHUB_TOKEN) {
            self.export.github_token = Some(token);
        }
        if let Some(api) = get(ENV_GIST_API) {
            self.export.api_base = api;
        }
        if let Some(uid) = get(ENV_USER) {
            let display_name = get(ENV_USER_NAME)
                .or_else(|| self.account.as_ref().and_then(|a| a.display_name.clone()));
            self.account = Some(AccountConfig { uid, display_name });
        } else if let (Some(name), Some(account)) = (get(ENV_USER_NAME), self.account.as_mut()) {
            account.display_name = Some(name);
        }
    }

    pub fn save(&self, dir: &Path) -> DomainResult<()> {
        std::fs::create_dir_all(dir).map_err(|e| DomainError::Internal(e.to_string()))?;
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(CONFIG_FILE), text).map_err(|e| DomainError::Internal(e.to_string()))
    }
}
