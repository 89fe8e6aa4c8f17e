//! Configuration loaded from `workflow-admin.toml`.
//!
//! [`AppConfig`] holds the server, viewer and extension settings. Keys absent
//! from the file take their defaults; a missing default file means all
//! defaults. `WORKFLOW_ADMIN_BIND` takes precedence over the file's bind address.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::options::ExtensionOptions;

pub const DEFAULT_CONFIG_FILE: &str = "workflow-admin.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub viewer: ViewerConfig,

    #[serde(default)]
    pub demo: DemoConfig,

    /// Options of the workflow admin extension.
    #[serde(default)]
    pub extension: ExtensionOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Roles of the user browsing the admin.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    /// Seed the store with a few pull requests on startup.
    #[serde(default = "default_seed")]
    pub seed: bool,
}

// Default bind address: localhost on 8080.
fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

// The default viewer may edit.
fn default_roles() -> Vec<String> {
    vec!["EDIT".to_string()]
}

fn default_seed() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self { roles: default_roles() }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { seed: default_seed() }
    }
}

impl AppConfig {
    /// Loads `path`, or `workflow-admin.toml` in the current directory.
    ///
    /// An explicit path must exist; the default file may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::read(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() { Self::read(path)? } else { Self::default() }
            }
        };

        if let Ok(bind) = std::env::var("WORKFLOW_ADMIN_BIND")
            && !bind.is_empty()
        {
            config.server.bind = bind;
        }

        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.extension.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("parsing {}", path.display()))
    }
}
