//! Configuration loading via `ortho-config`.
//!
//! Values merge defaults, `butler.toml` discovery, and `BUTLER_*`
//! environment variables. Command-line flags are applied last through
//! [`ButlerConfig::with_overrides`].

use std::ffi::OsString;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::client::BasicAuth;
use crate::store::LocalStore;
use crate::url::ensure_protocol;

/// Default directory for exported jobs.
pub const DEFAULT_JOBS_DIR: &str = "jobs";

/// Default path of the plugin manifest.
pub const DEFAULT_PLUGINS_FILE: &str = "plugins.txt";

/// Connection and storage settings shared by every subcommand.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "BUTLER",
    discovery(
        app_name = "butler",
        env_var = "BUTLER_CONFIG_PATH",
        config_file_name = "butler.toml",
        dotfile_name = ".butler.toml",
        project_file_name = "butler.toml"
    )
)]
pub struct ButlerConfig {
    /// Jenkins base URL. `http://` is assumed when no scheme is given.
    pub server: Option<String>,
    /// Account used for Basic authentication.
    pub username: Option<String>,
    /// Password or API token for `username`.
    pub password: Option<String>,
    /// Directory holding one subdirectory per exported job.
    #[ortho_config(default = DEFAULT_JOBS_DIR.to_owned())]
    pub jobs_dir: String,
    /// Plugin manifest path.
    #[ortho_config(default = DEFAULT_PLUGINS_FILE.to_owned())]
    pub plugins_file: String,
}

/// Values supplied on the command line, each replacing the configured value
/// when present.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConfigOverrides {
    /// `--server`
    pub server: Option<String>,
    /// `--username`
    pub username: Option<String>,
    /// `--password`
    pub password: Option<String>,
    /// `--jobs-dir`
    pub jobs_dir: Option<String>,
    /// `--plugins-file`
    pub plugins_file: Option<String>,
}

/// Resolved server address and credentials.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Connection {
    /// Server URL including its scheme.
    pub server: String,
    /// Basic authentication, present when a username is configured.
    pub auth: Option<BasicAuth>,
}

impl ButlerConfig {
    /// Loads configuration without parsing CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when merging sources fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("butler")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Applies command-line values on top of the loaded configuration.
    #[must_use]
    pub fn with_overrides(self, overrides: ConfigOverrides) -> Self {
        Self {
            server: overrides.server.or(self.server),
            username: overrides.username.or(self.username),
            password: overrides.password.or(self.password),
            jobs_dir: overrides.jobs_dir.unwrap_or(self.jobs_dir),
            plugins_file: overrides.plugins_file.unwrap_or(self.plugins_file),
        }
    }

    /// Returns the connection settings, or `None` when no server is set.
    #[must_use]
    pub fn connection(&self) -> Option<Connection> {
        let server = ensure_protocol(self.server.as_deref()?.trim());
        if server.is_empty() {
            return None;
        }
        let auth = self
            .username
            .as_deref()
            .filter(|username| !username.is_empty())
            .map(|username| BasicAuth::new(username, self.password.clone().unwrap_or_default()));
        Some(Connection { server, auth })
    }

    /// Local store rooted at the configured paths.
    #[must_use]
    pub fn store(&self) -> LocalStore {
        LocalStore::new(
            Utf8PathBuf::from(&self.jobs_dir),
            Utf8PathBuf::from(&self.plugins_file),
        )
    }
}

impl Default for ButlerConfig {
    fn default() -> Self {
        Self {
            server: None,
            username: None,
            password: None,
            jobs_dir: DEFAULT_JOBS_DIR.to_owned(),
            plugins_file: DEFAULT_PLUGINS_FILE.to_owned(),
        }
    }
}

/// Errors raised during configuration loading.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
