//! Configuration management for the `kanban-report` binary.
//!
//! Settings are layered, lowest precedence first:
//! - TOML configuration file under the XDG config directory
//! - `KANBAN_*` environment variables
//! - command-line flags
//!
//! The library itself takes no configuration file; it only sees
//! [`ConnectionOptions`](crate::api::ConnectionOptions).
//!
//! ## Example
//!
//! ```rust,no_run
//! use kanban_report::Config;
//!
//! let file = Config::load_from_file().unwrap();
//! let env = Config::load_from_env().unwrap();
//!
//! // Environment values win over the file
//! let merged = file.merge(env);
//! println!("organization: {:?}", merged.organization);
//! ```

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const APP_DIR: &str = "kanban-report";
const CONFIG_FILE: &str = "config.toml";

pub const ORGANIZATION_ENV: &str = "KANBAN_ORGANIZATION";
pub const PROJECT_ENV: &str = "KANBAN_PROJECT";
pub const PAT_ENV: &str = "KANBAN_PAT";
pub const URL_ENV: &str = "KANBAN_URL";
pub const TEAM_ENV: &str = "KANBAN_TEAM";
pub const MAX_CONCURRENT_REQUESTS_ENV: &str = "KANBAN_MAX_CONCURRENT_REQUESTS";

const SAMPLE_CONFIG: &str = r#"# kanban-report configuration
# Location: $XDG_CONFIG_HOME/kanban-report/config.toml (defaults to ~/.config)

# Azure DevOps organization (required)
# organization = "your-organization"

# Azure DevOps project (required)
# project = "your-project"

# Personal Access Token (required, consider KANBAN_PAT instead)
# pat = "your-pat-token"

# Team used by the members and current commands
# team = "Your Team"

# Server URL (optional, defaults to https://dev.azure.com)
# url = "https://dev.azure.com"

# Maximum number of concurrent comment requests (optional, defaults to 10)
# max_concurrent_requests = 10
"#;

/// Configuration assembled from the file, the environment and the command line.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub organization: Option<String>,
    pub project: Option<String>,
    pub pat: Option<String>,
    /// Server URL, e.g. an on-premises collection.
    pub url: Option<String>,
    pub team: Option<String>,
    pub max_concurrent_requests: Option<usize>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("pat", &self.pat.as_ref().map(|_| "[REDACTED]"))
            .field("url", &self.url)
            .field("team", &self.team)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .finish()
    }
}

impl Config {
    /// Load configuration from the XDG config directory.
    ///
    /// A missing file yields an empty configuration.
    pub fn load_from_file() -> Result<Self, ConfigError> {
        Self::load_from_path(&Self::get_config_path()?)
    }

    /// Load configuration from a specific TOML file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config.without_empty_values())
    }

    /// Load configuration from `KANBAN_*` environment variables.
    ///
    /// Empty variables are treated as unset.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let max_concurrent_requests = env_value(MAX_CONCURRENT_REQUESTS_ENV)
            .map(|raw| {
                raw.parse::<usize>().map_err(|_| ConfigError::InvalidSetting {
                    field: MAX_CONCURRENT_REQUESTS_ENV.to_string(),
                    value: raw.clone(),
                    expected: "a positive integer".to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            organization: env_value(ORGANIZATION_ENV),
            project: env_value(PROJECT_ENV),
            pat: env_value(PAT_ENV),
            url: env_value(URL_ENV),
            team: env_value(TEAM_ENV),
            max_concurrent_requests,
        })
    }

    /// Path of the configuration file: `$XDG_CONFIG_HOME/kanban-report/config.toml`,
    /// or `~/.config/kanban-report/config.toml` when the variable is unset.
    pub fn get_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = match std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .ok_or_else(|| ConfigError::FileReadError {
                    path: PathBuf::from("~/.config"),
                    message: "could not determine home directory".to_string(),
                })?
                .join(".config"),
        };
        Ok(config_dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Merge two configurations; values present in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            organization: other.organization.or(self.organization),
            project: other.project.or(self.project),
            pat: other.pat.or(self.pat),
            url: other.url.or(self.url),
            team: other.team.or(self.team),
            max_concurrent_requests: other.max_concurrent_requests.or(self.max_concurrent_requests),
        }
    }

    /// Write a commented sample configuration unless a file already exists.
    ///
    /// Returns the path when a file was created.
    pub fn create_sample_config() -> Result<Option<PathBuf>, ConfigError> {
        Self::create_sample_config_at(&Self::get_config_path()?)
    }

    pub fn create_sample_config_at(path: &Path) -> Result<Option<PathBuf>, ConfigError> {
        if path.exists() {
            return Ok(None);
        }
        let write_error = |e: std::io::Error| ConfigError::FileWriteError {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(write_error)?;
        }
        fs::write(path, SAMPLE_CONFIG).map_err(write_error)?;
        Ok(Some(path.to_path_buf()))
    }

    pub fn require_organization(&self) -> Result<&str, ConfigError> {
        require(self.organization.as_deref(), "organization", ORGANIZATION_ENV)
    }

    pub fn require_project(&self) -> Result<&str, ConfigError> {
        require(self.project.as_deref(), "project", PROJECT_ENV)
    }

    pub fn require_pat(&self) -> Result<&str, ConfigError> {
        require(self.pat.as_deref(), "pat", PAT_ENV)
    }

    pub fn require_team(&self) -> Result<&str, ConfigError> {
        require(self.team.as_deref(), "team", TEAM_ENV)
    }

    fn without_empty_values(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            organization: keep(self.organization),
            project: keep(self.project),
            pat: keep(self.pat),
            url: keep(self.url),
            team: keep(self.team),
            max_concurrent_requests: self.max_concurrent_requests,
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn require<'a>(value: Option<&'a str>, field: &str, env_var: &str) -> Result<&'a str, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingRequired {
        field: field.to_string(),
        env_var: env_var.to_string(),
    })
}
