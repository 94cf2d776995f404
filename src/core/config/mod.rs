//! core::config
//!
//! Configuration store: loading, atomic persistence, and interactive setup.
//!
//! # Location
//!
//! Searched in order:
//! 1. `$GITRAY_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitray/config.toml` if it exists
//! 3. `~/.gitray/config.toml` (canonical write location)
//!
//! The file holds an access token, so it is written with mode 0600 on Unix.
//!
//! # Example
//!
//! ```no_run
//! use gitray::core::config::ConfigStore;
//! use gitray::ui::prompts::TerminalPrompter;
//!
//! let store = ConfigStore::new().unwrap();
//! // Runs first-time setup if nothing is stored yet
//! let config = store.get_config(&TerminalPrompter::new()).unwrap();
//! println!("Default base: {}", config.default_base());
//! ```

pub mod schema;

pub use schema::{Config, DEFAULT_API_BASE, FALLBACK_BASE};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::ui::output;
use crate::ui::prompts::{PromptError, Prompter};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "GITRAY_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,

    #[error("configuration setup did not finish: {0}")]
    Prompt(#[from] PromptError),
}

/// Persistent home of the user's [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Open the store at the default location.
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            path: Self::default_path()?,
        })
    }

    /// Open a store at an explicit path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the config file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the report log, kept next to the config file.
    pub fn reports_path(&self) -> PathBuf {
        self.path.with_file_name("reports.jsonl")
    }

    fn default_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }

        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg).join("gitray").join("config.toml");
            if path.exists() {
                return Ok(path);
            }
        }

        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".gitray").join("config.toml"))
    }

    /// Load the stored configuration.
    ///
    /// Returns `Ok(None)` if nothing has been stored yet.
    pub fn load(&self) -> Result<Option<Config>, ConfigError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::ReadError {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        let config: Config = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        config.validate()?;

        log::debug!("loaded config from {}", self.path.display());
        Ok(Some(config))
    }

    /// Load the configuration as a starting point for editing.
    ///
    /// A file that cannot be parsed or fails validation is set aside with a
    /// warning and setup starts from the defaults; it is only replaced once
    /// the new answers are saved.
    pub fn load_for_editing(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Ok(config) => Ok(config.unwrap_or_default()),
            Err(e @ (ConfigError::ParseError { .. } | ConfigError::InvalidValue(_))) => {
                log::warn!("{}; starting from the defaults", e);
                Ok(Config::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Write the configuration, replacing the previous file in one step.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        write_config_atomic(&self.path, config)?;
        log::debug!("wrote config to {}", self.path.display());
        Ok(())
    }

    /// Load the configuration, running first-time setup if there is none.
    ///
    /// A stored config without a token is treated like a missing one.
    pub fn get_config(&self, prompter: &dyn Prompter) -> Result<Config, ConfigError> {
        match self.load()? {
            Some(config) if config.has_token() => Ok(config),
            Some(config) => {
                output::print("No access token is stored yet; let's add one.");
                self.ask_configuration(&config, prompter)
            }
            None => {
                output::print("No configuration found; let's set gitray up.");
                self.ask_configuration(&Config::default(), prompter)
            }
        }
    }

    /// Ask for every setting again, using `current` as the defaults.
    ///
    /// Nothing is written unless every prompt is answered and the result is
    /// valid, so an aborted setup leaves the previous file intact.
    pub fn ask_configuration(
        &self,
        current: &Config,
        prompter: &dyn Prompter,
    ) -> Result<Config, ConfigError> {
        let mut next = current.clone();

        let token = if current.has_token() {
            prompter.password("GitHub access token (leave empty to keep the current one)")?
        } else {
            prompter.password("GitHub access token")?
        };
        let token = token.trim();
        if !token.is_empty() {
            next.token = token.to_string();
        } else if !current.has_token() {
            return Err(ConfigError::InvalidValue(
                "an access token is required".to_string(),
            ));
        }

        let base = prompter.input("Default base branch", Some(current.default_base()))?;
        next.default_base = non_blank(base);

        let comment = prompter.input(
            "Default review comment (leave empty for none)",
            current.default_comment.as_deref(),
        )?;
        next.default_comment = non_blank(comment);

        next.create_report =
            prompter.confirm("Create a report for each pull request?", current.create_report)?;

        self.save(&next)?;
        output::success(&format!("Configuration saved to {}", self.path.display()));
        Ok(next)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Write a config file atomically (write to temp, then rename).
fn write_config_atomic(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let contents =
        toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

    // Temp file in the same directory so the rename stays on one filesystem
    let temp_path = path.with_extension("toml.tmp");
    let write_err = |e| ConfigError::WriteError {
        path: temp_path.clone(),
        source: e,
    };

    let mut file = fs::File::create(&temp_path).map_err(write_err)?;
    restrict_permissions(&file).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;

    fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}
