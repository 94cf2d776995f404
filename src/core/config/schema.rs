//! core::config::schema
//!
//! Configuration schema.
//!
//! # Example
//!
//! ```toml
//! token = "ghp_..."
//! default_base = "main"
//! default_comment = "Ready for review"
//! create_report = true
//! # api_base = "https://github.example.com/api/v3"
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing and before every write, so a file that
//! gitray wrote is always one it can read back.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Base branch used when neither a flag nor the config names one.
pub const FALLBACK_BASE: &str = "main";

/// Public GitHub REST API.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User configuration.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Personal access token for the forge API
    pub token: String,

    /// Base branch for new pull requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_base: Option<String>,

    /// Review comment attached to new or forwarded pull requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_comment: Option<String>,

    /// Emit a report record after each pull-request change
    pub create_report: bool,

    /// API base URL (for GitHub Enterprise)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            default_base: None,
            default_comment: None,
            create_report: true,
            api_base: None,
        }
    }
}

// Custom Debug to avoid exposing the token
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &if self.token.is_empty() { "" } else { "[redacted]" })
            .field("default_base", &self.default_base)
            .field("default_comment", &self.default_comment)
            .field("create_report", &self.create_report)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Config {
    /// Base branch, falling back to `main`.
    pub fn default_base(&self) -> &str {
        self.default_base.as_deref().unwrap_or(FALLBACK_BASE)
    }

    /// API base URL, falling back to the public GitHub API.
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    /// Whether an access token has been stored.
    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base) = &self.default_base {
            if base.trim().is_empty() || base.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidValue(format!(
                    "default_base '{}' is not a valid branch name",
                    base
                )));
            }
        }

        if let Some(comment) = &self.default_comment {
            if comment.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "default_comment must not be blank; remove it instead".to_string(),
                ));
            }
        }

        if let Some(api_base) = &self.api_base {
            if !api_base.starts_with("https://") && !api_base.starts_with("http://") {
                return Err(ConfigError::InvalidValue(format!(
                    "api_base '{}' must start with http:// or https://",
                    api_base
                )));
            }
        }

        Ok(())
    }
}
