//! Suite configuration.
//!
//! Configuration is a flat set of string keys read from a properties file,
//! optionally overlaid with environment variables of the same name. It is
//! loaded once before any scenario runs and is read-only afterwards. Unlike a
//! lenient loader, a missing file or a missing key is reported as an error so
//! the suite aborts with a clear diagnostic instead of sending requests built
//! from empty values.
//!
//! # Example properties file
//!
//! ```text
//! # GitHub API test configuration
//! BASE_URL=https://api.github.com
//! OWNER_USERNAME=octocat
//! AUTH_TOKEN=ghp_xxx
//! REPO_NAME=hello-world
//! ```

use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};

use secrecy::SecretString;
use tracing::{debug, info};
use url::Url;

use crate::errors::ConfigError;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Base URL of the API under test.
pub const BASE_URL: &str = "BASE_URL";

/// Login of the account that owns the fixture repository.
pub const OWNER_USERNAME: &str = "OWNER_USERNAME";

/// Personal access token used as the bearer token.
pub const AUTH_TOKEN: &str = "AUTH_TOKEN";

/// Name of the pre-existing fixture repository.
pub const REPO_NAME: &str = "REPO_NAME";

/// All keys the suite requires.
pub const REQUIRED_KEYS: [&str; 4] = [BASE_URL, OWNER_USERNAME, AUTH_TOKEN, REPO_NAME];

/// Environment variable naming the properties file to load.
pub const CONFIG_PATH_ENV: &str = "API_TEST_CONFIG";

/// Properties file used when `API_TEST_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILENAME: &str = "config.properties";

/// Immutable mapping of configuration keys to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    values: HashMap<String, String>,
}

impl Configuration {
    /// Loads key-value pairs from a properties file.
    ///
    /// The file uses the Java properties format: `#` and `!` comments, `=`,
    /// `:` or whitespace separators, backslash escapes and `\` line
    /// continuations.
    ///
    /// # Errors
    ///
    /// - `ConfigError::NotFound` if the file does not exist
    /// - `ConfigError::Read` if the file cannot be read
    /// - `ConfigError::Parse` if the content is not valid properties text
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading configuration");

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let configuration = Self::parse(&content)?;
        info!(
            path = %path.display(),
            keys = configuration.values.len(),
            "Loaded configuration file"
        );
        Ok(configuration)
    }

    /// Parses properties text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let values = java_properties::read(content.as_bytes()).map_err(|err| {
            ConfigError::Parse {
                line: err.line_number(),
                message: err.to_string(),
            }
        })?;

        Ok(Self { values })
    }

    /// Collects the required keys from environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Overlays environment variables named like the required keys.
    pub fn with_env_overrides(mut self) -> Self {
        for key in REQUIRED_KEYS {
            if let Ok(value) = env::var(key) {
                debug!(key = key, "Configuration key overridden from environment");
                self.values.insert(key.to_string(), value);
            }
        }
        self
    }

    /// Returns the value for `key`, treating an empty value as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Returns the value for `key` or a `MissingKey` error.
    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }
}

/// Validated settings shared by every scenario.
///
/// Constructed once and passed explicitly to the client and scenarios. The
/// token is kept secret so it never shows up in `Debug` output.
#[derive(Debug)]
pub struct HarnessConfig {
    pub base_url: Url,
    pub owner: String,
    pub auth_token: SecretString,
    pub repo_name: String,
}

impl HarnessConfig {
    /// Validates a raw configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` for the first absent required key and
    /// `ConfigError::InvalidBaseUrl` if `BASE_URL` is not an absolute http(s)
    /// URL.
    pub fn from_configuration(configuration: &Configuration) -> Result<Self, ConfigError> {
        for key in REQUIRED_KEYS {
            configuration.require(key)?;
        }

        let raw_base_url = configuration.require(BASE_URL)?;
        let base_url = Url::parse(raw_base_url)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base())
            .ok_or_else(|| ConfigError::InvalidBaseUrl(raw_base_url.to_string()))?;

        Ok(Self {
            base_url,
            owner: configuration.require(OWNER_USERNAME)?.to_string(),
            auth_token: SecretString::from(configuration.require(AUTH_TOKEN)?.to_string()),
            repo_name: configuration.require(REPO_NAME)?.to_string(),
        })
    }

    /// Loads the suite configuration.
    ///
    /// The properties file is taken from `API_TEST_CONFIG`, or
    /// `config.properties` in the current directory. When the default file is
    /// absent the configuration comes from the environment alone; an
    /// explicitly named file must exist. Environment variables always win over
    /// file values.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        Self::load_from(explicit.as_deref())
    }

    /// Loads the suite configuration from an explicit file, or the default
    /// location when `path` is `None`.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let configuration = match path {
            Some(path) => Configuration::load(path)?,
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Configuration::load(&default_path)?
                } else {
                    debug!("No configuration file found, using environment only");
                    Configuration::default()
                }
            }
        };

        Self::from_configuration(&configuration.with_env_overrides())
    }
}

/// Default properties file location in the current directory.
pub fn default_config_path() -> PathBuf {
    let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    current_dir.join(DEFAULT_CONFIG_FILENAME)
}
