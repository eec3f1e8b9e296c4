use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::path::Path;

pub const DEFAULT_HOST: &str = "bittrex.com";
pub const DEFAULT_VERSION: &str = "v1.1";

#[derive(Debug, Clone)]
pub struct BittrexConfig {
    pub api_key: Secret<String>,
    pub api_secret: Secret<String>,
    pub host: String,
    pub version: String,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for BittrexConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("BittrexConfig", 4)?;
        state.serialize_field("key", "[REDACTED]")?;
        state.serialize_field("secret", "[REDACTED]")?;
        state.serialize_field("host", &self.host)?;
        state.serialize_field("version", &self.version)?;
        state.end()
    }
}

// Custom Deserialize implementation matching the config file contract:
// {"key": ..., "secret": ..., "version"?: ...}
impl<'de> Deserialize<'de> for BittrexConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct BittrexConfigHelper {
            key: String,
            secret: String,
            #[serde(default = "default_host")]
            host: String,
            #[serde(default = "default_version")]
            version: String,
        }

        let helper = BittrexConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: Secret::new(helper.key),
            api_secret: Secret::new(helper.secret),
            host: helper.host,
            version: helper.version,
        })
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

impl BittrexConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            api_secret: Secret::new(api_secret),
            host: DEFAULT_HOST.to_string(),
            version: DEFAULT_VERSION.to_string(),
        }
    }

    /// Load configuration from a JSON file `{"key", "secret", "version"?}`
    ///
    /// `version` defaults to `v1.1` when absent.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::InvalidConfiguration(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            ConfigError::InvalidConfiguration(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `BITTREX_API_KEY`
    /// - `BITTREX_API_SECRET`
    /// - `BITTREX_HOST` (optional)
    /// - `BITTREX_VERSION` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("BITTREX_API_KEY")
            .map_err(|_| ConfigError::MissingEnvironmentVariable("BITTREX_API_KEY".to_string()))?;

        let api_secret = env::var("BITTREX_API_SECRET").map_err(|_| {
            ConfigError::MissingEnvironmentVariable("BITTREX_API_SECRET".to_string())
        })?;

        let host = env::var("BITTREX_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let version = env::var("BITTREX_VERSION").unwrap_or_else(|_| DEFAULT_VERSION.to_string());

        Ok(Self {
            api_key: Secret::new(api_key),
            api_secret: Secret::new(api_secret),
            host,
            version,
        })
    }

    /// Create configuration for public market-data endpoints only
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(String::new(), String::new())
    }

    /// Check if this configuration has credentials for private endpoints
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.api_secret.expose_secret().is_empty()
    }

    /// Set a custom API host
    #[must_use]
    pub fn host(mut self, host: String) -> Self {
        self.host = host;
        self
    }

    /// Set the API version path segment
    #[must_use]
    pub fn version(mut self, version: String) -> Self {
        self.version = version;
        self
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get API secret (use carefully - exposes secret)
    pub fn api_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
