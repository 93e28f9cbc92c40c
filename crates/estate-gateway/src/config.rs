//! Gateway configuration
//!
//! Loaded from a TOML file, then overridden from `ESTATE_*` environment
//! variables, then validated. Every section is optional; a missing file
//! section falls back to the defaults below.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8952
//! max_report_bytes = 10485760
//! cors = true
//!
//! [ledger]
//! backend = "filesystem"
//! path = "./data/ledger"
//!
//! [object_store]
//! backend = "filesystem"
//! path = "./data/reports"
//!
//! [lifecycle]
//! asset_ids = "caller-supplied"
//! offers = "strict"
//!
//! [logging]
//! filter = "info"
//! ```

use estate_core::LifecyclePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "ESTATE_";

/// Configuration failures
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// File that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config: {source}")]
    Parse {
        /// Parser error
        #[from]
        source: toml::de::Error,
    },

    /// An `ESTATE_*` variable holds an unusable value
    #[error("Invalid value {value:?} for {key}")]
    Env {
        /// Variable name
        key: String,
        /// Rejected value
        value: String,
    },

    /// Values parse but do not make sense together
    #[error("Invalid configuration: {message}")]
    Invalid {
        /// What is wrong
        message: String,
    },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Storage backend for a collaborator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Process memory; gone when the process exits
    #[default]
    Memory,
    /// Files under the configured path
    Filesystem,
}

impl FromStr for Backend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Backend::Memory),
            "filesystem" => Ok(Backend::Filesystem),
            _ => Err(()),
        }
    }
}

/// `[server]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Upper bound on request bodies, which caps uploaded reports
    pub max_report_bytes: usize,
    /// Answer with permissive CORS headers
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8952,
            max_report_bytes: 10 * 1024 * 1024,
            cors: true,
        }
    }
}

/// `[ledger]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Where records are kept
    pub backend: Backend,
    /// Directory for the filesystem backend
    pub path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Memory,
            path: PathBuf::from("./data/ledger"),
        }
    }
}

/// `[object_store]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectStoreConfig {
    /// Where reports are kept
    pub backend: Backend,
    /// Directory for the filesystem backend
    pub path: PathBuf,
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Memory,
            path: PathBuf::from("./data/reports"),
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Complete gateway configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP listener
    pub server: ServerConfig,
    /// Record storage
    pub ledger: LedgerConfig,
    /// Report storage
    pub object_store: ObjectStoreConfig,
    /// Id and offer policies
    pub lifecycle: LifecyclePolicy,
    /// Log filter
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Load from an optional file, apply process environment overrides and
    /// validate
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without environment overrides
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `ESTATE_*` variables from the process environment
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `ESTATE_*` overrides from an explicit variable list
    pub fn merge_with_vars<I, K, V>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.into();
            let bad_value = || ConfigError::Env {
                key: key.as_ref().to_string(),
                value: value.clone(),
            };

            match name {
                "HOST" => self.server.host = value.clone(),
                "PORT" => self.server.port = value.parse().map_err(|_| bad_value())?,
                "LEDGER_BACKEND" => self.ledger.backend = value.parse().map_err(|_| bad_value())?,
                "LEDGER_PATH" => self.ledger.path = PathBuf::from(&value),
                "OBJECT_STORE_BACKEND" => {
                    self.object_store.backend = value.parse().map_err(|_| bad_value())?
                }
                "OBJECT_STORE_PATH" => self.object_store.path = PathBuf::from(&value),
                "LOG" => self.logging.filter = value.clone(),
                _ => {}
            }
        }
        Ok(())
    }

    /// Reject values the gateway cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::invalid("server.host cannot be empty"));
        }
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port must be non-zero"));
        }
        if self.server.max_report_bytes == 0 {
            return Err(ConfigError::invalid(
                "server.max_report_bytes must be greater than zero",
            ));
        }
        if self.ledger.backend == Backend::Filesystem && self.ledger.path.as_os_str().is_empty() {
            return Err(ConfigError::invalid(
                "ledger.path is required for the filesystem backend",
            ));
        }
        if self.object_store.backend == Backend::Filesystem
            && self.object_store.path.as_os_str().is_empty()
        {
            return Err(ConfigError::invalid(
                "object_store.path is required for the filesystem backend",
            ));
        }
        Ok(())
    }

    /// Fail unless the ledger outlives the process
    ///
    /// A one-shot command against the memory ledger starts from nothing and
    /// its writes vanish on exit.
    pub fn require_persistent_ledger(&self) -> Result<(), ConfigError> {
        if self.ledger.backend == Backend::Memory {
            return Err(ConfigError::invalid(
                "ledger.backend is \"memory\"; one-shot calls need the \"filesystem\" backend \
                 (set it in the config file or with ESTATE_LEDGER_BACKEND)",
            ));
        }
        Ok(())
    }

    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use estate_core::{AssetIdPolicy, OfferPolicy};

    #[test]
    fn test_defaults_match_legacy_backend() {
        let config = GatewayConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8952");
        assert_eq!(config.ledger.backend, Backend::Memory);
        assert_eq!(config.lifecycle, LifecyclePolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = GatewayConfig::from_toml_str(
            r#"
            [server]
            port = 9000

            [ledger]
            backend = "filesystem"

            [lifecycle]
            asset_ids = "generated"
            offers = "non-terminal"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.ledger.backend, Backend::Filesystem);
        assert_eq!(config.ledger.path, PathBuf::from("./data/ledger"));
        assert_eq!(config.lifecycle.asset_ids, AssetIdPolicy::Generated);
        assert_eq!(config.lifecycle.offers, OfferPolicy::NonTerminal);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = GatewayConfig::default();
        config
            .merge_with_vars([
                ("ESTATE_HOST", "127.0.0.1"),
                ("ESTATE_PORT", "3000"),
                ("ESTATE_OBJECT_STORE_BACKEND", "filesystem"),
                ("ESTATE_OBJECT_STORE_PATH", "/var/lib/estate/reports"),
                ("ESTATE_LOG", "estate_core=debug"),
                ("UNRELATED", "ignored"),
            ])
            .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.object_store.backend, Backend::Filesystem);
        assert_eq!(
            config.object_store.path,
            PathBuf::from("/var/lib/estate/reports")
        );
        assert_eq!(config.logging.filter, "estate_core=debug");
    }

    #[test]
    fn test_bad_env_value_is_reported() {
        let mut config = GatewayConfig::default();
        let err = config
            .merge_with_vars([("ESTATE_PORT", "eighty")])
            .unwrap_err();
        assert_matches!(err, ConfigError::Env { ref key, .. } if key == "ESTATE_PORT");

        let err = config
            .merge_with_vars([("ESTATE_LEDGER_BACKEND", "postgres")])
            .unwrap_err();
        assert_matches!(err, ConfigError::Env { .. });
    }

    #[test]
    fn test_validation() {
        let mut config = GatewayConfig::default();
        config.server.port = 0;
        assert_matches!(config.validate(), Err(ConfigError::Invalid { .. }));

        let mut config = GatewayConfig::default();
        config.ledger.backend = Backend::Filesystem;
        config.ledger.path = PathBuf::new();
        assert_matches!(config.validate(), Err(ConfigError::Invalid { .. }));

        let mut config = GatewayConfig::default();
        config.server.max_report_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_one_shot_calls_need_persistent_ledger() {
        let mut config = GatewayConfig::default();
        assert_matches!(
            config.require_persistent_ledger(),
            Err(ConfigError::Invalid { ref message }) if message.contains("filesystem")
        );

        config
            .merge_with_vars([("ESTATE_LEDGER_BACKEND", "filesystem")])
            .unwrap();
        assert!(config.require_persistent_ledger().is_ok());
    }

    #[test]
    fn test_sample_config_parses() {
        let config = GatewayConfig::from_toml_str(include_str!("../gateway.example.toml")).unwrap();
        assert_eq!(config.ledger.backend, Backend::Filesystem);
        assert_eq!(config.object_store.path, PathBuf::from("./data/reports"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_policy_value_fails_parse() {
        let err = GatewayConfig::from_toml_str("[lifecycle]\noffers = \"anything\"\n").unwrap_err();
        assert_matches!(err, ConfigError::Parse { .. });
    }
}
