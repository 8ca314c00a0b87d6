//! ddbridge CLI Configuration Management
//!
//! Configuration is layered with figment, later sources winning:
//! defaults, `ddbridge.toml` in the working directory, `~/.ddbridge/config.toml`,
//! then `DDBRIDGE_*` environment variables. Nested keys in the environment are
//! separated by a double underscore, e.g. `DDBRIDGE_SDK__RUM__APPLICATION_ID`.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use ddbridge_core::{LogLevel, LogsConfig, SdkConfig, TrackingConsent};

// ----------------------------------------------------------------------------
// CLI Application Configuration
// ----------------------------------------------------------------------------

/// Complete configuration for the ddbridge CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliAppConfig {
    /// Configuration handed to the SDK instance
    pub sdk: SdkConfig,

    /// CLI-specific configuration
    pub cli: CliConfig,
}

/// CLI-specific configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Enable verbose logging output
    pub verbose: bool,
    /// Print worker statistics once the demo has shut down
    pub print_stats: bool,
}

impl Default for CliAppConfig {
    fn default() -> Self {
        let mut sdk = SdkConfig::new("demo-client-token")
            .with_env("demo")
            .with_rum("demo-application");
        sdk.logs.forward_tracing_events = true;

        Self {
            sdk,
            cli: CliConfig::default(),
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            print_stats: true,
        }
    }
}

// ----------------------------------------------------------------------------
// Errors
// ----------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Loading(String),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

// ----------------------------------------------------------------------------
// Loading
// ----------------------------------------------------------------------------

impl CliAppConfig {
    /// Load configuration from all layered sources
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file("ddbridge.toml"));

        if let Some(path) = Self::default_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        Self::extract(figment.merge(Self::env_provider()))
    }

    /// Load configuration from a specific file path
    ///
    /// Environment variables still override values from the file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::Loading(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Self::env_provider());

        Self::extract(figment)
    }

    fn env_provider() -> Env {
        Env::prefixed("DDBRIDGE_").split("__")
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: CliAppConfig = figment
            .extract()
            .map_err(|e| ConfigError::Loading(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Per-user configuration file, when a home directory is known
    fn default_config_path() -> Option<PathBuf> {
        std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()
            .map(|home| PathBuf::from(home).join(".ddbridge").join("config.toml"))
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sdk
            .validate()
            .map_err(|problems| ConfigError::Validation(problems.join("; ")))
    }

    /// Configuration suited to a production deployment, for `config --example`
    pub fn example() -> Self {
        let mut sdk = SdkConfig::production("<client-token>")
            .with_env("staging")
            .with_rum("<application-id>")
            .with_tracking_consent(TrackingConsent::Pending)
            .with_logs(LogsConfig {
                remote_log_threshold: LogLevel::Warn,
                network_info_enabled: true,
                custom_endpoint: None,
                forward_tracing_events: true,
            });
        sdk.service = Some("my-game".to_string());

        Self {
            sdk,
            cli: CliConfig::default(),
        }
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
