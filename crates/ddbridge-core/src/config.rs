//! Centralized Configuration Management
//!
//! All configuration consumed by the bridge: the options handed to the native
//! platform at initialization, per-feature settings, and the worker's own
//! tuning knobs.

use crate::types::{BatchSize, DatadogSite, LogLevel, TrackingConsent, UploadFrequency};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ----------------------------------------------------------------------------
// Worker Configuration
// ----------------------------------------------------------------------------

/// Configuration for the dispatch worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Maximum time `stop` waits for the queue to drain
    pub shutdown_timeout_ms: u64,
    /// Queue depth at which a backlog warning is logged
    pub queue_warning_depth: usize,
    /// Log every enqueue/dispatch/drop at debug level
    pub dispatch_logging: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout_ms: 5_000, // generous enough for a slow platform flush
            queue_warning_depth: 10_000,
            dispatch_logging: false,
        }
    }
}

impl WorkerConfig {
    /// Create configuration optimized for testing
    pub fn testing() -> Self {
        Self {
            shutdown_timeout_ms: 2_000,
            queue_warning_depth: 1_000,
            dispatch_logging: true,
        }
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

// ----------------------------------------------------------------------------
// Feature Configuration
// ----------------------------------------------------------------------------

/// Configuration for real-user-monitoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RumConfig {
    pub enabled: bool,
    /// Required when `enabled`; RUM degrades to a no-op without it
    pub application_id: Option<String>,
    /// Percentage of sessions sending internal telemetry (0-100)
    pub telemetry_sample_rate: f32,
    /// Alternative intake endpoint, without the `/rum` suffix
    pub custom_endpoint: Option<String>,
}

impl Default for RumConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            application_id: None,
            telemetry_sample_rate: 20.0,
            custom_endpoint: None,
        }
    }
}

impl RumConfig {
    /// Application id, ignoring empty strings
    pub fn application_id(&self) -> Option<&str> {
        self.application_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }
}

/// Configuration for the default logger and logs feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    /// Minimum level forwarded by the default logger
    pub remote_log_threshold: LogLevel,
    pub network_info_enabled: bool,
    /// Alternative intake endpoint, without the `/logs` suffix
    pub custom_endpoint: Option<String>,
    /// Send the application's own `tracing` events through the default logger
    pub forward_tracing_events: bool,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            remote_log_threshold: LogLevel::Debug,
            network_info_enabled: false,
            custom_endpoint: None,
            forward_tracing_events: false,
        }
    }
}

/// Options for an individual logger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    pub service: Option<String>,
    pub name: Option<String>,
    pub network_info_enabled: bool,
    pub bundle_with_rum_enabled: bool,
    /// Lines below this level are not forwarded
    pub remote_log_threshold: LogLevel,
    /// Percentage of lines sent (0-100)
    pub remote_sample_rate: f32,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            service: None,
            name: None,
            network_info_enabled: false,
            bundle_with_rum_enabled: true,
            remote_log_threshold: LogLevel::Debug,
            remote_sample_rate: 100.0,
        }
    }
}

impl LoggingOptions {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn with_threshold(mut self, threshold: LogLevel) -> Self {
        self.remote_log_threshold = threshold;
        self
    }

    /// Sample rate clamped into the valid percentage range
    pub fn sample_rate(&self) -> f32 {
        if self.remote_sample_rate.is_nan() {
            100.0
        } else {
            self.remote_sample_rate.clamp(0.0, 100.0)
        }
    }
}

// ----------------------------------------------------------------------------
// Main SDK Configuration
// ----------------------------------------------------------------------------

/// Complete configuration for one SDK instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Master switch; when false the SDK stays in its no-op state
    pub enabled: bool,
    pub client_token: String,
    pub env: String,
    pub service: Option<String>,
    pub site: DatadogSite,
    pub batch_size: BatchSize,
    pub upload_frequency: UploadFrequency,
    /// Consent applied at initialization
    pub tracking_consent: TrackingConsent,
    pub rum: RumConfig,
    pub logs: LogsConfig,
    pub worker: WorkerConfig,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            client_token: String::new(),
            env: "prod".to_string(),
            service: None,
            site: DatadogSite::default(),
            batch_size: BatchSize::default(),
            upload_frequency: UploadFrequency::default(),
            tracking_consent: TrackingConsent::default(),
            rum: RumConfig::default(),
            logs: LogsConfig::default(),
            worker: WorkerConfig::default(),
        }
    }
}

impl SdkConfig {
    /// Create new configuration with default values
    pub fn new(client_token: impl Into<String>) -> Self {
        Self {
            client_token: client_token.into(),
            ..Self::default()
        }
    }

    /// Create configuration for testing: RUM on, verbose worker, short timeouts
    pub fn testing() -> Self {
        Self {
            client_token: "test-client-token".to_string(),
            env: "test".to_string(),
            tracking_consent: TrackingConsent::Granted,
            rum: RumConfig {
                enabled: true,
                application_id: Some("test-application".to_string()),
                ..RumConfig::default()
            },
            worker: WorkerConfig::testing(),
            ..Self::default()
        }
    }

    /// Create configuration for production deployments
    pub fn production(client_token: impl Into<String>) -> Self {
        Self {
            client_token: client_token.into(),
            batch_size: BatchSize::Large,
            upload_frequency: UploadFrequency::Average,
            logs: LogsConfig {
                remote_log_threshold: LogLevel::Info,
                ..LogsConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = env.into();
        self
    }

    pub fn with_site(mut self, site: DatadogSite) -> Self {
        self.site = site;
        self
    }

    pub fn with_tracking_consent(mut self, consent: TrackingConsent) -> Self {
        self.tracking_consent = consent;
        self
    }

    /// Enable RUM for the given application
    pub fn with_rum(mut self, application_id: impl Into<String>) -> Self {
        self.rum.enabled = true;
        self.rum.application_id = Some(application_id.into());
        self
    }

    pub fn without_rum(mut self) -> Self {
        self.rum.enabled = false;
        self
    }

    pub fn with_logs(mut self, logs: LogsConfig) -> Self {
        self.logs = logs;
        self
    }

    pub fn with_worker(mut self, worker: WorkerConfig) -> Self {
        self.worker = worker;
        self
    }

    /// Options for the logger created at initialization
    pub fn default_logging_options(&self) -> LoggingOptions {
        LoggingOptions {
            service: self.service.clone(),
            network_info_enabled: self.logs.network_info_enabled,
            remote_log_threshold: self.logs.remote_log_threshold,
            ..LoggingOptions::default()
        }
    }

    /// Validate configuration consistency
    ///
    /// Every problem found is returned, not only the first. Problems reported
    /// here never abort startup; the affected feature is disabled or falls
    /// back to its default instead.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();

        if self.client_token.trim().is_empty() {
            problems.push("client_token must not be empty".to_string());
        }

        if self.rum.enabled && self.rum.application_id().is_none() {
            problems.push("RUM is enabled but an application id is not set".to_string());
        }

        if !(0.0..=100.0).contains(&self.rum.telemetry_sample_rate) {
            problems.push(format!(
                "telemetry_sample_rate must be within 0-100, got {}",
                self.rum.telemetry_sample_rate
            ));
        }

        if self.worker.shutdown_timeout_ms == 0 {
            problems.push("worker.shutdown_timeout_ms must be greater than 0".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}
