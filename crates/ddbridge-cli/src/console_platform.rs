//! Platform that writes every native call to the tracing output
//!
//! Stands in for a native SDK so the bridge can be driven from a terminal.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use ddbridge_core::{
    AttributeValue, Attributes, CoreLoggerLevel, ErrorInfo, LogLevel, LoggingOptions, Platform,
    PlatformLogger, PlatformResult, PlatformRum, RumActionType, RumErrorSource, RumHttpMethod,
    RumResourceType, SdkConfig, TrackingConsent, UserInfo,
};

fn render(attributes: &Attributes) -> String {
    serde_json::to_string(attributes).unwrap_or_default()
}

// ----------------------------------------------------------------------------
// Console Platform
// ----------------------------------------------------------------------------

/// Console-backed platform counting the native calls it receives
#[derive(Debug, Default)]
pub struct ConsolePlatform {
    calls: Arc<AtomicU64>,
}

impl ConsolePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of native calls made so far, loggers and RUM included
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

impl Platform for ConsolePlatform {
    fn initialize(&self, config: &SdkConfig) -> PlatformResult<()> {
        self.record();
        info!(
            env = %config.env,
            site = %config.site,
            rum = config.rum.enabled,
            "[sdk] initialize"
        );
        Ok(())
    }

    fn set_tracking_consent(&self, consent: TrackingConsent) -> PlatformResult<()> {
        self.record();
        info!(%consent, "[sdk] set tracking consent");
        Ok(())
    }

    fn set_verbosity(&self, level: CoreLoggerLevel) -> PlatformResult<()> {
        self.record();
        info!(%level, "[sdk] set verbosity");
        Ok(())
    }

    fn set_user_info(&self, user: &UserInfo) -> PlatformResult<()> {
        self.record();
        info!(
            id = user.id.as_deref().unwrap_or("-"),
            name = user.name.as_deref().unwrap_or("-"),
            extra = %render(&user.extra_info),
            "[sdk] set user info"
        );
        Ok(())
    }

    fn add_user_extra_info(&self, extra_info: &Attributes) -> PlatformResult<()> {
        self.record();
        info!(extra = %render(extra_info), "[sdk] add user extra info");
        Ok(())
    }

    fn clear_all_data(&self) -> PlatformResult<()> {
        self.record();
        info!("[sdk] clear all data");
        Ok(())
    }

    fn create_logger(&self, options: &LoggingOptions) -> PlatformResult<Box<dyn PlatformLogger>> {
        self.record();
        let name = options.name.clone().unwrap_or_else(|| "default".to_string());
        info!(
            logger = %name,
            threshold = %options.remote_log_threshold,
            sample_rate = options.sample_rate(),
            "[logs] create logger"
        );
        Ok(Box::new(ConsoleLogger {
            name,
            calls: self.calls.clone(),
        }))
    }

    fn init_rum(&self, config: &SdkConfig) -> PlatformResult<Box<dyn PlatformRum>> {
        self.record();
        info!(
            application_id = config.rum.application_id().unwrap_or("-"),
            "[rum] init"
        );
        Ok(Box::new(ConsoleRum {
            calls: self.calls.clone(),
        }))
    }

    fn send_debug_telemetry(&self, message: &str) -> PlatformResult<()> {
        info!("[telemetry] {}", message);
        Ok(())
    }

    fn send_error_telemetry(
        &self,
        message: &str,
        _stack: Option<&str>,
        kind: Option<&str>,
    ) -> PlatformResult<()> {
        warn!(kind = kind.unwrap_or("unknown"), "[telemetry] {}", message);
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Logger
// ----------------------------------------------------------------------------

struct ConsoleLogger {
    name: String,
    calls: Arc<AtomicU64>,
}

impl ConsoleLogger {
    fn record(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

impl PlatformLogger for ConsoleLogger {
    fn log(
        &mut self,
        level: LogLevel,
        message: &str,
        attributes: &Attributes,
        error: Option<&ErrorInfo>,
    ) -> PlatformResult<()> {
        self.record();
        match error {
            Some(error) => info!(
                logger = %self.name,
                %level,
                attributes = %render(attributes),
                error = %error.message,
                "[logs] {}",
                message
            ),
            None => info!(
                logger = %self.name,
                %level,
                attributes = %render(attributes),
                "[logs] {}",
                message
            ),
        }
        Ok(())
    }

    fn add_tag(&mut self, tag: &str, value: Option<&str>) -> PlatformResult<()> {
        self.record();
        info!(logger = %self.name, tag, value = value.unwrap_or(""), "[logs] add tag");
        Ok(())
    }

    fn remove_tag(&mut self, tag: &str) -> PlatformResult<()> {
        self.record();
        info!(logger = %self.name, tag, "[logs] remove tag");
        Ok(())
    }

    fn remove_tags_with_key(&mut self, key: &str) -> PlatformResult<()> {
        self.record();
        info!(logger = %self.name, key, "[logs] remove tags with key");
        Ok(())
    }

    fn add_attribute(&mut self, key: &str, value: &AttributeValue) -> PlatformResult<()> {
        self.record();
        info!(logger = %self.name, key, %value, "[logs] add attribute");
        Ok(())
    }

    fn remove_attribute(&mut self, key: &str) -> PlatformResult<()> {
        self.record();
        info!(logger = %self.name, key, "[logs] remove attribute");
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// RUM
// ----------------------------------------------------------------------------

struct ConsoleRum {
    calls: Arc<AtomicU64>,
}

impl ConsoleRum {
    fn record(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

impl PlatformRum for ConsoleRum {
    fn start_view(&mut self, key: &str, name: &str, attributes: &Attributes) -> PlatformResult<()> {
        self.record();
        info!(key, name, attributes = %render(attributes), "[rum] start view");
        Ok(())
    }

    fn stop_view(&mut self, key: &str, attributes: &Attributes) -> PlatformResult<()> {
        self.record();
        info!(key, attributes = %render(attributes), "[rum] stop view");
        Ok(())
    }

    fn add_action(
        &mut self,
        action_type: RumActionType,
        name: &str,
        attributes: &Attributes,
    ) -> PlatformResult<()> {
        self.record();
        info!(%action_type, name, attributes = %render(attributes), "[rum] add action");
        Ok(())
    }

    fn start_action(
        &mut self,
        action_type: RumActionType,
        name: &str,
        attributes: &Attributes,
    ) -> PlatformResult<()> {
        self.record();
        info!(%action_type, name, attributes = %render(attributes), "[rum] start action");
        Ok(())
    }

    fn stop_action(
        &mut self,
        action_type: RumActionType,
        name: &str,
        attributes: &Attributes,
    ) -> PlatformResult<()> {
        self.record();
        info!(%action_type, name, attributes = %render(attributes), "[rum] stop action");
        Ok(())
    }

    fn add_error(
        &mut self,
        message: &str,
        source: RumErrorSource,
        error_type: Option<&str>,
        _stack: Option<&str>,
        attributes: &Attributes,
    ) -> PlatformResult<()> {
        self.record();
        info!(
            %source,
            error_type = error_type.unwrap_or("-"),
            attributes = %render(attributes),
            "[rum] add error: {}",
            message
        );
        Ok(())
    }

    fn start_resource(
        &mut self,
        key: &str,
        method: RumHttpMethod,
        url: &str,
        attributes: &Attributes,
    ) -> PlatformResult<()> {
        self.record();
        info!(key, %method, url, attributes = %render(attributes), "[rum] start resource");
        Ok(())
    }

    fn stop_resource(
        &mut self,
        key: &str,
        resource_type: RumResourceType,
        status_code: Option<u16>,
        size: Option<u64>,
        attributes: &Attributes,
    ) -> PlatformResult<()> {
        self.record();
        info!(
            key,
            %resource_type,
            status_code = ?status_code,
            size = ?size,
            attributes = %render(attributes),
            "[rum] stop resource"
        );
        Ok(())
    }

    fn stop_resource_with_error(
        &mut self,
        key: &str,
        error_type: Option<&str>,
        message: &str,
        attributes: &Attributes,
    ) -> PlatformResult<()> {
        self.record();
        info!(
            key,
            error_type = error_type.unwrap_or("-"),
            attributes = %render(attributes),
            "[rum] stop resource with error: {}",
            message
        );
        Ok(())
    }

    fn add_attribute(&mut self, key: &str, value: &AttributeValue) -> PlatformResult<()> {
        self.record();
        info!(key, %value, "[rum] add attribute");
        Ok(())
    }

    fn remove_attribute(&mut self, key: &str) -> PlatformResult<()> {
        self.record();
        info!(key, "[rum] remove attribute");
        Ok(())
    }

    fn add_feature_flag_evaluation(
        &mut self,
        name: &str,
        value: &AttributeValue,
    ) -> PlatformResult<()> {
        self.record();
        info!(name, %value, "[rum] feature flag evaluation");
        Ok(())
    }

    fn stop_session(&mut self) -> PlatformResult<()> {
        self.record();
        info!("[rum] stop session");
        Ok(())
    }
}
