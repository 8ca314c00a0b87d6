//! Platform Capability Interface
//!
//! The native SDK sits behind these traits. Processors call them synchronously
//! from the worker thread; the internal reporter may call the telemetry methods
//! from any thread, which is why [`Platform`] is `Send + Sync`.

use crate::config::{LoggingOptions, SdkConfig};
use crate::errors::PlatformError;
use crate::types::{
    AttributeValue, Attributes, CoreLoggerLevel, ErrorInfo, LogLevel, RumActionType,
    RumErrorSource, RumHttpMethod, RumResourceType, TrackingConsent, UserInfo,
};

/// Result of a native platform call
pub type PlatformResult<T> = Result<T, PlatformError>;

// ----------------------------------------------------------------------------
// Platform
// ----------------------------------------------------------------------------

/// Entry point into a native SDK
pub trait Platform: Send + Sync {
    /// Initialize the native SDK with the given configuration
    fn initialize(&self, config: &SdkConfig) -> PlatformResult<()>;

    fn set_tracking_consent(&self, consent: TrackingConsent) -> PlatformResult<()>;

    fn set_verbosity(&self, level: CoreLoggerLevel) -> PlatformResult<()>;

    /// Replace the current user information
    fn set_user_info(&self, user: &UserInfo) -> PlatformResult<()>;

    /// Merge extra information into the current user
    fn add_user_extra_info(&self, extra_info: &Attributes) -> PlatformResult<()>;

    fn clear_all_data(&self) -> PlatformResult<()>;

    /// Create a native logger
    fn create_logger(&self, options: &LoggingOptions) -> PlatformResult<Box<dyn PlatformLogger>>;

    /// Obtain the native RUM monitor
    fn init_rum(&self, config: &SdkConfig) -> PlatformResult<Box<dyn PlatformRum>>;

    fn send_debug_telemetry(&self, message: &str) -> PlatformResult<()>;

    fn send_error_telemetry(
        &self,
        message: &str,
        stack: Option<&str>,
        kind: Option<&str>,
    ) -> PlatformResult<()>;
}

/// Native logger created by [`Platform::create_logger`]
pub trait PlatformLogger: Send {
    fn log(
        &mut self,
        level: LogLevel,
        message: &str,
        attributes: &Attributes,
        error: Option<&ErrorInfo>,
    ) -> PlatformResult<()>;

    fn add_tag(&mut self, tag: &str, value: Option<&str>) -> PlatformResult<()>;

    fn remove_tag(&mut self, tag: &str) -> PlatformResult<()>;

    fn remove_tags_with_key(&mut self, key: &str) -> PlatformResult<()>;

    fn add_attribute(&mut self, key: &str, value: &AttributeValue) -> PlatformResult<()>;

    fn remove_attribute(&mut self, key: &str) -> PlatformResult<()>;
}

/// Native RUM monitor returned by [`Platform::init_rum`]
pub trait PlatformRum: Send {
    fn start_view(&mut self, key: &str, name: &str, attributes: &Attributes) -> PlatformResult<()>;

    fn stop_view(&mut self, key: &str, attributes: &Attributes) -> PlatformResult<()>;

    fn add_action(
        &mut self,
        action_type: RumActionType,
        name: &str,
        attributes: &Attributes,
    ) -> PlatformResult<()>;

    fn start_action(
        &mut self,
        action_type: RumActionType,
        name: &str,
        attributes: &Attributes,
    ) -> PlatformResult<()>;

    fn stop_action(
        &mut self,
        action_type: RumActionType,
        name: &str,
        attributes: &Attributes,
    ) -> PlatformResult<()>;

    fn add_error(
        &mut self,
        message: &str,
        source: RumErrorSource,
        error_type: Option<&str>,
        stack: Option<&str>,
        attributes: &Attributes,
    ) -> PlatformResult<()>;

    fn start_resource(
        &mut self,
        key: &str,
        method: RumHttpMethod,
        url: &str,
        attributes: &Attributes,
    ) -> PlatformResult<()>;

    fn stop_resource(
        &mut self,
        key: &str,
        resource_type: RumResourceType,
        status_code: Option<u16>,
        size: Option<u64>,
        attributes: &Attributes,
    ) -> PlatformResult<()>;

    fn stop_resource_with_error(
        &mut self,
        key: &str,
        error_type: Option<&str>,
        message: &str,
        attributes: &Attributes,
    ) -> PlatformResult<()>;

    fn add_attribute(&mut self, key: &str, value: &AttributeValue) -> PlatformResult<()>;

    fn remove_attribute(&mut self, key: &str) -> PlatformResult<()>;

    fn add_feature_flag_evaluation(&mut self, name: &str, value: &AttributeValue)
        -> PlatformResult<()>;

    fn stop_session(&mut self) -> PlatformResult<()>;
}

// ----------------------------------------------------------------------------
// No-op Platform
// ----------------------------------------------------------------------------

/// Platform that accepts every call and does nothing
///
/// Used when the bridge runs without a native SDK attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPlatform;

impl Platform for NoOpPlatform {
    fn initialize(&self, _config: &SdkConfig) -> PlatformResult<()> {
        Ok(())
    }

    fn set_tracking_consent(&self, _consent: TrackingConsent) -> PlatformResult<()> {
        Ok(())
    }

    fn set_verbosity(&self, _level: CoreLoggerLevel) -> PlatformResult<()> {
        Ok(())
    }

    fn set_user_info(&self, _user: &UserInfo) -> PlatformResult<()> {
        Ok(())
    }

    fn add_user_extra_info(&self, _extra_info: &Attributes) -> PlatformResult<()> {
        Ok(())
    }

    fn clear_all_data(&self) -> PlatformResult<()> {
        Ok(())
    }

    fn create_logger(&self, _options: &LoggingOptions) -> PlatformResult<Box<dyn PlatformLogger>> {
        Ok(Box::new(NoOpPlatformLogger))
    }

    fn init_rum(&self, _config: &SdkConfig) -> PlatformResult<Box<dyn PlatformRum>> {
        Ok(Box::new(NoOpPlatformRum))
    }

    fn send_debug_telemetry(&self, _message: &str) -> PlatformResult<()> {
        Ok(())
    }

    fn send_error_telemetry(
        &self,
        _message: &str,
        _stack: Option<&str>,
        _kind: Option<&str>,
    ) -> PlatformResult<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPlatformLogger;

impl PlatformLogger for NoOpPlatformLogger {
    fn log(
        &mut self,
        _level: LogLevel,
        _message: &str,
        _attributes: &Attributes,
        _error: Option<&ErrorInfo>,
    ) -> PlatformResult<()> {
        Ok(())
    }

    fn add_tag(&mut self, _tag: &str, _value: Option<&str>) -> PlatformResult<()> {
        Ok(())
    }

    fn remove_tag(&mut self, _tag: &str) -> PlatformResult<()> {
        Ok(())
    }

    fn remove_tags_with_key(&mut self, _key: &str) -> PlatformResult<()> {
        Ok(())
    }

    fn add_attribute(&mut self, _key: &str, _value: &AttributeValue) -> PlatformResult<()> {
        Ok(())
    }

    fn remove_attribute(&mut self, _key: &str) -> PlatformResult<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPlatformRum;

impl PlatformRum for NoOpPlatformRum {
    fn start_view(&mut self, _key: &str, _name: &str, _attributes: &Attributes) -> PlatformResult<()> {
        Ok(())
    }

    fn stop_view(&mut self, _key: &str, _attributes: &Attributes) -> PlatformResult<()> {
        Ok(())
    }

    fn add_action(
        &mut self,
        _action_type: RumActionType,
        _name: &str,
        _attributes: &Attributes,
    ) -> PlatformResult<()> {
        Ok(())
    }

    fn start_action(
        &mut self,
        _action_type: RumActionType,
        _name: &str,
        _attributes: &Attributes,
    ) -> PlatformResult<()> {
        Ok(())
    }

    fn stop_action(
        &mut self,
        _action_type: RumActionType,
        _name: &str,
        _attributes: &Attributes,
    ) -> PlatformResult<()> {
        Ok(())
    }

    fn add_error(
        &mut self,
        _message: &str,
        _source: RumErrorSource,
        _error_type: Option<&str>,
        _stack: Option<&str>,
        _attributes: &Attributes,
    ) -> PlatformResult<()> {
        Ok(())
    }

    fn start_resource(
        &mut self,
        _key: &str,
        _method: RumHttpMethod,
        _url: &str,
        _attributes: &Attributes,
    ) -> PlatformResult<()> {
        Ok(())
    }

    fn stop_resource(
        &mut self,
        _key: &str,
        _resource_type: RumResourceType,
        _status_code: Option<u16>,
        _size: Option<u64>,
        _attributes: &Attributes,
    ) -> PlatformResult<()> {
        Ok(())
    }

    fn stop_resource_with_error(
        &mut self,
        _key: &str,
        _error_type: Option<&str>,
        _message: &str,
        _attributes: &Attributes,
    ) -> PlatformResult<()> {
        Ok(())
    }

    fn add_attribute(&mut self, _key: &str, _value: &AttributeValue) -> PlatformResult<()> {
        Ok(())
    }

    fn remove_attribute(&mut self, _key: &str) -> PlatformResult<()> {
        Ok(())
    }

    fn add_feature_flag_evaluation(
        &mut self,
        _name: &str,
        _value: &AttributeValue,
    ) -> PlatformResult<()> {
        Ok(())
    }

    fn stop_session(&mut self) -> PlatformResult<()> {
        Ok(())
    }
}
