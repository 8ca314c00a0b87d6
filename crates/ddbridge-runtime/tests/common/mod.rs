//! Shared helpers for runtime integration tests

#![allow(dead_code)]

use ddbridge_core::{
    AttributeValue, Attributes, BridgeError, BridgeResult, CoreLoggerLevel, ErrorInfo, LogLevel,
    LoggingOptions, Message, Platform, PlatformError, PlatformLogger, PlatformResult, PlatformRum,
    RumActionType, RumErrorSource, RumHttpMethod, RumResourceType, SdkConfig, Target,
    TrackingConsent, UserInfo, WorkerConfig,
};
use ddbridge_runtime::{InternalReporter, Processor, Worker};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub type CallLog = Arc<Mutex<Vec<String>>>;

// ----------------------------------------------------------------------------
// Recording Platform
// ----------------------------------------------------------------------------

/// Platform that records every call as a short string
#[derive(Default)]
pub struct RecordingPlatform {
    calls: CallLog,
    fail_create_logger: bool,
    fail_init_rum: bool,
}

impl RecordingPlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_loggers() -> Arc<Self> {
        Arc::new(Self {
            fail_create_logger: true,
            ..Self::default()
        })
    }

    pub fn failing_rum() -> Arc<Self> {
        Arc::new(Self {
            fail_init_rum: true,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls starting with `prefix`, in order
    pub fn calls_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with(prefix))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Platform for RecordingPlatform {
    fn initialize(&self, config: &SdkConfig) -> PlatformResult<()> {
        self.record(format!("initialize:{}", config.env));
        Ok(())
    }

    fn set_tracking_consent(&self, consent: TrackingConsent) -> PlatformResult<()> {
        self.record(format!("consent:{}", consent));
        Ok(())
    }

    fn set_verbosity(&self, level: CoreLoggerLevel) -> PlatformResult<()> {
        self.record(format!("verbosity:{}", level));
        Ok(())
    }

    fn set_user_info(&self, user: &UserInfo) -> PlatformResult<()> {
        self.record(format!("user:{}", user.id.as_deref().unwrap_or("-")));
        Ok(())
    }

    fn add_user_extra_info(&self, extra_info: &Attributes) -> PlatformResult<()> {
        let keys: Vec<_> = extra_info.keys().cloned().collect();
        self.record(format!("user_extra:{}", keys.join(",")));
        Ok(())
    }

    fn clear_all_data(&self) -> PlatformResult<()> {
        self.record("clear_all_data".to_string());
        Ok(())
    }

    fn create_logger(&self, options: &LoggingOptions) -> PlatformResult<Box<dyn PlatformLogger>> {
        let name = options.name.clone().unwrap_or_else(|| "default".to_string());
        self.record(format!("create_logger:{}", name));
        if self.fail_create_logger {
            return Err(PlatformError::call_failed("createLogger", "refused"));
        }
        Ok(Box::new(RecordingLogger {
            name,
            calls: self.calls.clone(),
        }))
    }

    fn init_rum(&self, _config: &SdkConfig) -> PlatformResult<Box<dyn PlatformRum>> {
        self.record("init_rum".to_string());
        if self.fail_init_rum {
            return Err(PlatformError::Unavailable {
                feature: "rum".to_string(),
            });
        }
        Ok(Box::new(RecordingRum {
            calls: self.calls.clone(),
        }))
    }

    fn send_debug_telemetry(&self, message: &str) -> PlatformResult<()> {
        self.record(format!("telemetry.debug:{}", message));
        Ok(())
    }

    fn send_error_telemetry(
        &self,
        message: &str,
        _stack: Option<&str>,
        kind: Option<&str>,
    ) -> PlatformResult<()> {
        self.record(format!(
            "telemetry.error:{}:{}",
            kind.unwrap_or("unknown"),
            message
        ));
        Ok(())
    }
}

pub struct RecordingLogger {
    name: String,
    calls: CallLog,
}

impl RecordingLogger {
    fn record(&self, call: String) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("log.{}.{}", self.name, call));
    }
}

impl PlatformLogger for RecordingLogger {
    fn log(
        &mut self,
        level: LogLevel,
        message: &str,
        attributes: &Attributes,
        error: Option<&ErrorInfo>,
    ) -> PlatformResult<()> {
        let mut call = format!("{}:{}", level, message);
        if !attributes.is_empty() {
            call.push_str(&format!(" {}", serde_json::Value::Object(attributes.clone())));
        }
        if let Some(error) = error {
            call.push_str(&format!(" error={}", error.message));
        }
        self.record(call);
        Ok(())
    }

    fn add_tag(&mut self, tag: &str, value: Option<&str>) -> PlatformResult<()> {
        self.record(format!("add_tag:{}={}", tag, value.unwrap_or("")));
        Ok(())
    }

    fn remove_tag(&mut self, tag: &str) -> PlatformResult<()> {
        self.record(format!("remove_tag:{}", tag));
        Ok(())
    }

    fn remove_tags_with_key(&mut self, key: &str) -> PlatformResult<()> {
        self.record(format!("remove_tags_with_key:{}", key));
        Ok(())
    }

    fn add_attribute(&mut self, key: &str, value: &AttributeValue) -> PlatformResult<()> {
        self.record(format!("add_attribute:{}={}", key, value));
        Ok(())
    }

    fn remove_attribute(&mut self, key: &str) -> PlatformResult<()> {
        self.record(format!("remove_attribute:{}", key));
        Ok(())
    }
}

pub struct RecordingRum {
    calls: CallLog,
}

impl RecordingRum {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(format!("rum.{}", call));
    }
}

impl PlatformRum for RecordingRum {
    fn start_view(&mut self, key: &str, name: &str, _attributes: &Attributes) -> PlatformResult<()> {
        self.record(format!("start_view:{}:{}", key, name));
        Ok(())
    }

    fn stop_view(&mut self, key: &str, _attributes: &Attributes) -> PlatformResult<()> {
        self.record(format!("stop_view:{}", key));
        Ok(())
    }

    fn add_action(
        &mut self,
        action_type: RumActionType,
        name: &str,
        _attributes: &Attributes,
    ) -> PlatformResult<()> {
        self.record(format!("add_action:{}:{}", action_type, name));
        Ok(())
    }

    fn start_action(
        &mut self,
        action_type: RumActionType,
        name: &str,
        _attributes: &Attributes,
    ) -> PlatformResult<()> {
        self.record(format!("start_action:{}:{}", action_type, name));
        Ok(())
    }

    fn stop_action(
        &mut self,
        action_type: RumActionType,
        name: &str,
        _attributes: &Attributes,
    ) -> PlatformResult<()> {
        self.record(format!("stop_action:{}:{}", action_type, name));
        Ok(())
    }

    fn add_error(
        &mut self,
        message: &str,
        source: RumErrorSource,
        _error_type: Option<&str>,
        _stack: Option<&str>,
        _attributes: &Attributes,
    ) -> PlatformResult<()> {
        self.record(format!("add_error:{}:{}", source, message));
        Ok(())
    }

    fn start_resource(
        &mut self,
        key: &str,
        method: RumHttpMethod,
        url: &str,
        _attributes: &Attributes,
    ) -> PlatformResult<()> {
        self.record(format!("start_resource:{}:{}:{}", key, method, url));
        Ok(())
    }

    fn stop_resource(
        &mut self,
        key: &str,
        resource_type: RumResourceType,
        status_code: Option<u16>,
        size: Option<u64>,
        _attributes: &Attributes,
    ) -> PlatformResult<()> {
        self.record(format!(
            "stop_resource:{}:{}:{:?}:{:?}",
            key, resource_type, status_code, size
        ));
        Ok(())
    }

    fn stop_resource_with_error(
        &mut self,
        key: &str,
        _error_type: Option<&str>,
        message: &str,
        _attributes: &Attributes,
    ) -> PlatformResult<()> {
        self.record(format!("stop_resource_with_error:{}:{}", key, message));
        Ok(())
    }

    fn add_attribute(&mut self, key: &str, value: &AttributeValue) -> PlatformResult<()> {
        self.record(format!("add_attribute:{}={}", key, value));
        Ok(())
    }

    fn remove_attribute(&mut self, key: &str) -> PlatformResult<()> {
        self.record(format!("remove_attribute:{}", key));
        Ok(())
    }

    fn add_feature_flag_evaluation(
        &mut self,
        name: &str,
        value: &AttributeValue,
    ) -> PlatformResult<()> {
        self.record(format!("feature_flag:{}={}", name, value));
        Ok(())
    }

    fn stop_session(&mut self) -> PlatformResult<()> {
        self.record("stop_session".to_string());
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Scripted Processor
// ----------------------------------------------------------------------------

pub type Deliveries = Arc<Mutex<Vec<String>>>;

/// Processor recording `target/name` of every custom message it receives
///
/// A message named `fail` returns an error after being recorded and one named
/// `panic` panics after being recorded.
pub struct ScriptedProcessor {
    deliveries: Deliveries,
    delay: Option<Duration>,
}

impl ScriptedProcessor {
    pub fn new(deliveries: Deliveries) -> Self {
        Self {
            deliveries,
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl Processor for ScriptedProcessor {
    fn process(&mut self, message: Message) -> BridgeResult<()> {
        let target = message.target();
        let name = match &message {
            Message::Custom { name, .. } => name.clone(),
            other => other.variant_name().to_string(),
        };

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.deliveries
            .lock()
            .unwrap()
            .push(format!("{}/{}", target, name));

        match name.as_str() {
            "fail" => Err(BridgeError::Processor {
                target,
                reason: "scripted failure".to_string(),
            }),
            "panic" => panic!("scripted panic"),
            _ => Ok(()),
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

pub fn custom(target: &'static str, name: impl Into<String>) -> Message {
    Message::Custom {
        target: Target::new(target),
        name: name.into(),
        attributes: Attributes::new(),
    }
}

pub fn new_deliveries() -> Deliveries {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn create_test_worker(platform: Arc<RecordingPlatform>) -> Worker {
    Worker::new(WorkerConfig::testing(), InternalReporter::new(platform))
}

/// Worker with a scripted processor registered for each target
pub fn create_scripted_worker(
    platform: Arc<RecordingPlatform>,
    targets: &[&'static str],
    deliveries: &Deliveries,
) -> Worker {
    let mut worker = create_test_worker(platform);
    for target in targets {
        worker
            .register_processor(
                Target::new(*target),
                Box::new(ScriptedProcessor::new(deliveries.clone())),
            )
            .expect("fresh worker accepts registrations");
    }
    worker
}

pub fn snapshot(deliveries: &Deliveries) -> Vec<String> {
    deliveries.lock().unwrap().clone()
}

/// Poll until `condition` holds or `timeout` elapses
pub fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    condition()
}
