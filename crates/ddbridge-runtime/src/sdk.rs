//! SDK Instance
//!
//! [`Sdk`] is the application's entry point. It is constructed and owned
//! explicitly; there is no global instance. Dropping it runs the same graceful
//! shutdown as [`Sdk::shutdown`].
//!
//! ```rust,no_run
//! use ddbridge_core::{NoOpPlatform, SdkConfig};
//! use ddbridge_runtime::Sdk;
//! use std::sync::Arc;
//!
//! let sdk = Sdk::init(Arc::new(NoOpPlatform), SdkConfig::new("client-token").with_rum("app-id"));
//!
//! sdk.rum().start_view("home", None, None);
//! sdk.default_logger().info("home shown", None);
//! sdk.rum().stop_view("home", None);
//!
//! sdk.shutdown();
//! ```

use crate::builder::SdkBuilder;
use crate::facade::{Logger, RumClient};
use crate::forwarding::TracingForwarder;
use crate::stats::WorkerStatsSnapshot;
use crate::worker::{Worker, WorkerHandle};
use ddbridge_core::{
    Attributes, CoreLoggerLevel, LoggerId, LoggingOptions, LogsMessage, Platform, SdkConfig,
    SdkMessage, TrackingConsent,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, trace};

/// Running parts of an initialized SDK
pub(crate) struct SdkInner {
    pub(crate) worker: Mutex<Worker>,
    pub(crate) handle: WorkerHandle,
    pub(crate) next_logger_id: AtomicU64,
    pub(crate) default_logger: Logger,
    pub(crate) rum: RumClient,
}

impl SdkInner {
    pub(crate) fn create_logger(&self, options: LoggingOptions) -> Logger {
        create_logger(&self.handle, &self.next_logger_id, options)
    }
}

/// Allocate a logger id and route the logger's creation through the queue
pub(crate) fn create_logger(
    handle: &WorkerHandle,
    next_id: &AtomicU64,
    options: LoggingOptions,
) -> Logger {
    let id = LoggerId::new(next_id.fetch_add(1, Ordering::Relaxed));
    if handle.enqueue(LogsMessage::CreateLogger {
        logger: id,
        options,
    }) {
        Logger::new(id, handle.clone())
    } else {
        Logger::NoOp
    }
}

/// One SDK instance bound to a native platform
pub struct Sdk {
    config: Arc<SdkConfig>,
    inner: Option<SdkInner>,
}

impl Sdk {
    /// Initialize an SDK instance with the default processors
    ///
    /// Never fails: configuration problems are reported through internal
    /// telemetry and the affected feature degrades to a no-op.
    pub fn init(platform: Arc<dyn Platform>, config: SdkConfig) -> Self {
        SdkBuilder::new(platform).with_config(config).build()
    }

    /// SDK that accepts every call and does nothing
    pub fn noop() -> Self {
        Self::disabled(SdkConfig::default())
    }

    pub(crate) fn disabled(config: SdkConfig) -> Self {
        Self {
            config: Arc::new(config),
            inner: None,
        }
    }

    pub(crate) fn running(config: Arc<SdkConfig>, inner: SdkInner) -> Self {
        Self {
            config,
            inner: Some(inner),
        }
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Whether calls reach a worker at all
    pub fn is_noop(&self) -> bool {
        self.inner.is_none()
    }

    pub fn is_running(&self) -> bool {
        self.inner.as_ref().is_some_and(|inner| {
            inner
                .worker
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_running()
        })
    }

    // ------------------------------------------------------------------------
    // User and platform state
    // ------------------------------------------------------------------------

    /// Replace the current user
    pub fn set_user_info(
        &self,
        id: Option<&str>,
        name: Option<&str>,
        email: Option<&str>,
        extra_info: Option<Attributes>,
    ) {
        self.send(SdkMessage::SetUserInfo {
            id: id.map(str::to_string),
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            extra_info: extra_info.unwrap_or_default(),
        });
    }

    /// Merge into the current user's extra info; `null` values remove keys
    pub fn add_user_extra_info(&self, extra_info: Attributes) {
        self.send(SdkMessage::AddUserExtraInfo { extra_info });
    }

    pub fn set_tracking_consent<C>(&self, consent: C)
    where
        C: TryInto<TrackingConsent>,
    {
        match consent.try_into() {
            Ok(consent) => self.send(SdkMessage::SetTrackingConsent { consent }),
            Err(_) => trace!("Dropping unrecognized tracking consent"),
        }
    }

    /// Verbosity of the native SDK's own console output
    pub fn set_verbosity<V>(&self, level: V)
    where
        V: TryInto<CoreLoggerLevel>,
    {
        match level.try_into() {
            Ok(level) => self.send(SdkMessage::SetVerbosity { level }),
            Err(_) => trace!("Dropping unrecognized verbosity level"),
        }
    }

    /// Delete all data not yet uploaded
    pub fn clear_all_data(&self) {
        self.send(SdkMessage::ClearAllData);
    }

    // ------------------------------------------------------------------------
    // Facades
    // ------------------------------------------------------------------------

    /// Create a logger; it is usable immediately, creation happens in order
    pub fn create_logger(&self, options: LoggingOptions) -> Logger {
        match &self.inner {
            Some(inner) => inner.create_logger(options),
            None => Logger::NoOp,
        }
    }

    /// Logger created at initialization
    pub fn default_logger(&self) -> Logger {
        match &self.inner {
            Some(inner) => inner.default_logger.clone(),
            None => Logger::NoOp,
        }
    }

    pub fn rum(&self) -> RumClient {
        match &self.inner {
            Some(inner) => inner.rum.clone(),
            None => RumClient::NoOp,
        }
    }

    /// Layer forwarding application `tracing` events to the default logger
    ///
    /// `None` unless `logs.forward_tracing_events` is set. An `Option` of a
    /// layer is itself a layer, so the result can be added unconditionally.
    pub fn tracing_layer(&self) -> Option<TracingForwarder> {
        if !self.config.logs.forward_tracing_events {
            return None;
        }
        let inner = self.inner.as_ref()?;
        Some(TracingForwarder::new(inner.default_logger.clone()))
    }

    /// Producer handle for messages to additional processors
    pub fn worker_handle(&self) -> Option<WorkerHandle> {
        self.inner.as_ref().map(|inner| inner.handle.clone())
    }

    pub fn stats(&self) -> WorkerStatsSnapshot {
        self.inner
            .as_ref()
            .map(|inner| inner.handle.stats())
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Drain queued work and stop the worker
    ///
    /// Blocks for at most the configured shutdown timeout. Every facade becomes
    /// inert afterwards. Idempotent.
    pub fn shutdown(&self) {
        let Some(inner) = &self.inner else {
            return;
        };

        let mut worker = inner.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if worker.is_stopped() {
            return;
        }

        match worker.stop() {
            Ok(()) => info!("SDK shut down"),
            Err(err) => debug!("SDK shut down without a full drain: {}", err),
        }
    }

    fn send(&self, message: SdkMessage) {
        if let Some(inner) = &self.inner {
            inner.handle.enqueue(message);
        }
    }
}

impl Drop for Sdk {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Sdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sdk")
            .field("noop", &self.is_noop())
            .field("stats", &self.stats())
            .finish()
    }
}
