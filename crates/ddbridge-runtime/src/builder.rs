//! SDK Builder API
//!
//! Builder-style construction for hosts (CLI, tests, engine bindings) that need
//! more than [`Sdk::init`]: extra processors for additional feature domains, or
//! worker settings that differ from the configuration file.

use crate::facade::RumClient;
use crate::processor::Processor;
use crate::processors::{LogsProcessor, RumProcessor, SdkProcessor};
use crate::sdk::{create_logger, Sdk, SdkInner};
use crate::telemetry::InternalReporter;
use crate::worker::Worker;
use ddbridge_core::{BridgeError, Platform, SdkConfig, SdkMessage, Target, WorkerConfig};
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

/// Builder for an [`Sdk`] instance
pub struct SdkBuilder {
    platform: Arc<dyn Platform>,
    config: SdkConfig,
    processors: Vec<(Target, Box<dyn Processor>)>,
}

impl SdkBuilder {
    /// Create a new builder bound to a platform
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self {
            platform,
            config: SdkConfig::default(),
            processors: Vec::new(),
        }
    }

    /// Set the SDK configuration
    pub fn with_config(mut self, config: SdkConfig) -> Self {
        self.config = config;
        self
    }

    /// Log every enqueue and dispatch at debug level
    pub fn with_dispatch_logging(mut self, enabled: bool) -> Self {
        self.config.worker.dispatch_logging = enabled;
        self
    }

    /// Maximum time shutdown waits for the queue to drain
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.worker.shutdown_timeout_ms =
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX).max(1);
        self
    }

    /// Register a processor for an additional target
    ///
    /// Built-in targets are registered first, so a processor claiming `sdk`,
    /// `logs` or `rum` is rejected and reported when the SDK starts.
    pub fn with_processor(mut self, target: Target, processor: impl Processor + 'static) -> Self {
        let processor: Box<dyn Processor> = Box::new(processor);
        self.processors.push((target, processor));
        self
    }

    /// Build and start the SDK
    pub fn build(self) -> Sdk {
        let SdkBuilder {
            platform,
            config,
            processors,
        } = self;

        if !config.enabled {
            info!("SDK disabled by configuration; all calls are ignored");
            return Sdk::disabled(config);
        }

        let reporter = InternalReporter::new(platform.clone());
        let mut config = config;
        if let Err(problems) = config.validate() {
            for reason in problems {
                reporter.error("Invalid SDK configuration", &BridgeError::Configuration { reason });
            }
        }

        // A zero timeout would skip the shutdown drain entirely
        if config.worker.shutdown_timeout_ms == 0 {
            config.worker.shutdown_timeout_ms = WorkerConfig::default().shutdown_timeout_ms;
        }

        let config = Arc::new(config);
        let mut worker = Worker::new(config.worker.clone(), reporter);
        let handle = worker.handle();

        // Platform initialization is always the first message dispatched
        handle.enqueue(SdkMessage::Initialize {
            config: Box::new(config.as_ref().clone()),
        });

        let rum_enabled = config.rum.enabled && config.rum.application_id().is_some();
        let mut builtins: Vec<(Target, Box<dyn Processor>)> = vec![
            (
                Target::SDK,
                Box::new(SdkProcessor::new(platform.clone())) as Box<dyn Processor>,
            ),
            (
                Target::LOGS,
                Box::new(LogsProcessor::new(platform.clone())) as Box<dyn Processor>,
            ),
        ];
        if rum_enabled {
            builtins.push((
                Target::RUM,
                Box::new(RumProcessor::new(platform.clone(), config.clone())) as Box<dyn Processor>,
            ));
        } else {
            debug!("RUM not configured; RUM calls are ignored");
        }

        for (target, processor) in builtins.into_iter().chain(processors) {
            if let Err(err) = worker.register_processor(target, processor) {
                debug!("Processor not registered: {}", err);
            }
        }

        let rum = if rum_enabled {
            RumClient::new(handle.clone())
        } else {
            RumClient::NoOp
        };

        let next_logger_id = AtomicU64::new(1);
        let default_logger =
            create_logger(&handle, &next_logger_id, config.default_logging_options());

        // Errors are already reported; facades become inert if the worker failed
        let _ = worker.start();

        let inner = SdkInner {
            worker: Mutex::new(worker),
            handle,
            next_logger_id,
            default_logger,
            rum,
        };
        Sdk::running(config, inner)
    }
}

impl std::fmt::Debug for SdkBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkBuilder")
            .field("config", &self.config)
            .field(
                "processors",
                &self.processors.iter().map(|(t, _)| t).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddbridge_core::NoOpPlatform;

    fn timeout_ms(timeout: Duration) -> u64 {
        SdkBuilder::new(Arc::new(NoOpPlatform))
            .with_shutdown_timeout(timeout)
            .config
            .worker
            .shutdown_timeout_ms
    }

    #[test]
    fn test_shutdown_timeout_saturates() {
        assert_eq!(timeout_ms(Duration::from_millis(250)), 250);
        assert_eq!(timeout_ms(Duration::MAX), u64::MAX);
        assert_eq!(timeout_ms(Duration::ZERO), 1);
        assert_eq!(timeout_ms(Duration::from_micros(300)), 1);
    }
}
