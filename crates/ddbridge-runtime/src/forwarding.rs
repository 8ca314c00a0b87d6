//! Forwarding of application `tracing` events
//!
//! [`TracingForwarder`] is a `tracing_subscriber` layer that turns every event
//! the application emits into a line on the SDK's default logger. Install it
//! next to the host's own layers:
//!
//! ```rust,ignore
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(sdk.tracing_layer())
//!     .init();
//! ```
//!
//! Events from the bridge's own crates and anything emitted on the worker
//! thread are skipped, so forwarding never feeds on its own output.

use crate::facade::Logger;
use crate::worker::WORKER_THREAD_NAME;
use ddbridge_core::{AttributeValue, Attributes, LogLevel};
use std::fmt::{self, Write};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Targets of every event emitted by the bridge start with this
const BRIDGE_TARGET_PREFIX: &str = "ddbridge";

/// Attribute carrying the `tracing` target of a forwarded event
pub const TARGET_ATTRIBUTE: &str = "logger.name";

/// Layer sending application events to a [`Logger`]
#[derive(Debug, Clone)]
pub struct TracingForwarder {
    logger: Logger,
}

impl TracingForwarder {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    fn accepts(target: &str) -> bool {
        !target.starts_with(BRIDGE_TARGET_PREFIX)
            && std::thread::current().name() != Some(WORKER_THREAD_NAME)
    }
}

fn log_level(level: &Level) -> LogLevel {
    if *level == Level::ERROR {
        LogLevel::Error
    } else if *level == Level::WARN {
        LogLevel::Warn
    } else if *level == Level::INFO {
        LogLevel::Info
    } else {
        LogLevel::Debug
    }
}

impl<S: Subscriber> Layer<S> for TracingForwarder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if self.logger.is_noop() || !Self::accepts(metadata.target()) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let EventVisitor {
            message,
            mut attributes,
        } = visitor;
        attributes.insert(
            TARGET_ATTRIBUTE.to_string(),
            AttributeValue::from(metadata.target()),
        );
        self.logger
            .log(log_level(metadata.level()), message, Some(attributes), None);
    }
}

/// Collects the `message` field and turns every other field into an attribute
#[derive(Default)]
struct EventVisitor {
    message: String,
    attributes: Attributes,
}

impl EventVisitor {
    fn insert(&mut self, field: &Field, value: AttributeValue) {
        self.attributes.insert(field.name().to_string(), value);
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.insert(field, AttributeValue::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, AttributeValue::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, AttributeValue::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, AttributeValue::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, AttributeValue::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            self.insert(field, AttributeValue::from(format!("{:?}", value)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::InternalReporter;
    use crate::worker::Worker;
    use ddbridge_core::{
        BridgeResult, LoggerId, LogsMessage, Message, Target, WorkerConfig,
    };
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::SubscriberExt;

    fn create_logging_worker(lines: Arc<Mutex<Vec<LogsMessage>>>) -> Worker {
        let mut worker = Worker::new(WorkerConfig::testing(), InternalReporter::tracing_only());
        worker
            .register_processor(
                Target::logs(),
                Box::new(move |message: Message| -> BridgeResult<()> {
                    if let Message::Logs(message) = message {
                        lines.lock().unwrap().push(message);
                    }
                    Ok(())
                }),
            )
            .unwrap();
        worker
    }

    #[test]
    fn test_application_events_become_log_lines() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let mut worker = create_logging_worker(lines.clone());
        let forwarder = TracingForwarder::new(Logger::new(LoggerId::new(1), worker.handle()));
        worker.start().unwrap();

        let subscriber = tracing_subscriber::registry().with(forwarder);
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "game", fps = 12u64, scene = "forest", "frame rate dropped to {}", 12);
            tracing::info!(target: "ddbridge::telemetry", "bridge internals stay local");
            // Events from this crate carry a ddbridge_runtime target
            tracing::info!("also skipped");
        });
        worker.stop().unwrap();

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        let LogsMessage::Log {
            level,
            message,
            attributes,
            ..
        } = &lines[0]
        else {
            panic!("expected a log line, got {:?}", lines[0]);
        };
        assert_eq!(*level, LogLevel::Warn);
        assert_eq!(message, "frame rate dropped to 12");
        assert_eq!(attributes.get("fps"), Some(&json!(12)));
        assert_eq!(attributes.get("scene"), Some(&json!("forest")));
        assert_eq!(attributes.get(TARGET_ATTRIBUTE), Some(&json!("game")));
    }

    #[test]
    fn test_levels_map_onto_log_levels() {
        assert_eq!(log_level(&Level::TRACE), LogLevel::Debug);
        assert_eq!(log_level(&Level::DEBUG), LogLevel::Debug);
        assert_eq!(log_level(&Level::INFO), LogLevel::Info);
        assert_eq!(log_level(&Level::WARN), LogLevel::Warn);
        assert_eq!(log_level(&Level::ERROR), LogLevel::Error);
    }

    #[test]
    fn test_noop_logger_forwards_nothing() {
        let subscriber = tracing_subscriber::registry().with(TracingForwarder::new(Logger::NoOp));
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: "game", "nothing to receive this");
        });
    }
}
