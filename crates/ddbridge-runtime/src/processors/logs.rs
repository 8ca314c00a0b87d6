//! Logs processor: the table of native loggers

use crate::processor::{unexpected_message, Processor};
use ddbridge_core::{
    BridgeResult, LogLevel, LoggerId, LoggingOptions, LogsMessage, Message, Platform,
    PlatformLogger, Target,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

struct LoggerEntry {
    logger: Box<dyn PlatformLogger>,
    threshold: LogLevel,
}

/// Owns every native logger created through the SDK
pub struct LogsProcessor {
    platform: Arc<dyn Platform>,
    loggers: HashMap<LoggerId, LoggerEntry>,
}

impl LogsProcessor {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self {
            platform,
            loggers: HashMap::new(),
        }
    }

    pub fn logger_count(&self) -> usize {
        self.loggers.len()
    }

    pub fn has_logger(&self, id: LoggerId) -> bool {
        self.loggers.contains_key(&id)
    }

    fn create_logger(&mut self, id: LoggerId, options: LoggingOptions) -> BridgeResult<()> {
        // On failure the id stays unknown and every later call for it is ignored
        let logger = self.platform.create_logger(&options)?;
        self.loggers.insert(
            id,
            LoggerEntry {
                logger,
                threshold: options.remote_log_threshold,
            },
        );
        Ok(())
    }

    fn handle(&mut self, message: LogsMessage) -> BridgeResult<()> {
        if let LogsMessage::CreateLogger { logger, options } = message {
            return self.create_logger(logger, options);
        }

        let id = message.logger();
        let Some(entry) = self.loggers.get_mut(&id) else {
            debug!(logger = %id, "Ignoring {} for unknown logger", message.variant_name());
            return Ok(());
        };

        match message {
            LogsMessage::Log {
                level,
                message,
                attributes,
                error,
                ..
            } => {
                if level < entry.threshold {
                    return Ok(());
                }
                entry
                    .logger
                    .log(level, &message, &attributes, error.as_ref())?;
            }
            LogsMessage::AddTag { tag, value, .. } => {
                entry.logger.add_tag(&tag, value.as_deref())?;
            }
            LogsMessage::RemoveTag { tag, .. } => {
                entry.logger.remove_tag(&tag)?;
            }
            LogsMessage::RemoveTagsWithKey { key, .. } => {
                entry.logger.remove_tags_with_key(&key)?;
            }
            LogsMessage::AddAttribute { key, value, .. } => {
                entry.logger.add_attribute(&key, &value)?;
            }
            LogsMessage::RemoveAttribute { key, .. } => {
                entry.logger.remove_attribute(&key)?;
            }
            LogsMessage::CreateLogger { .. } => {}
        }
        Ok(())
    }
}

impl Processor for LogsProcessor {
    fn process(&mut self, message: Message) -> BridgeResult<()> {
        match message {
            Message::Logs(message) => self.handle(message),
            other => Err(unexpected_message(Target::LOGS, &other)),
        }
    }
}
