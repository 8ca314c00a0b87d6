//! Dispatch Logging Infrastructure
//!
//! Structured logging for messages moving through the worker queue: when they
//! are enqueued, dispatched to a processor, or dropped. Output goes through
//! `tracing` so the host decides where it ends up.

use crate::message::{LogsMessage, Message, RumMessage, SdkMessage};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::Level;

// ----------------------------------------------------------------------------
// Log Event Types
// ----------------------------------------------------------------------------

/// Queue stage a message is observed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Enqueue,
    Dispatch,
    Drop,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Enqueue => write!(f, "→"),
            Stage::Dispatch => write!(f, "←"),
            Stage::Drop => write!(f, "✗"),
        }
    }
}

/// Message type classification for logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    Sdk(String),
    Logs(String),
    Rum(String),
    Custom(String),
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageType::Sdk(variant) => write!(f, "Sdk::{}", variant),
            MessageType::Logs(variant) => write!(f, "Logs::{}", variant),
            MessageType::Rum(variant) => write!(f, "Rum::{}", variant),
            MessageType::Custom(name) => write!(f, "Custom::{}", name),
        }
    }
}

impl From<&Message> for MessageType {
    fn from(message: &Message) -> Self {
        match message {
            Message::Sdk(msg) => MessageType::Sdk(msg.variant_name().to_string()),
            Message::Logs(msg) => MessageType::Logs(msg.variant_name().to_string()),
            Message::Rum(msg) => MessageType::Rum(msg.variant_name().to_string()),
            Message::Custom { name, .. } => MessageType::Custom(name.clone()),
        }
    }
}

// ----------------------------------------------------------------------------
// Message Summary Generation
// ----------------------------------------------------------------------------

pub trait MessageSummary {
    fn summary(&self) -> String;
}

impl MessageSummary for Message {
    fn summary(&self) -> String {
        match self {
            Message::Sdk(msg) => msg.summary(),
            Message::Logs(msg) => msg.summary(),
            Message::Rum(msg) => msg.summary(),
            Message::Custom {
                target, attributes, ..
            } => format!("target:{} attributes:{}", target, attributes.len()),
        }
    }
}

impl MessageSummary for SdkMessage {
    fn summary(&self) -> String {
        match self {
            SdkMessage::Initialize { config } => {
                format!("env:{} site:{} rum:{}", config.env, config.site, config.rum.enabled)
            }
            SdkMessage::SetTrackingConsent { consent } => format!("consent:{}", consent),
            SdkMessage::SetVerbosity { level } => format!("level:{}", level),
            SdkMessage::SetUserInfo { id, extra_info, .. } => {
                format!("id:{:?} extra:{}", id, extra_info.len())
            }
            SdkMessage::AddUserExtraInfo { extra_info } => format!("extra:{}", extra_info.len()),
            SdkMessage::ClearAllData => "clearing all data".to_string(),
        }
    }
}

impl MessageSummary for LogsMessage {
    fn summary(&self) -> String {
        match self {
            LogsMessage::CreateLogger { logger, options } => {
                format!("{} name:{:?} threshold:{}", logger, options.name, options.remote_log_threshold)
            }
            LogsMessage::Log {
                logger,
                level,
                message,
                ..
            } => format!("{} level:{} content:{:.20}...", logger, level, message),
            LogsMessage::AddTag { logger, tag, .. } => format!("{} tag:{}", logger, tag),
            LogsMessage::RemoveTag { logger, tag } => format!("{} tag:{}", logger, tag),
            LogsMessage::RemoveTagsWithKey { logger, key } => format!("{} key:{}", logger, key),
            LogsMessage::AddAttribute { logger, key, .. } => format!("{} key:{}", logger, key),
            LogsMessage::RemoveAttribute { logger, key } => format!("{} key:{}", logger, key),
        }
    }
}

impl MessageSummary for RumMessage {
    fn summary(&self) -> String {
        match self {
            RumMessage::StartView { key, name, .. } => format!("key:{} name:{:?}", key, name),
            RumMessage::StopView { key, .. } => format!("key:{}", key),
            RumMessage::AddAction {
                action_type, name, ..
            }
            | RumMessage::StartAction {
                action_type, name, ..
            }
            | RumMessage::StopAction {
                action_type, name, ..
            } => format!("type:{} name:{}", action_type, name),
            RumMessage::AddError {
                message, source, ..
            } => format!("source:{} message:{:.20}...", source, message),
            RumMessage::StartResource {
                key, method, url, ..
            } => format!("key:{} {} {}", key, method, url),
            RumMessage::StopResource {
                key,
                resource_type,
                status_code,
                ..
            } => format!("key:{} type:{} status:{:?}", key, resource_type, status_code),
            RumMessage::StopResourceWithError { key, message, .. } => {
                format!("key:{} error:{:.20}...", key, message)
            }
            RumMessage::AddAttribute { key, .. } | RumMessage::RemoveAttribute { key } => {
                format!("key:{}", key)
            }
            RumMessage::AddFeatureFlag { name, .. } => format!("flag:{}", name),
            RumMessage::StopSession => "stopping session".to_string(),
        }
    }
}

// ----------------------------------------------------------------------------
// Logger Implementation
// ----------------------------------------------------------------------------

/// Logger for messages crossing the worker queue
pub trait DispatchLogger {
    fn log_enqueue(&self, message: &Message, depth: usize);

    fn log_dispatch(&self, message: &Message, depth: usize);

    fn log_drop(&self, message: &Message, reason: &str);

    fn log_worker_event(&self, level: Level, event: &str);
}

/// Logger writing through `tracing`
#[derive(Debug, Clone)]
pub struct TracingLogger {
    min_level: Level,
}

impl TracingLogger {
    pub fn new(min_level: Level) -> Self {
        Self { min_level }
    }

    // `tracing::Level` orders TRACE as the greatest value
    fn should_log(&self, level: Level) -> bool {
        level <= self.min_level
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl DispatchLogger for TracingLogger {
    fn log_enqueue(&self, message: &Message, depth: usize) {
        if !self.should_log(Level::DEBUG) {
            return;
        }

        tracing::debug!(
            target: "ddbridge::dispatch",
            depth,
            "{} {} {} {}",
            Stage::Enqueue,
            message.target(),
            MessageType::from(message),
            message.summary()
        );
    }

    fn log_dispatch(&self, message: &Message, depth: usize) {
        if !self.should_log(Level::DEBUG) {
            return;
        }

        tracing::debug!(
            target: "ddbridge::dispatch",
            depth,
            "{} {} {} {}",
            Stage::Dispatch,
            message.target(),
            MessageType::from(message),
            message.summary()
        );
    }

    fn log_drop(&self, message: &Message, reason: &str) {
        if !self.should_log(Level::WARN) {
            return;
        }

        tracing::warn!(
            target: "ddbridge::dispatch",
            "{} {} {} {} reason:{}",
            Stage::Drop,
            message.target(),
            MessageType::from(message),
            message.summary(),
            reason
        );
    }

    fn log_worker_event(&self, level: Level, event: &str) {
        if !self.should_log(level) {
            return;
        }

        match level {
            Level::ERROR => tracing::error!(target: "ddbridge::worker", "{}", event),
            Level::WARN => tracing::warn!(target: "ddbridge::worker", "{}", event),
            Level::INFO => tracing::info!(target: "ddbridge::worker", "{}", event),
            Level::DEBUG => tracing::debug!(target: "ddbridge::worker", "{}", event),
            _ => tracing::trace!(target: "ddbridge::worker", "{}", event),
        }
    }
}

/// No-op logger for production or when dispatch logging is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl DispatchLogger for NoOpLogger {
    fn log_enqueue(&self, _message: &Message, _depth: usize) {}

    fn log_dispatch(&self, _message: &Message, _depth: usize) {}

    fn log_drop(&self, _message: &Message, _reason: &str) {}

    fn log_worker_event(&self, _level: Level, _event: &str) {}
}

/// Logger wrapper for object safety
#[derive(Debug, Clone)]
pub enum LoggerWrapper {
    Tracing(TracingLogger),
    NoOp(NoOpLogger),
}

impl LoggerWrapper {
    /// Pick the tracing logger when dispatch logging is enabled
    pub fn for_dispatch_logging(enabled: bool) -> Self {
        if enabled {
            LoggerWrapper::Tracing(TracingLogger::default())
        } else {
            LoggerWrapper::NoOp(NoOpLogger)
        }
    }
}

impl DispatchLogger for LoggerWrapper {
    fn log_enqueue(&self, message: &Message, depth: usize) {
        match self {
            LoggerWrapper::Tracing(logger) => logger.log_enqueue(message, depth),
            LoggerWrapper::NoOp(logger) => logger.log_enqueue(message, depth),
        }
    }

    fn log_dispatch(&self, message: &Message, depth: usize) {
        match self {
            LoggerWrapper::Tracing(logger) => logger.log_dispatch(message, depth),
            LoggerWrapper::NoOp(logger) => logger.log_dispatch(message, depth),
        }
    }

    fn log_drop(&self, message: &Message, reason: &str) {
        match self {
            LoggerWrapper::Tracing(logger) => logger.log_drop(message, reason),
            LoggerWrapper::NoOp(logger) => logger.log_drop(message, reason),
        }
    }

    fn log_worker_event(&self, level: Level, event: &str) {
        match self {
            LoggerWrapper::Tracing(logger) => logger.log_worker_event(level, event),
            LoggerWrapper::NoOp(logger) => logger.log_worker_event(level, event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attributes, LogLevel, LoggerId};

    #[test]
    fn test_message_type_conversion() {
        let message = Message::from(RumMessage::StopSession);
        assert_eq!(
            MessageType::from(&message),
            MessageType::Rum("StopSession".to_string())
        );
        assert_eq!(MessageType::from(&message).to_string(), "Rum::StopSession");
    }

    #[test]
    fn test_log_summary_truncates_content() {
        let message = Message::from(LogsMessage::Log {
            logger: LoggerId::new(3),
            level: LogLevel::Info,
            message: "a very long log line that keeps going".to_string(),
            attributes: Attributes::new(),
            error: None,
        });
        let summary = message.summary();
        assert!(summary.starts_with("logger-3 level:Info"));
        assert!(summary.contains("a very long log line..."));
    }

    #[test]
    fn test_tracing_logger_level_filtering() {
        let logger = TracingLogger::new(Level::WARN);
        assert!(!logger.should_log(Level::DEBUG));
        assert!(!logger.should_log(Level::INFO));
        assert!(logger.should_log(Level::WARN));
        assert!(logger.should_log(Level::ERROR));
    }
}
