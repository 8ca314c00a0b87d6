//! Logger facade

use super::{attributes_or_empty, decode, require_key};
use crate::worker::WorkerHandle;
use ddbridge_core::{AttributeValue, Attributes, ErrorInfo, LogLevel, LoggerId, LogsMessage};

/// Handle to a logger created through the SDK
///
/// Cheap to clone and safe to use from any thread. Lines below the logger's
/// remote threshold are filtered on the worker thread, not here.
#[derive(Debug, Clone, Default)]
pub enum Logger {
    #[default]
    NoOp,
    Worker {
        id: LoggerId,
        handle: WorkerHandle,
    },
}

impl Logger {
    pub(crate) fn new(id: LoggerId, handle: WorkerHandle) -> Self {
        Logger::Worker { id, handle }
    }

    /// Identifier of the underlying logger, if any
    pub fn id(&self) -> Option<LoggerId> {
        match self {
            Logger::NoOp => None,
            Logger::Worker { id, .. } => Some(*id),
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Logger::NoOp)
    }

    /// Log a line at `level`, given as a [`LogLevel`] or its name
    pub fn log<L>(
        &self,
        level: L,
        message: impl Into<String>,
        attributes: Option<Attributes>,
        error: Option<ErrorInfo>,
    ) where
        L: TryInto<LogLevel>,
    {
        let Logger::Worker { id, handle } = self else {
            return;
        };
        let Some(level) = decode(level, "log level") else {
            return;
        };

        handle.enqueue(LogsMessage::Log {
            logger: *id,
            level,
            message: message.into(),
            attributes: attributes_or_empty(attributes),
            error,
        });
    }

    pub fn debug(&self, message: impl Into<String>, attributes: Option<Attributes>) {
        self.log(LogLevel::Debug, message, attributes, None);
    }

    pub fn info(&self, message: impl Into<String>, attributes: Option<Attributes>) {
        self.log(LogLevel::Info, message, attributes, None);
    }

    pub fn notice(&self, message: impl Into<String>, attributes: Option<Attributes>) {
        self.log(LogLevel::Notice, message, attributes, None);
    }

    pub fn warn(&self, message: impl Into<String>, attributes: Option<Attributes>) {
        self.log(LogLevel::Warn, message, attributes, None);
    }

    pub fn error(&self, message: impl Into<String>, attributes: Option<Attributes>) {
        self.log(LogLevel::Error, message, attributes, None);
    }

    pub fn critical(&self, message: impl Into<String>, attributes: Option<Attributes>) {
        self.log(LogLevel::Critical, message, attributes, None);
    }

    pub fn alert(&self, message: impl Into<String>, attributes: Option<Attributes>) {
        self.log(LogLevel::Alert, message, attributes, None);
    }

    pub fn emergency(&self, message: impl Into<String>, attributes: Option<Attributes>) {
        self.log(LogLevel::Emergency, message, attributes, None);
    }

    /// Add a `tag` or `tag:value` to every line of this logger
    pub fn add_tag(&self, tag: &str, value: Option<&str>) {
        self.send_keyed(tag, "tag", |logger| LogsMessage::AddTag {
            logger,
            tag: tag.to_string(),
            value: value.map(str::to_string),
        });
    }

    pub fn remove_tag(&self, tag: &str) {
        self.send_keyed(tag, "tag", |logger| LogsMessage::RemoveTag {
            logger,
            tag: tag.to_string(),
        });
    }

    /// Remove every `key:*` tag
    pub fn remove_tags_with_key(&self, key: &str) {
        self.send_keyed(key, "tag key", |logger| LogsMessage::RemoveTagsWithKey {
            logger,
            key: key.to_string(),
        });
    }

    pub fn add_attribute(&self, key: &str, value: impl Into<AttributeValue>) {
        let value = value.into();
        self.send_keyed(key, "attribute key", |logger| LogsMessage::AddAttribute {
            logger,
            key: key.to_string(),
            value,
        });
    }

    pub fn remove_attribute(&self, key: &str) {
        self.send_keyed(key, "attribute key", |logger| LogsMessage::RemoveAttribute {
            logger,
            key: key.to_string(),
        });
    }

    fn send_keyed<F>(&self, key: &str, what: &str, build: F)
    where
        F: FnOnce(LoggerId) -> LogsMessage,
    {
        if let Logger::Worker { id, handle } = self {
            if require_key(key, what) {
                handle.enqueue(build(*id));
            }
        }
    }
}
