//! Message Taxonomy
//!
//! Every public facade call becomes exactly one [`Message`]. A message is an
//! immutable value; its [`Target`] is derived from the variant and selects the
//! single processor that will handle it on the worker thread.

use crate::config::{LoggingOptions, SdkConfig};
use crate::types::{
    AttributeValue, Attributes, CoreLoggerLevel, ErrorInfo, LogLevel, LoggerId, RumActionType,
    RumErrorSource, RumHttpMethod, RumResourceType, TrackingConsent,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

// ----------------------------------------------------------------------------
// Target
// ----------------------------------------------------------------------------

/// Routing key naming the processor that handles a message
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Target(Cow<'static, str>);

impl Target {
    pub const SDK: Target = Target(Cow::Borrowed("sdk"));
    pub const LOGS: Target = Target(Cow::Borrowed("logs"));
    pub const RUM: Target = Target(Cow::Borrowed("rum"));

    /// Target for an additional feature domain
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn sdk() -> Self {
        Self::SDK
    }

    pub fn logs() -> Self {
        Self::LOGS
    }

    pub fn rum() -> Self {
        Self::RUM
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Target {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

// ----------------------------------------------------------------------------
// Message
// ----------------------------------------------------------------------------

/// One unit of work for the worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    Sdk(SdkMessage),
    Logs(LogsMessage),
    Rum(RumMessage),
    /// Extension point for feature domains registered under their own target
    Custom {
        target: Target,
        name: String,
        attributes: Attributes,
    },
}

impl Message {
    /// Processor this message is routed to
    pub fn target(&self) -> Target {
        match self {
            Message::Sdk(_) => Target::SDK,
            Message::Logs(_) => Target::LOGS,
            Message::Rum(_) => Target::RUM,
            Message::Custom { target, .. } => target.clone(),
        }
    }

    /// Variant name without payload, used for logging
    pub fn variant_name(&self) -> &'static str {
        match self {
            Message::Sdk(msg) => msg.variant_name(),
            Message::Logs(msg) => msg.variant_name(),
            Message::Rum(msg) => msg.variant_name(),
            Message::Custom { .. } => "Custom",
        }
    }
}

impl From<SdkMessage> for Message {
    fn from(message: SdkMessage) -> Self {
        Message::Sdk(message)
    }
}

impl From<LogsMessage> for Message {
    fn from(message: LogsMessage) -> Self {
        Message::Logs(message)
    }
}

impl From<RumMessage> for Message {
    fn from(message: RumMessage) -> Self {
        Message::Rum(message)
    }
}

// ----------------------------------------------------------------------------
// SDK Messages
// ----------------------------------------------------------------------------

/// SDK-level operations: platform setup and user context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SdkMessage {
    /// Initialize the native platform; always the first message of an instance
    Initialize { config: Box<SdkConfig> },
    SetTrackingConsent { consent: TrackingConsent },
    SetVerbosity { level: CoreLoggerLevel },
    SetUserInfo {
        id: Option<String>,
        name: Option<String>,
        email: Option<String>,
        extra_info: Attributes,
    },
    /// Merge into the existing extra info; `null` values remove keys
    AddUserExtraInfo { extra_info: Attributes },
    ClearAllData,
}

impl SdkMessage {
    pub fn variant_name(&self) -> &'static str {
        match self {
            SdkMessage::Initialize { .. } => "Initialize",
            SdkMessage::SetTrackingConsent { .. } => "SetTrackingConsent",
            SdkMessage::SetVerbosity { .. } => "SetVerbosity",
            SdkMessage::SetUserInfo { .. } => "SetUserInfo",
            SdkMessage::AddUserExtraInfo { .. } => "AddUserExtraInfo",
            SdkMessage::ClearAllData => "ClearAllData",
        }
    }
}

// ----------------------------------------------------------------------------
// Logs Messages
// ----------------------------------------------------------------------------

/// Logging operations, addressed to a logger created through the SDK
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogsMessage {
    CreateLogger {
        logger: LoggerId,
        options: LoggingOptions,
    },
    Log {
        logger: LoggerId,
        level: LogLevel,
        message: String,
        attributes: Attributes,
        error: Option<ErrorInfo>,
    },
    AddTag {
        logger: LoggerId,
        tag: String,
        value: Option<String>,
    },
    RemoveTag {
        logger: LoggerId,
        tag: String,
    },
    RemoveTagsWithKey {
        logger: LoggerId,
        key: String,
    },
    AddAttribute {
        logger: LoggerId,
        key: String,
        value: AttributeValue,
    },
    RemoveAttribute {
        logger: LoggerId,
        key: String,
    },
}

impl LogsMessage {
    pub fn variant_name(&self) -> &'static str {
        match self {
            LogsMessage::CreateLogger { .. } => "CreateLogger",
            LogsMessage::Log { .. } => "Log",
            LogsMessage::AddTag { .. } => "AddTag",
            LogsMessage::RemoveTag { .. } => "RemoveTag",
            LogsMessage::RemoveTagsWithKey { .. } => "RemoveTagsWithKey",
            LogsMessage::AddAttribute { .. } => "AddAttribute",
            LogsMessage::RemoveAttribute { .. } => "RemoveAttribute",
        }
    }

    /// Logger the message is addressed to
    pub fn logger(&self) -> LoggerId {
        match self {
            LogsMessage::CreateLogger { logger, .. }
            | LogsMessage::Log { logger, .. }
            | LogsMessage::AddTag { logger, .. }
            | LogsMessage::RemoveTag { logger, .. }
            | LogsMessage::RemoveTagsWithKey { logger, .. }
            | LogsMessage::AddAttribute { logger, .. }
            | LogsMessage::RemoveAttribute { logger, .. } => *logger,
        }
    }
}

// ----------------------------------------------------------------------------
// RUM Messages
// ----------------------------------------------------------------------------

/// Real-user-monitoring operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RumMessage {
    StartView {
        key: String,
        name: Option<String>,
        attributes: Attributes,
    },
    StopView {
        key: String,
        attributes: Attributes,
    },
    /// Instantaneous action with no duration
    AddAction {
        action_type: RumActionType,
        name: String,
        attributes: Attributes,
    },
    StartAction {
        action_type: RumActionType,
        name: String,
        attributes: Attributes,
    },
    StopAction {
        action_type: RumActionType,
        name: String,
        attributes: Attributes,
    },
    AddError {
        message: String,
        source: RumErrorSource,
        error_type: Option<String>,
        stack: Option<String>,
        attributes: Attributes,
    },
    StartResource {
        key: String,
        method: RumHttpMethod,
        url: String,
        attributes: Attributes,
    },
    StopResource {
        key: String,
        resource_type: RumResourceType,
        status_code: Option<u16>,
        size: Option<u64>,
        attributes: Attributes,
    },
    StopResourceWithError {
        key: String,
        error_type: Option<String>,
        message: String,
        attributes: Attributes,
    },
    AddAttribute {
        key: String,
        value: AttributeValue,
    },
    RemoveAttribute {
        key: String,
    },
    AddFeatureFlag {
        name: String,
        value: AttributeValue,
    },
    StopSession,
}

impl RumMessage {
    pub fn variant_name(&self) -> &'static str {
        match self {
            RumMessage::StartView { .. } => "StartView",
            RumMessage::StopView { .. } => "StopView",
            RumMessage::AddAction { .. } => "AddAction",
            RumMessage::StartAction { .. } => "StartAction",
            RumMessage::StopAction { .. } => "StopAction",
            RumMessage::AddError { .. } => "AddError",
            RumMessage::StartResource { .. } => "StartResource",
            RumMessage::StopResource { .. } => "StopResource",
            RumMessage::StopResourceWithError { .. } => "StopResourceWithError",
            RumMessage::AddAttribute { .. } => "AddAttribute",
            RumMessage::RemoveAttribute { .. } => "RemoveAttribute",
            RumMessage::AddFeatureFlag { .. } => "AddFeatureFlag",
            RumMessage::StopSession => "StopSession",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_derived_from_variant() {
        let log = Message::from(LogsMessage::RemoveTag {
            logger: LoggerId::new(1),
            tag: "env".into(),
        });
        assert_eq!(log.target(), Target::LOGS);
        assert_eq!(Message::from(RumMessage::StopSession).target(), Target::rum());
        assert_eq!(Message::from(SdkMessage::ClearAllData).target().as_str(), "sdk");
    }

    #[test]
    fn test_custom_target() {
        let message = Message::Custom {
            target: Target::new("traces"),
            name: "span".into(),
            attributes: Attributes::new(),
        };
        assert_eq!(message.target(), Target::from("traces"));
        assert_eq!(message.variant_name(), "Custom");
    }
}
