//! Core Types
//!
//! Enumerated kinds decoded at the facade boundary, plus the small structural
//! values carried inside messages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered key→value mapping with string keys and dynamically typed values.
///
/// Insertion order is preserved (`serde_json` is built with `preserve_order`).
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Dynamically typed attribute value
pub type AttributeValue = serde_json::Value;

// ----------------------------------------------------------------------------
// Decodable Kinds
// ----------------------------------------------------------------------------

/// Error returned when a free-form string does not name a known kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized {kind}: {value:?}")]
pub struct UnknownKind {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! decodable_kind {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All variants, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical name of this kind
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<&str> for $name {
            type Error = UnknownKind;

            fn try_from(value: &str) -> Result<Self, UnknownKind> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
                    .ok_or_else(|| UnknownKind {
                        kind: $label,
                        value: value.to_string(),
                    })
            }
        }

        impl TryFrom<&String> for $name {
            type Error = UnknownKind;

            fn try_from(value: &String) -> Result<Self, UnknownKind> {
                $name::try_from(value.as_str())
            }
        }

        impl core::str::FromStr for $name {
            type Err = UnknownKind;

            fn from_str(value: &str) -> Result<Self, UnknownKind> {
                $name::try_from(value)
            }
        }
    };
}

decodable_kind! {
    /// Severity of a log line, ordered from least to most severe
    #[derive(PartialOrd, Ord)]
    LogLevel, "log level" {
        Debug => "Debug",
        Info => "Info",
        Notice => "Notice",
        Warn => "Warn",
        Error => "Error",
        Critical => "Critical",
        Alert => "Alert",
        Emergency => "Emergency",
    }
}

decodable_kind! {
    /// Verbosity of the native SDK's own console output
    #[derive(PartialOrd, Ord)]
    CoreLoggerLevel, "core logger level" {
        Debug => "Debug",
        Warn => "Warn",
        Error => "Error",
        Critical => "Critical",
    }
}

decodable_kind! {
    /// Kind of user action tracked by RUM
    RumActionType, "action type" {
        Tap => "Tap",
        Scroll => "Scroll",
        Swipe => "Swipe",
        Custom => "Custom",
    }
}

decodable_kind! {
    /// Where a RUM error originated
    RumErrorSource, "error source" {
        Source => "Source",
        Network => "Network",
        WebView => "WebView",
        Console => "Console",
        Custom => "Custom",
    }
}

decodable_kind! {
    /// HTTP method of a tracked resource
    RumHttpMethod, "http method" {
        Post => "Post",
        Get => "Get",
        Head => "Head",
        Put => "Put",
        Delete => "Delete",
        Patch => "Patch",
    }
}

decodable_kind! {
    /// Kind of a tracked resource
    RumResourceType, "resource type" {
        Document => "Document",
        Image => "Image",
        Xhr => "Xhr",
        Beacon => "Beacon",
        Css => "Css",
        Fetch => "Fetch",
        Font => "Font",
        Js => "Js",
        Media => "Media",
        Other => "Other",
        Native => "Native",
    }
}

decodable_kind! {
    /// User consent for data collection
    TrackingConsent, "tracking consent" {
        Granted => "Granted",
        NotGranted => "NotGranted",
        Pending => "Pending",
    }
}

decodable_kind! {
    /// Intake site the native SDK uploads to
    DatadogSite, "site" {
        Us1 => "US1",
        Us3 => "US3",
        Us5 => "US5",
        Eu1 => "EU1",
        Us1Fed => "US1_FED",
        Ap1 => "AP1",
    }
}

decodable_kind! {
    /// Batch size hint for the native uploader
    BatchSize, "batch size" {
        Small => "SMALL",
        Medium => "MEDIUM",
        Large => "LARGE",
    }
}

decodable_kind! {
    /// Upload frequency hint for the native uploader
    UploadFrequency, "upload frequency" {
        Frequent => "FREQUENT",
        Average => "AVERAGE",
        Rare => "RARE",
    }
}

impl Default for DatadogSite {
    fn default() -> Self {
        DatadogSite::Us1
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        BatchSize::Medium
    }
}

impl Default for UploadFrequency {
    fn default() -> Self {
        UploadFrequency::Average
    }
}

impl Default for TrackingConsent {
    fn default() -> Self {
        TrackingConsent::Pending
    }
}

// ----------------------------------------------------------------------------
// Structural Values
// ----------------------------------------------------------------------------

/// Identifier of a logger created through the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoggerId(u64);

impl LoggerId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "logger-{}", self.0)
    }
}

/// Information about the current user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub extra_info: Attributes,
}

impl UserInfo {
    /// Merge extra info; a `null` value removes the key
    pub fn merge_extra_info(&mut self, extra_info: &Attributes) {
        for (key, value) in extra_info {
            if value.is_null() {
                self.extra_info.remove(key);
            } else {
                self.extra_info.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Error details attached to a log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: Option<String>,
    pub message: String,
    pub stack: Option<String>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: None,
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}
