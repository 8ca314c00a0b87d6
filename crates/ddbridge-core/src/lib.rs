//! ddbridge Core Definitions
//!
//! This crate provides the stable API definitions shared by the dispatch engine
//! and its hosts:
//! - `Message`: the typed unit of work and its routing `Target`
//! - Enumerated kinds decoded at the facade boundary
//! - `SdkConfig` and its feature sections
//! - `Platform`: the capability interface wrapping a native SDK
//! - Error types and dispatch logging
//!
//! `ddbridge-runtime` builds the worker, processors and facades on top of it.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod config;
pub mod dispatch_logging;
pub mod errors;
pub mod message;
pub mod platform;
pub mod types;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use config::{LoggingOptions, LogsConfig, RumConfig, SdkConfig, WorkerConfig};
pub use dispatch_logging::{
    DispatchLogger, LoggerWrapper, MessageSummary, MessageType, NoOpLogger, Stage, TracingLogger,
};
pub use errors::{BridgeError, BridgeResult, PlatformError};
pub use message::{LogsMessage, Message, RumMessage, SdkMessage, Target};
pub use platform::{
    NoOpPlatform, NoOpPlatformLogger, NoOpPlatformRum, Platform, PlatformLogger, PlatformResult,
    PlatformRum,
};
pub use types::{
    AttributeValue, Attributes, BatchSize, CoreLoggerLevel, DatadogSite, ErrorInfo, LogLevel,
    LoggerId, RumActionType, RumErrorSource, RumHttpMethod, RumResourceType, TrackingConsent,
    UnknownKind, UploadFrequency, UserInfo,
};
