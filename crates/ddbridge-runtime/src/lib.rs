//! ddbridge Runtime Engine
//!
//! This crate contains the dispatch engine of the ddbridge SDK bridge:
//! - `Worker`: the single ordered queue and its dedicated dispatch thread
//! - `Processor`: per-domain consumers (sdk, logs, rum) owning feature state
//! - Facades (`Logger`, `RumClient`) that turn calls into messages
//! - `Sdk`: the explicitly owned instance tying it all to a `Platform`
//! - `TracingForwarder`: a layer sending application `tracing` events to the default logger
//!
//! `ddbridge-core` provides the message, configuration and platform definitions.

pub mod builder;
pub mod facade;
pub mod forwarding;
pub mod processor;
pub mod processors;
pub mod sdk;
pub mod stats;
pub mod telemetry;
pub mod worker;

pub use builder::SdkBuilder;
pub use facade::{Logger, RumClient};
pub use forwarding::TracingForwarder;
pub use processor::{Processor, ProcessorRegistry};
pub use processors::{LogsProcessor, RumProcessor, SdkProcessor};
pub use sdk::Sdk;
pub use stats::{WorkerStats, WorkerStatsSnapshot};
pub use telemetry::InternalReporter;
pub use worker::{Worker, WorkerHandle};

// Re-export core types for convenience
pub use ddbridge_core::{
    Attributes, BridgeError, BridgeResult, LogLevel, LoggingOptions, Message, NoOpPlatform,
    Platform, RumActionType, RumErrorSource, RumHttpMethod, RumResourceType, SdkConfig, Target,
    TrackingConsent,
};
