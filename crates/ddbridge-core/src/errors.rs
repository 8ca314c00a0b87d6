//! Error types for the ddbridge dispatch engine
//!
//! None of these errors ever reach application call sites. They travel between
//! the worker, processors and the platform, and end up in internal telemetry.

use crate::message::Target;

// ----------------------------------------------------------------------------
// Platform Errors
// ----------------------------------------------------------------------------

/// Failure raised by a native platform call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("Platform call {call} failed: {reason}")]
    CallFailed { call: String, reason: String },
    #[error("Platform feature not available: {feature}")]
    Unavailable { feature: String },
    #[error("Platform not initialized")]
    NotInitialized,
}

impl PlatformError {
    /// Shorthand for a failed named call
    pub fn call_failed(call: impl Into<String>, reason: impl Into<String>) -> Self {
        PlatformError::CallFailed {
            call: call.into(),
            reason: reason.into(),
        }
    }
}

// ----------------------------------------------------------------------------
// Bridge Errors
// ----------------------------------------------------------------------------

/// Main error type for the bridge
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("A processor is already registered for target {target}")]
    DuplicateProcessor { target: Target },

    #[error("Worker already started; processors must be registered before start")]
    AlreadyStarted,

    #[error("No processor registered for target {target}")]
    UnknownTarget { target: Target },

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Processor {target} failed: {reason}")]
    Processor { target: Target, reason: String },

    #[error("Processor {target} panicked: {reason}")]
    ProcessorPanicked { target: Target, reason: String },

    #[error("Failed to spawn worker thread: {reason}")]
    WorkerSpawn { reason: String },

    #[error("Worker did not drain within {timeout_ms}ms")]
    ShutdownTimeout { timeout_ms: u64 },
}

impl BridgeError {
    /// Configuration errors degrade a feature to a no-op instead of aborting startup
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BridgeError::Configuration { .. }
                | BridgeError::DuplicateProcessor { .. }
                | BridgeError::AlreadyStarted
        )
    }

    /// Short machine-readable kind, used as the telemetry error kind
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::Configuration { .. } => "configuration",
            BridgeError::DuplicateProcessor { .. } => "duplicate_processor",
            BridgeError::AlreadyStarted => "already_started",
            BridgeError::UnknownTarget { .. } => "unknown_target",
            BridgeError::Platform(_) => "platform",
            BridgeError::Processor { .. } => "processor",
            BridgeError::ProcessorPanicked { .. } => "processor_panic",
            BridgeError::WorkerSpawn { .. } => "worker_spawn",
            BridgeError::ShutdownTimeout { .. } => "shutdown_timeout",
        }
    }
}

/// Result type used throughout the bridge
pub type BridgeResult<T> = Result<T, BridgeError>;
