//! Internal Telemetry
//!
//! Side channel for failures inside the bridge itself. Every report is written
//! as a `tracing` event and forwarded to the platform's telemetry calls. A
//! failing or panicking platform never propagates out of the reporter.

use ddbridge_core::{BridgeError, NoOpPlatform, Platform, PlatformResult};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Reporter shared by the worker, the SDK instance and its builder
#[derive(Clone)]
pub struct InternalReporter {
    platform: Arc<dyn Platform>,
}

impl InternalReporter {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self { platform }
    }

    /// Reporter that only writes `tracing` events
    pub fn tracing_only() -> Self {
        Self::new(Arc::new(NoOpPlatform))
    }

    /// Report a diagnostic message
    pub fn debug(&self, message: &str) {
        debug!(target: "ddbridge::telemetry", "{}", message);
        self.forward(|platform| platform.send_debug_telemetry(message));
    }

    /// Report a recoverable problem, such as a drain that timed out
    pub fn warning(&self, message: &str) {
        warn!(target: "ddbridge::telemetry", "{}", message);
        self.forward(|platform| platform.send_debug_telemetry(message));
    }

    /// Report a bridge error
    pub fn error(&self, context: &str, err: &BridgeError) {
        let message = format!("{}: {}", context, err);
        if err.is_configuration() {
            warn!(target: "ddbridge::telemetry", kind = err.kind(), "{}", message);
        } else {
            error!(target: "ddbridge::telemetry", kind = err.kind(), "{}", message);
        }
        self.forward(|platform| platform.send_error_telemetry(&message, None, Some(err.kind())));
    }

    fn forward<F>(&self, call: F)
    where
        F: FnOnce(&dyn Platform) -> PlatformResult<()>,
    {
        let platform = self.platform.as_ref();
        match panic::catch_unwind(AssertUnwindSafe(|| call(platform))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => debug!(target: "ddbridge::telemetry", "Telemetry forwarding failed: {}", err),
            Err(_) => debug!(target: "ddbridge::telemetry", "Telemetry forwarding panicked"),
        }
    }
}

impl std::fmt::Debug for InternalReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InternalReporter").finish_non_exhaustive()
    }
}
