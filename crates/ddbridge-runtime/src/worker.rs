//! Dispatch Worker
//!
//! The worker owns a single FIFO queue shared by every feature domain and one
//! dedicated OS thread that drains it. Producers hold a cheap [`WorkerHandle`]
//! and never block: enqueueing pushes onto an unbounded channel and returns.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle ──start()──▶ Running ──stop()──▶ Stopped
//!   │                                    ▲
//!   └───────────────stop()───────────────┘
//! ```
//!
//! Messages enqueued while idle are buffered and dispatched once the worker
//! starts. `stop()` closes the queue to new messages, lets the thread dispatch
//! everything queued before the call, and waits for it up to the configured
//! shutdown timeout.

use crate::processor::{Processor, ProcessorRegistry};
use crate::stats::{WorkerStats, WorkerStatsSnapshot};
use crate::telemetry::InternalReporter;
use ddbridge_core::{
    BridgeError, BridgeResult, DispatchLogger, LoggerWrapper, Message, Target, WorkerConfig,
};
use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc as std_mpsc, Arc};
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn, Level};

/// Name of the dispatch thread
pub const WORKER_THREAD_NAME: &str = "ddbridge-worker";

/// Queue entry: a message, or the sentinel that ends the dispatch loop
#[derive(Debug)]
enum Envelope {
    Message(Message),
    Drain,
}

/// State shared between every handle and the worker thread
#[derive(Debug)]
struct Shared {
    accepting: AtomicBool,
    stats: WorkerStats,
    logger: LoggerWrapper,
}

// ----------------------------------------------------------------------------
// Worker Handle
// ----------------------------------------------------------------------------

/// Cloneable producer side of the worker queue
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    sender: UnboundedSender<Envelope>,
    shared: Arc<Shared>,
}

impl WorkerHandle {
    /// Append a message to the tail of the queue
    ///
    /// Never blocks. Returns `false` when the message was dropped because the
    /// worker has been stopped.
    pub fn enqueue(&self, message: impl Into<Message>) -> bool {
        let message = message.into();
        let shared = &self.shared;

        if !shared.accepting.load(Ordering::Acquire) {
            shared.stats.record_dropped();
            shared.logger.log_drop(&message, "worker stopped");
            return false;
        }

        let depth = shared.stats.record_enqueued();
        shared.logger.log_enqueue(&message, depth);
        if shared.stats.should_warn_backlog(depth) {
            warn!(
                depth,
                threshold = shared.stats.warning_depth(),
                "Worker queue backlog is growing; processors are not keeping up"
            );
        }

        match self.sender.send(Envelope::Message(message)) {
            Ok(()) => true,
            Err(mpsc::error::SendError(envelope)) => {
                shared.stats.record_rejected();
                if let Envelope::Message(message) = envelope {
                    shared.logger.log_drop(&message, "worker thread exited");
                }
                false
            }
        }
    }

    /// Whether new messages are still accepted
    pub fn is_accepting(&self) -> bool {
        self.shared.accepting.load(Ordering::Acquire)
    }

    /// Current queue statistics
    pub fn stats(&self) -> WorkerStatsSnapshot {
        self.shared.stats.snapshot()
    }
}

// ----------------------------------------------------------------------------
// Worker
// ----------------------------------------------------------------------------

enum WorkerState {
    Idle {
        receiver: UnboundedReceiver<Envelope>,
        registry: ProcessorRegistry,
    },
    Running {
        thread: JoinHandle<()>,
        done: std_mpsc::Receiver<()>,
    },
    Stopped,
}

/// Single-consumer dispatch worker
pub struct Worker {
    config: WorkerConfig,
    handle: WorkerHandle,
    state: WorkerState,
    /// Registration problems reported when the worker starts
    registration_errors: Vec<BridgeError>,
    reporter: InternalReporter,
}

impl Worker {
    /// Create an idle worker; its queue accepts messages immediately
    pub fn new(config: WorkerConfig, reporter: InternalReporter) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            accepting: AtomicBool::new(true),
            stats: WorkerStats::new(config.queue_warning_depth),
            logger: LoggerWrapper::for_dispatch_logging(config.dispatch_logging),
        });

        Self {
            config,
            handle: WorkerHandle { sender, shared },
            state: WorkerState::Idle {
                receiver,
                registry: ProcessorRegistry::new(),
            },
            registration_errors: Vec::new(),
            reporter,
        }
    }

    /// Producer handle for facades and other threads
    pub fn handle(&self) -> WorkerHandle {
        self.handle.clone()
    }

    /// Register the processor for `target`
    ///
    /// Only allowed before [`start`](Self::start). A duplicate target keeps the
    /// first processor; the error is returned here and reported again at start.
    pub fn register_processor(
        &mut self,
        target: Target,
        processor: Box<dyn Processor>,
    ) -> BridgeResult<()> {
        let registry = match &mut self.state {
            WorkerState::Idle { registry, .. } => registry,
            WorkerState::Running { .. } | WorkerState::Stopped => {
                let err = BridgeError::AlreadyStarted;
                self.reporter
                    .error(&format!("Cannot register processor for {}", target), &err);
                return Err(err);
            }
        };

        registry.register(target.clone(), processor).map_err(|err| {
            self.registration_errors
                .push(BridgeError::DuplicateProcessor { target });
            err
        })
    }

    /// Targets with a registered processor, before start
    pub fn registered_targets(&self) -> Vec<Target> {
        match &self.state {
            WorkerState::Idle { registry, .. } => registry.targets(),
            _ => Vec::new(),
        }
    }

    /// Spawn the dispatch thread
    ///
    /// Idempotent: starting a running or stopped worker does nothing.
    pub fn start(&mut self) -> BridgeResult<()> {
        let (receiver, registry) = match std::mem::replace(&mut self.state, WorkerState::Stopped) {
            WorkerState::Idle { receiver, registry } => (receiver, registry),
            other => {
                self.state = other;
                return Ok(());
            }
        };

        for err in self.registration_errors.drain(..) {
            self.reporter.error("Processor registration rejected", &err);
        }

        let (done_sender, done) = std_mpsc::channel();
        let dispatcher = Dispatcher {
            registry,
            shared: self.handle.shared.clone(),
            reporter: self.reporter.clone(),
            unknown_targets: HashSet::new(),
        };

        let spawned = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                dispatcher.run(receiver);
                let _ = done_sender.send(());
            });

        match spawned {
            Ok(thread) => {
                self.state = WorkerState::Running { thread, done };
                self.handle
                    .shared
                    .logger
                    .log_worker_event(Level::INFO, "Worker started");
                Ok(())
            }
            Err(io_err) => {
                self.handle.shared.accepting.store(false, Ordering::Release);
                let err = BridgeError::WorkerSpawn {
                    reason: io_err.to_string(),
                };
                self.reporter.error("Worker failed to start", &err);
                Err(err)
            }
        }
    }

    /// Stop accepting messages, drain the queue and halt the thread
    ///
    /// Blocks until every message queued before the call has been dispatched
    /// or the shutdown timeout elapses. On timeout the thread is detached and
    /// `ShutdownTimeout` is returned. Idempotent.
    pub fn stop(&mut self) -> BridgeResult<()> {
        // Later enqueues are refused before the sentinel goes in
        self.handle.shared.accepting.store(false, Ordering::Release);

        match std::mem::replace(&mut self.state, WorkerState::Stopped) {
            WorkerState::Stopped => Ok(()),
            WorkerState::Idle { mut receiver, .. } => {
                let mut discarded = 0usize;
                while let Ok(envelope) = receiver.try_recv() {
                    if let Envelope::Message(message) = envelope {
                        self.handle.shared.stats.record_dequeued();
                        self.handle.shared.stats.record_dropped();
                        self.handle
                            .shared
                            .logger
                            .log_drop(&message, "worker stopped before start");
                        discarded += 1;
                    }
                }
                if discarded > 0 {
                    self.reporter.debug(&format!(
                        "Worker stopped before start; discarded {} buffered message(s)",
                        discarded
                    ));
                }
                Ok(())
            }
            WorkerState::Running { thread, done } => {
                if self.handle.sender.send(Envelope::Drain).is_err() {
                    debug!("Worker thread already exited before drain");
                }

                let timeout = self.config.shutdown_timeout();
                match done.recv_timeout(timeout) {
                    Ok(()) | Err(std_mpsc::RecvTimeoutError::Disconnected) => {
                        if thread.join().is_err() {
                            warn!("Worker thread terminated abnormally");
                        }
                        info!("Worker stopped");
                        Ok(())
                    }
                    Err(std_mpsc::RecvTimeoutError::Timeout) => {
                        let err = BridgeError::ShutdownTimeout {
                            timeout_ms: self.config.shutdown_timeout_ms,
                        };
                        self.reporter.warning(&format!(
                            "{}; detaching worker with {} message(s) pending",
                            err,
                            self.handle.shared.stats.depth()
                        ));
                        Err(err)
                    }
                }
            }
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, WorkerState::Running { .. })
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.state, WorkerState::Stopped)
    }

    pub fn stats(&self) -> WorkerStatsSnapshot {
        self.handle.stats()
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            WorkerState::Idle { .. } => "idle",
            WorkerState::Running { .. } => "running",
            WorkerState::Stopped => "stopped",
        };
        f.debug_struct("Worker")
            .field("state", &state)
            .field("stats", &self.stats())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Dispatch Loop
// ----------------------------------------------------------------------------

/// Everything the worker thread owns
struct Dispatcher {
    registry: ProcessorRegistry,
    shared: Arc<Shared>,
    reporter: InternalReporter,
    /// Targets already reported as missing a processor
    unknown_targets: HashSet<Target>,
}

impl Dispatcher {
    fn run(mut self, mut receiver: UnboundedReceiver<Envelope>) {
        while let Some(envelope) = receiver.blocking_recv() {
            match envelope {
                Envelope::Message(message) => {
                    let depth = self.shared.stats.record_dequeued();
                    self.dispatch(message, depth);
                }
                Envelope::Drain => break,
            }
        }

        // Producers that passed the acceptance check while stop() was running
        receiver.close();
        while let Ok(envelope) = receiver.try_recv() {
            if let Envelope::Message(message) = envelope {
                self.shared.stats.record_dequeued();
                self.shared.stats.record_dropped();
                self.shared.logger.log_drop(&message, "enqueued after stop");
            }
        }

        self.shared
            .logger
            .log_worker_event(Level::DEBUG, "Dispatch loop finished");
    }

    fn dispatch(&mut self, message: Message, depth: usize) {
        let target = message.target();

        let Some(processor) = self.registry.get_mut(&target) else {
            self.shared.stats.record_dropped();
            self.shared
                .logger
                .log_drop(&message, "no processor registered");
            if self.unknown_targets.insert(target.clone()) {
                self.reporter
                    .error("Message dropped", &BridgeError::UnknownTarget { target });
            }
            return;
        };

        self.shared.logger.log_dispatch(&message, depth);
        let variant = message.variant_name();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| processor.process(message)));
        self.shared.stats.record_dispatched();

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                self.shared.stats.record_failed();
                self.reporter
                    .error(&format!("Processor {} failed on {}", target, variant), &err);
            }
            Err(payload) => {
                self.shared.stats.record_failed();
                let err = BridgeError::ProcessorPanicked {
                    target,
                    reason: panic_reason(payload.as_ref()),
                };
                self.reporter.error(&format!("While handling {}", variant), &err);
            }
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(reason) = payload.downcast_ref::<&str>() {
        (*reason).to_string()
    } else if let Some(reason) = payload.downcast_ref::<String>() {
        reason.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
