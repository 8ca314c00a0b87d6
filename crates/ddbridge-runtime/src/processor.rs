//! Processor Contract and Registry
//!
//! A processor owns the state of one feature domain and consumes the messages
//! routed to its [`Target`]. Processors only ever run on the worker thread.

use ddbridge_core::{BridgeError, BridgeResult, Message, Target};
use std::collections::HashMap;

/// Consumer of every message routed to one target
pub trait Processor: Send {
    /// Handle one message
    ///
    /// Errors and panics are caught by the worker, reported through internal
    /// telemetry, and never stop the dispatch loop.
    fn process(&mut self, message: Message) -> BridgeResult<()>;
}

impl<F> Processor for F
where
    F: FnMut(Message) -> BridgeResult<()> + Send,
{
    fn process(&mut self, message: Message) -> BridgeResult<()> {
        self(message)
    }
}

/// Error for a message that reached a processor of another domain
pub(crate) fn unexpected_message(target: Target, message: &Message) -> BridgeError {
    BridgeError::Processor {
        target,
        reason: format!(
            "unexpected {} message {}",
            message.target(),
            message.variant_name()
        ),
    }
}

// ----------------------------------------------------------------------------
// Registry
// ----------------------------------------------------------------------------

/// Target → processor table; at most one processor per target
#[derive(Default)]
pub struct ProcessorRegistry {
    processors: HashMap<Target, Box<dyn Processor>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a processor; the first registration for a target wins
    pub fn register(&mut self, target: Target, processor: Box<dyn Processor>) -> BridgeResult<()> {
        if self.processors.contains_key(&target) {
            return Err(BridgeError::DuplicateProcessor { target });
        }

        self.processors.insert(target, processor);
        Ok(())
    }

    pub fn get_mut(&mut self, target: &Target) -> Option<&mut (dyn Processor + 'static)> {
        self.processors.get_mut(target).map(|processor| processor.as_mut())
    }

    pub fn contains(&self, target: &Target) -> bool {
        self.processors.contains_key(target)
    }

    pub fn targets(&self) -> Vec<Target> {
        let mut targets: Vec<_> = self.processors.keys().cloned().collect();
        targets.sort();
        targets
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("targets", &self.targets())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddbridge_core::RumMessage;

    fn accept_all() -> Box<dyn Processor> {
        Box::new(|_message: Message| -> BridgeResult<()> { Ok(()) })
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ProcessorRegistry::new();
        registry.register(Target::rum(), accept_all()).unwrap();

        let err = registry.register(Target::rum(), accept_all()).unwrap_err();
        assert!(matches!(err, BridgeError::DuplicateProcessor { target } if target == Target::RUM));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_by_target() {
        let mut registry = ProcessorRegistry::new();
        registry.register(Target::logs(), accept_all()).unwrap();
        registry.register(Target::sdk(), accept_all()).unwrap();

        assert!(registry.contains(&Target::LOGS));
        assert!(registry.get_mut(&Target::RUM).is_none());
        assert_eq!(registry.targets(), vec![Target::LOGS, Target::SDK]);

        let processor = registry.get_mut(&Target::SDK).unwrap();
        assert!(processor.process(RumMessage::StopSession.into()).is_ok());
    }
}
