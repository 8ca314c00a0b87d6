//! RUM processor: view, action, resource and session state
//!
//! The native RUM monitor is obtained lazily on the first RUM message so the
//! platform has already processed `Initialize`. If that fails, the failure is
//! reported once and every later RUM message is ignored.

use crate::processor::{unexpected_message, Processor};
use ddbridge_core::{
    Attributes, BridgeResult, Message, Platform, PlatformRum, RumActionType, RumHttpMethod,
    RumMessage, SdkConfig, Target,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

enum Monitor {
    Pending,
    Active(Box<dyn PlatformRum>),
    Disabled,
}

/// The view currently displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveView {
    pub key: String,
    pub name: String,
}

/// A resource started but not yet stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingResource {
    pub method: RumHttpMethod,
    pub url: String,
}

/// Session-scoped state mirrored from the calls sent to the native monitor
#[derive(Debug, Default)]
pub struct RumSession {
    view: Option<ActiveView>,
    actions: HashMap<String, RumActionType>,
    resources: HashMap<String, PendingResource>,
    attributes: Attributes,
    feature_flags: Attributes,
}

impl RumSession {
    pub fn active_view(&self) -> Option<&ActiveView> {
        self.view.as_ref()
    }

    pub fn active_action(&self, name: &str) -> Option<RumActionType> {
        self.actions.get(name).copied()
    }

    pub fn pending_resource(&self, key: &str) -> Option<&PendingResource> {
        self.resources.get(key)
    }

    pub fn pending_resources(&self) -> usize {
        self.resources.len()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn feature_flags(&self) -> &Attributes {
        &self.feature_flags
    }

    /// Forget everything tied to the current session; global attributes survive
    fn reset(&mut self) {
        self.view = None;
        self.actions.clear();
        self.resources.clear();
        self.feature_flags.clear();
    }
}

/// Owns the native RUM monitor and the session state machine
pub struct RumProcessor {
    platform: Arc<dyn Platform>,
    config: Arc<SdkConfig>,
    monitor: Monitor,
    session: RumSession,
}

impl RumProcessor {
    pub fn new(platform: Arc<dyn Platform>, config: Arc<SdkConfig>) -> Self {
        Self {
            platform,
            config,
            monitor: Monitor::Pending,
            session: RumSession::default(),
        }
    }

    pub fn session(&self) -> &RumSession {
        &self.session
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.monitor, Monitor::Disabled)
    }

    /// Obtain the native monitor; a failure disables RUM for this instance
    fn activate(&mut self) -> BridgeResult<()> {
        match self.platform.init_rum(&self.config) {
            Ok(monitor) => {
                self.monitor = Monitor::Active(monitor);
                Ok(())
            }
            Err(err) => {
                self.monitor = Monitor::Disabled;
                Err(err.into())
            }
        }
    }

    fn handle(&mut self, message: RumMessage) -> BridgeResult<()> {
        if let Monitor::Pending = self.monitor {
            self.activate()?;
        }

        let Monitor::Active(monitor) = &mut self.monitor else {
            debug!("RUM disabled; ignoring {}", message.variant_name());
            return Ok(());
        };
        let session = &mut self.session;

        match message {
            RumMessage::StartView {
                key,
                name,
                attributes,
            } => {
                let name = name.unwrap_or_else(|| key.clone());
                monitor.start_view(&key, &name, &attributes)?;
                session.view = Some(ActiveView { key, name });
            }
            RumMessage::StopView { key, attributes } => {
                monitor.stop_view(&key, &attributes)?;
                if session.view.as_ref().is_some_and(|view| view.key == key) {
                    session.view = None;
                }
            }
            RumMessage::AddAction {
                action_type,
                name,
                attributes,
            } => {
                monitor.add_action(action_type, &name, &attributes)?;
            }
            RumMessage::StartAction {
                action_type,
                name,
                attributes,
            } => {
                monitor.start_action(action_type, &name, &attributes)?;
                session.actions.insert(name, action_type);
            }
            RumMessage::StopAction {
                action_type,
                name,
                attributes,
            } => {
                monitor.stop_action(action_type, &name, &attributes)?;
                session.actions.remove(&name);
            }
            RumMessage::AddError {
                message,
                source,
                error_type,
                stack,
                attributes,
            } => {
                monitor.add_error(
                    &message,
                    source,
                    error_type.as_deref(),
                    stack.as_deref(),
                    &attributes,
                )?;
            }
            RumMessage::StartResource {
                key,
                method,
                url,
                attributes,
            } => {
                monitor.start_resource(&key, method, &url, &attributes)?;
                session.resources.insert(key, PendingResource { method, url });
            }
            RumMessage::StopResource {
                key,
                resource_type,
                status_code,
                size,
                attributes,
            } => {
                monitor.stop_resource(&key, resource_type, status_code, size, &attributes)?;
                session.resources.remove(&key);
            }
            RumMessage::StopResourceWithError {
                key,
                error_type,
                message,
                attributes,
            } => {
                monitor.stop_resource_with_error(
                    &key,
                    error_type.as_deref(),
                    &message,
                    &attributes,
                )?;
                session.resources.remove(&key);
            }
            RumMessage::AddAttribute { key, value } => {
                monitor.add_attribute(&key, &value)?;
                session.attributes.insert(key, value);
            }
            RumMessage::RemoveAttribute { key } => {
                monitor.remove_attribute(&key)?;
                session.attributes.remove(&key);
            }
            RumMessage::AddFeatureFlag { name, value } => {
                monitor.add_feature_flag_evaluation(&name, &value)?;
                session.feature_flags.insert(name, value);
            }
            RumMessage::StopSession => {
                monitor.stop_session()?;
                session.reset();
            }
        }
        Ok(())
    }
}

impl Processor for RumProcessor {
    fn process(&mut self, message: Message) -> BridgeResult<()> {
        match message {
            Message::Rum(message) => self.handle(message),
            other => Err(unexpected_message(Target::RUM, &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddbridge_core::{NoOpPlatform, RumResourceType};
    use serde_json::json;

    fn create_test_processor() -> RumProcessor {
        RumProcessor::new(Arc::new(NoOpPlatform), Arc::new(SdkConfig::testing()))
    }

    fn send(processor: &mut RumProcessor, message: RumMessage) {
        processor.process(message.into()).unwrap();
    }

    #[test]
    fn test_view_lifecycle() {
        let mut processor = create_test_processor();
        send(
            &mut processor,
            RumMessage::StartView {
                key: "home".into(),
                name: None,
                attributes: Attributes::new(),
            },
        );
        let view = processor.session().active_view().cloned().unwrap();
        assert_eq!(view.name, "home");

        // Stopping another key leaves the active view alone
        send(
            &mut processor,
            RumMessage::StopView {
                key: "settings".into(),
                attributes: Attributes::new(),
            },
        );
        assert!(processor.session().active_view().is_some());

        send(
            &mut processor,
            RumMessage::StopView {
                key: "home".into(),
                attributes: Attributes::new(),
            },
        );
        assert!(processor.session().active_view().is_none());
    }

    #[test]
    fn test_resource_tracking() {
        let mut processor = create_test_processor();
        send(
            &mut processor,
            RumMessage::StartResource {
                key: "r1".into(),
                method: RumHttpMethod::Get,
                url: "https://example.org/a".into(),
                attributes: Attributes::new(),
            },
        );
        assert_eq!(
            processor.session().pending_resource("r1").map(|r| r.method),
            Some(RumHttpMethod::Get)
        );

        send(
            &mut processor,
            RumMessage::StopResource {
                key: "r1".into(),
                resource_type: RumResourceType::Xhr,
                status_code: Some(200),
                size: None,
                attributes: Attributes::new(),
            },
        );
        assert_eq!(processor.session().pending_resources(), 0);
    }

    #[test]
    fn test_stop_session_keeps_global_attributes() {
        let mut processor = create_test_processor();
        send(
            &mut processor,
            RumMessage::AddAttribute {
                key: "tenant".into(),
                value: json!("acme"),
            },
        );
        send(
            &mut processor,
            RumMessage::AddFeatureFlag {
                name: "dark-mode".into(),
                value: json!(true),
            },
        );
        send(
            &mut processor,
            RumMessage::StartAction {
                action_type: RumActionType::Scroll,
                name: "feed".into(),
                attributes: Attributes::new(),
            },
        );
        send(&mut processor, RumMessage::StopSession);

        let session = processor.session();
        assert_eq!(session.attributes().get("tenant"), Some(&json!("acme")));
        assert!(session.feature_flags().is_empty());
        assert!(session.active_action("feed").is_none());
    }
}
