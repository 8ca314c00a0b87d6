//! RUM facade

use super::{attributes_or_empty, decode, require_key};
use crate::worker::WorkerHandle;
use ddbridge_core::{
    AttributeValue, Attributes, RumActionType, RumErrorSource, RumHttpMethod, RumMessage,
    RumResourceType,
};

/// Handle to the real-user-monitoring feature
///
/// Kinds may be passed as the typed enums or as their names (`"tap"`,
/// `"Post"`, ...). Calls with an unrecognized kind or an empty key are dropped.
#[derive(Debug, Clone, Default)]
pub enum RumClient {
    #[default]
    NoOp,
    Worker(WorkerHandle),
}

impl RumClient {
    pub(crate) fn new(handle: WorkerHandle) -> Self {
        RumClient::Worker(handle)
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, RumClient::NoOp)
    }

    /// Start tracking a view; `name` defaults to `key`
    pub fn start_view(&self, key: &str, name: Option<&str>, attributes: Option<Attributes>) {
        if !require_key(key, "view key") {
            return;
        }
        self.send(RumMessage::StartView {
            key: key.to_string(),
            name: name.map(str::to_string),
            attributes: attributes_or_empty(attributes),
        });
    }

    pub fn stop_view(&self, key: &str, attributes: Option<Attributes>) {
        if !require_key(key, "view key") {
            return;
        }
        self.send(RumMessage::StopView {
            key: key.to_string(),
            attributes: attributes_or_empty(attributes),
        });
    }

    /// Record an instantaneous action
    pub fn add_action<K>(&self, kind: K, name: &str, attributes: Option<Attributes>)
    where
        K: TryInto<RumActionType>,
    {
        let Some(action_type) = decode(kind, "action type") else {
            return;
        };
        self.send(RumMessage::AddAction {
            action_type,
            name: name.to_string(),
            attributes: attributes_or_empty(attributes),
        });
    }

    /// Start a continuous action such as a scroll
    pub fn start_action<K>(&self, kind: K, name: &str, attributes: Option<Attributes>)
    where
        K: TryInto<RumActionType>,
    {
        let Some(action_type) = decode(kind, "action type") else {
            return;
        };
        self.send(RumMessage::StartAction {
            action_type,
            name: name.to_string(),
            attributes: attributes_or_empty(attributes),
        });
    }

    pub fn stop_action<K>(&self, kind: K, name: &str, attributes: Option<Attributes>)
    where
        K: TryInto<RumActionType>,
    {
        let Some(action_type) = decode(kind, "action type") else {
            return;
        };
        self.send(RumMessage::StopAction {
            action_type,
            name: name.to_string(),
            attributes: attributes_or_empty(attributes),
        });
    }

    pub fn add_error<S>(
        &self,
        message: &str,
        source: S,
        error_type: Option<&str>,
        stack: Option<&str>,
        attributes: Option<Attributes>,
    ) where
        S: TryInto<RumErrorSource>,
    {
        let Some(source) = decode(source, "error source") else {
            return;
        };
        self.send(RumMessage::AddError {
            message: message.to_string(),
            source,
            error_type: error_type.map(str::to_string),
            stack: stack.map(str::to_string),
            attributes: attributes_or_empty(attributes),
        });
    }

    pub fn start_resource<M>(
        &self,
        key: &str,
        method: M,
        url: &str,
        attributes: Option<Attributes>,
    ) where
        M: TryInto<RumHttpMethod>,
    {
        if !require_key(key, "resource key") {
            return;
        }
        let Some(method) = decode(method, "http method") else {
            return;
        };
        self.send(RumMessage::StartResource {
            key: key.to_string(),
            method,
            url: url.to_string(),
            attributes: attributes_or_empty(attributes),
        });
    }

    /// Stop a resource; a negative status code or size means "unknown"
    pub fn stop_resource<R>(
        &self,
        key: &str,
        kind: R,
        status_code: i32,
        size: i64,
        attributes: Option<Attributes>,
    ) where
        R: TryInto<RumResourceType>,
    {
        if !require_key(key, "resource key") {
            return;
        }
        let Some(resource_type) = decode(kind, "resource type") else {
            return;
        };
        self.send(RumMessage::StopResource {
            key: key.to_string(),
            resource_type,
            status_code: u16::try_from(status_code).ok(),
            size: u64::try_from(size).ok(),
            attributes: attributes_or_empty(attributes),
        });
    }

    pub fn stop_resource_with_error(
        &self,
        key: &str,
        error_type: Option<&str>,
        message: &str,
        attributes: Option<Attributes>,
    ) {
        if !require_key(key, "resource key") {
            return;
        }
        self.send(RumMessage::StopResourceWithError {
            key: key.to_string(),
            error_type: error_type.map(str::to_string),
            message: message.to_string(),
            attributes: attributes_or_empty(attributes),
        });
    }

    /// Attach an attribute to every subsequent RUM event
    pub fn add_attribute(&self, key: &str, value: impl Into<AttributeValue>) {
        if !require_key(key, "attribute key") {
            return;
        }
        self.send(RumMessage::AddAttribute {
            key: key.to_string(),
            value: value.into(),
        });
    }

    pub fn remove_attribute(&self, key: &str) {
        if !require_key(key, "attribute key") {
            return;
        }
        self.send(RumMessage::RemoveAttribute {
            key: key.to_string(),
        });
    }

    pub fn add_feature_flag_evaluation(&self, name: &str, value: impl Into<AttributeValue>) {
        if !require_key(name, "feature flag") {
            return;
        }
        self.send(RumMessage::AddFeatureFlag {
            name: name.to_string(),
            value: value.into(),
        });
    }

    pub fn stop_session(&self) {
        self.send(RumMessage::StopSession);
    }

    fn send(&self, message: RumMessage) {
        if let RumClient::Worker(handle) = self {
            handle.enqueue(message);
        }
    }
}
