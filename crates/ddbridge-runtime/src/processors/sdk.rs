//! SDK processor: platform setup and the current user

use crate::processor::{unexpected_message, Processor};
use ddbridge_core::{
    BridgeResult, Message, Platform, SdkMessage, Target, TrackingConsent, UserInfo,
};
use std::sync::Arc;
use tracing::debug;

/// Owns the current user information
pub struct SdkProcessor {
    platform: Arc<dyn Platform>,
    user: UserInfo,
    consent: Option<TrackingConsent>,
    initialized: bool,
}

impl SdkProcessor {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self {
            platform,
            user: UserInfo::default(),
            consent: None,
            initialized: false,
        }
    }

    pub fn user_info(&self) -> &UserInfo {
        &self.user
    }

    pub fn tracking_consent(&self) -> Option<TrackingConsent> {
        self.consent
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn handle(&mut self, message: SdkMessage) -> BridgeResult<()> {
        match message {
            SdkMessage::Initialize { config } => {
                self.platform.initialize(&config)?;
                self.initialized = true;
                self.consent = Some(config.tracking_consent);
                debug!(env = %config.env, site = %config.site, "Platform initialized");
            }
            SdkMessage::SetTrackingConsent { consent } => {
                self.platform.set_tracking_consent(consent)?;
                self.consent = Some(consent);
            }
            SdkMessage::SetVerbosity { level } => {
                self.platform.set_verbosity(level)?;
            }
            SdkMessage::SetUserInfo {
                id,
                name,
                email,
                extra_info,
            } => {
                self.user = UserInfo {
                    id,
                    name,
                    email,
                    extra_info,
                };
                self.platform.set_user_info(&self.user)?;
            }
            SdkMessage::AddUserExtraInfo { extra_info } => {
                self.user.merge_extra_info(&extra_info);
                self.platform.add_user_extra_info(&extra_info)?;
            }
            SdkMessage::ClearAllData => {
                self.platform.clear_all_data()?;
            }
        }
        Ok(())
    }
}

impl Processor for SdkProcessor {
    fn process(&mut self, message: Message) -> BridgeResult<()> {
        match message {
            Message::Sdk(message) => self.handle(message),
            other => Err(unexpected_message(Target::SDK, &other)),
        }
    }
}
