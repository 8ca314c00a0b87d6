//! Scripted session replayed by `ddbridge demo`
//!
//! Walks through the calls a game makes during its first frames: consent,
//! verbosity, a view, user info, a logger with nested attributes and a
//! resource, then shuts the SDK down and returns the worker statistics.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use ddbridge_core::{
    Attributes, CoreLoggerLevel, LogLevel, LoggingOptions, Platform, RumActionType,
    RumResourceType, TrackingConsent,
};
use ddbridge_runtime::{Sdk, SdkBuilder, WorkerStatsSnapshot};

use crate::config::CliAppConfig;
use crate::error::{CliError, Result};

fn attributes(value: serde_json::Value) -> Attributes {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Attributes::new(),
    }
}

/// Build and start an SDK for the demo session
pub fn build_sdk(
    platform: Arc<dyn Platform>,
    config: &CliAppConfig,
    dispatch_logging: bool,
) -> Result<Sdk> {
    let sdk = SdkBuilder::new(platform)
        .with_config(config.sdk.clone())
        .with_dispatch_logging(dispatch_logging || config.sdk.worker.dispatch_logging)
        .build();

    if sdk.is_noop() {
        return Err(CliError::Demo("SDK is disabled by configuration".to_string()));
    }
    Ok(sdk)
}

/// Replay the scripted calls, then shut the SDK down
pub fn play_session(sdk: &Sdk, views: usize) -> WorkerStatsSnapshot {
    sdk.set_tracking_consent(TrackingConsent::Granted);
    sdk.set_verbosity(CoreLoggerLevel::Debug);
    sdk.set_user_info(Some("1234"), Some("John Fakename"), None, None);

    let rum = sdk.rum();
    let logger = sdk.create_logger(LoggingOptions {
        network_info_enabled: true,
        remote_log_threshold: LogLevel::Debug,
        ..LoggingOptions::default().with_name("demo")
    });

    for index in 0..views {
        let view_key = format!("view-{}", index);
        rum.start_view(
            &view_key,
            Some("Test View"),
            Some(attributes(json!({ "view_attribute": "active" }))),
        );
        info!(target: "game", view = %view_key, "Scene loaded");

        logger.info("Hello from the bridge!", None);
        logger.debug(
            "Hello with attributes",
            Some(attributes(json!({
                "my_attribute": 122,
                "second_attribute": "with_value",
                "bool_attribute": true,
                "nested_attribute": { "internal_attribute": 1.234 },
            }))),
        );

        let resource_key = format!("asset-{}", index);
        rum.start_resource(&resource_key, "GET", "https://example.org/asset.bundle", None);
        rum.add_action(RumActionType::Tap, "play", None);
        rum.stop_resource(&resource_key, RumResourceType::Native, 200, 4096, None);

        rum.stop_view(&view_key, None);
    }

    info!(views, "Demo session scripted, shutting down");
    sdk.shutdown();

    sdk.stats()
}

/// Run the scripted session against `platform`
pub fn run_demo(
    platform: Arc<dyn Platform>,
    config: &CliAppConfig,
    views: usize,
    dispatch_logging: bool,
) -> Result<WorkerStatsSnapshot> {
    let sdk = build_sdk(platform, config, dispatch_logging)?;
    Ok(play_session(&sdk, views))
}

/// Worker statistics as pretty JSON
pub fn render_stats(stats: &WorkerStatsSnapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(stats)?)
}
