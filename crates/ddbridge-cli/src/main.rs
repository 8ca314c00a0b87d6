//! ddbridge CLI - drives the SDK bridge against a console platform

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{filter::LevelFilter, prelude::*, reload, Registry};

use ddbridge_cli::{
    cli::{Cli, Commands},
    config::CliAppConfig,
    demo::{build_sdk, play_session, render_stats},
    ConsolePlatform,
};
use ddbridge_runtime::TracingForwarder;

type ForwardingHandle = reload::Handle<Option<TracingForwarder>, Registry>;

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration before logging so the file can turn verbosity on
    let mut config = load_configuration(&cli)?;
    if cli.verbose {
        config.cli.verbose = true;
    }

    let forwarding = setup_logging(config.cli.verbose);

    match cli.command {
        Commands::Demo { views } => {
            let platform = Arc::new(ConsolePlatform::new());
            let sdk = match build_sdk(platform.clone(), &config, cli.dispatch_logging) {
                Ok(sdk) => sdk,
                Err(e) => {
                    error!("Demo failed: {}", e);
                    std::process::exit(1);
                }
            };
            if let Err(e) = forwarding.reload(sdk.tracing_layer()) {
                warn!("Application events stay local: {}", e);
            }

            let stats = play_session(&sdk, views);

            info!(native_calls = platform.call_count(), "Demo finished");
            if config.cli.print_stats {
                println!("{}", render_stats(&stats)?);
            }
        }
        Commands::Config { example } => {
            let shown = if example {
                CliAppConfig::example()
            } else {
                config
            };
            let rendered = shown.to_toml().context("failed to render configuration")?;
            println!("{}", rendered);
        }
    }

    Ok(())
}

/// Setup logging based on verbosity level
///
/// The returned handle swaps in the SDK's forwarding layer once an SDK
/// exists, so events logged during startup still reach the console.
fn setup_logging(verbose: bool) -> ForwardingHandle {
    let log_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let (forwarder, handle) = reload::Layer::new(None::<TracingForwarder>);
    tracing_subscriber::registry()
        .with(forwarder)
        .with(log_level)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_names(true)
                .with_file(false)
                .with_line_number(false),
        )
        .init();

    handle
}

/// Load configuration from the given file or the layered defaults
fn load_configuration(cli: &Cli) -> ddbridge_cli::Result<CliAppConfig> {
    let config = match &cli.config {
        Some(path) => CliAppConfig::load_from_file(path)?,
        None => CliAppConfig::load()?,
    };
    Ok(config)
}
