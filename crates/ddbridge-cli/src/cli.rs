//! Command-line interface definitions and parsing

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log every enqueue and dispatch of the worker
    #[arg(long)]
    pub dispatch_logging: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a scripted session against the console platform
    Demo {
        /// Number of views to walk through
        #[arg(short, long, default_value_t = 1)]
        views: usize,
    },
    /// Print the effective configuration as TOML
    Config {
        /// Print an example configuration instead
        #[arg(long)]
        example: bool,
    },
}
