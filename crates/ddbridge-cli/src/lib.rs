//! ddbridge CLI library
//!
//! Configuration loading, a console-backed platform and the scripted demo
//! session driven by the `ddbridge` binary.

pub mod cli;
pub mod config;
pub mod console_platform;
pub mod demo;
pub mod error;

pub use cli::{Cli, Commands};
pub use config::{CliAppConfig, CliConfig, ConfigError};
pub use console_platform::ConsolePlatform;
pub use error::{CliError, Result};
