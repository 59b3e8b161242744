//! CLI interface for sazabi
//!
//! Provides subcommands for:
//! - `log`: Write one entry through a resolved configuration
//! - `config`: Show the resolved configuration as TOML

mod log;

pub use log::LogArgs;

use crate::config::LoggingConfig;
use crate::level::Level;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sazabi")]
#[command(about = "Write structured log entries using environment-resolved logging presets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Environment label; "production" or "prod" select the production preset
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// TOML logging configuration, used instead of the environment preset
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the minimum level
    #[arg(short, long)]
    pub level: Option<Level>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write one entry
    Log(LogArgs),
    /// Show the resolved configuration
    Config,
}

impl Cli {
    /// Configuration selected by the global flags
    pub fn resolve_config(&self) -> anyhow::Result<LoggingConfig> {
        let mut config = match &self.config {
            Some(path) => LoggingConfig::load(path)?,
            None => LoggingConfig::resolve(&self.env),
        };
        if let Some(level) = self.level {
            config.level = level;
        }
        Ok(config)
    }
}
