//! Logging configuration and the environment resolver
//!
//! A [`LoggingConfig`] fully describes a logger: level threshold, sampling,
//! encoding, encoder keys and output targets. [`LoggingConfig::resolve`] maps an
//! environment label onto one of the two presets.

mod encoder;

pub use encoder::{CallerEncoder, EncoderConfig, LevelEncoder, TimeEncoder};

use crate::error::BuildError;
use crate::level::Level;
use crate::logger::Logger;
use crate::sink::Sink;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment label selecting the production preset
pub const PRODUCTION_ENV: &str = "production";
/// Short environment label selecting the production preset
pub const PRODUCTION_ENV_SHORT: &str = "prod";

/// Output serialization style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Tab-separated, human-readable lines
    #[default]
    Console,
    /// One JSON object per line
    Json,
}

/// Burst + rate sampling, evaluated per level and message over one-second ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Entries with the same level and message let through each tick
    pub initial: u32,
    /// After the burst, every `thereafter`-th entry is let through (0 drops the rest)
    pub thereafter: u32,
}

/// Complete logger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Lowest severity emitted
    pub level: Level,
    /// Development mode: lower stack trace threshold and development defaults
    #[serde(default)]
    pub development: bool,
    /// Omit the caller annotation
    #[serde(default)]
    pub disable_caller: bool,
    /// Never attach stack traces
    #[serde(default)]
    pub disable_stacktrace: bool,
    /// Output serialization style
    #[serde(default)]
    pub encoding: Encoding,
    /// Sinks receiving log lines, in order
    #[serde(default = "default_outputs")]
    pub output_paths: Vec<String>,
    /// Sinks receiving the logger's own write failures
    #[serde(default = "default_outputs")]
    pub error_output_paths: Vec<String>,
    /// Sampling policy; absent means every entry is written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling: Option<SamplingConfig>,
    /// Element keys and formatting rules
    #[serde(default = "EncoderConfig::production")]
    pub encoder: EncoderConfig,
    /// Fields attached to every entry
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub initial_fields: serde_json::Map<String, serde_json::Value>,
}

fn default_outputs() -> Vec<String> {
    vec!["stderr".to_string()]
}

impl LoggingConfig {
    /// Resolve an environment label to a configuration.
    ///
    /// `"production"` and `"prod"` select [`LoggingConfig::production`]; every
    /// other label, including the empty string, selects
    /// [`LoggingConfig::development`]. Matching is exact.
    pub fn resolve(environment: &str) -> Self {
        match environment {
            PRODUCTION_ENV | PRODUCTION_ENV_SHORT => Self::production(),
            _ => Self::development(),
        }
    }

    /// Info level, sampled 100/100, console encoding with production keys, stderr
    pub fn production() -> Self {
        Self {
            level: Level::Info,
            development: false,
            disable_caller: false,
            disable_stacktrace: true,
            encoding: Encoding::Console,
            output_paths: default_outputs(),
            error_output_paths: default_outputs(),
            sampling: Some(SamplingConfig {
                initial: 100,
                thereafter: 100,
            }),
            encoder: EncoderConfig::production(),
            initial_fields: serde_json::Map::new(),
        }
    }

    /// Debug level, unsampled, console encoding with development keys, stderr
    pub fn development() -> Self {
        Self {
            level: Level::Debug,
            development: true,
            disable_caller: false,
            disable_stacktrace: true,
            encoding: Encoding::Console,
            output_paths: default_outputs(),
            error_output_paths: default_outputs(),
            sampling: None,
            encoder: EncoderConfig::development(),
            initial_fields: serde_json::Map::new(),
        }
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, BuildError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BuildError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Whether entries may carry stack traces
    pub fn stacktrace_enabled(&self) -> bool {
        !self.disable_stacktrace
    }

    /// Lowest level that gets a stack trace when traces are enabled
    pub(crate) fn stacktrace_level(&self) -> Option<Level> {
        if self.disable_stacktrace {
            None
        } else if self.development {
            Some(Level::Warn)
        } else {
            Some(Level::Error)
        }
    }

    /// Reject configurations that cannot produce a working logger
    pub fn validate(&self) -> Result<(), BuildError> {
        if let Some(sampling) = self.sampling {
            if sampling.initial == 0 && sampling.thereafter == 0 {
                return Err(BuildError::InvalidSampling {
                    initial: sampling.initial,
                    thereafter: sampling.thereafter,
                });
            }
        }
        if self.output_paths.is_empty() {
            return Err(BuildError::EmptyOutputs);
        }
        Ok(())
    }

    /// Open the configured sinks and build a logger
    pub fn build(&self) -> Result<Logger, BuildError> {
        self.validate()?;
        let outputs = open_all(&self.output_paths)?;
        let errors = open_all(&self.error_output_paths)?;
        Logger::from_parts(self, outputs, errors)
    }

    /// Build a logger writing to caller-supplied sinks instead of the configured paths
    pub fn build_with_sinks(
        &self,
        outputs: Vec<Sink>,
        errors: Vec<Sink>,
    ) -> Result<Logger, BuildError> {
        self.validate()?;
        if outputs.is_empty() {
            return Err(BuildError::EmptyOutputs);
        }
        Logger::from_parts(self, outputs, errors)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::development()
    }
}

fn open_all(targets: &[String]) -> Result<Vec<Sink>, BuildError> {
    targets.iter().map(|target| Sink::open(target)).collect()
}
