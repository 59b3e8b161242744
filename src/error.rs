//! Logger construction errors

use thiserror::Error;

/// A resolved configuration could not be turned into a working logger
#[derive(Debug, Error)]
pub enum BuildError {
    /// Output target is not `stderr`, `stdout`, a `file://` URL or a path
    #[error("invalid sink {0:?}")]
    InvalidSink(String),
    /// Output file could not be opened for appending
    #[error("failed to open sink {path:?}: {source}")]
    OpenSink {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Sampling would drop every entry
    #[error("invalid sampling policy: initial={initial}, thereafter={thereafter}")]
    InvalidSampling { initial: u32, thereafter: u32 },
    /// No output target configured
    #[error("no output targets configured")]
    EmptyOutputs,
    /// Configuration text is not valid TOML for a logging configuration
    #[error("invalid logging configuration: {0}")]
    Config(#[from] toml::de::Error),
    /// Configuration file could not be read
    #[error("failed to read logging configuration: {0}")]
    Io(#[from] std::io::Error),
}
