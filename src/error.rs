//! Error types for procflow

use std::time::Duration;

use thiserror::Error;

/// Result type alias for procflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Hard failures. Malformed notation is never one of these; it degrades to a
/// best-effort graph plus [`crate::diagnostics::Warning`]s.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was given
        path: String,
    },

    /// Failed to parse YAML configuration
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// The renderer program could not be started
    #[error("could not run renderer '{program}': {source}")]
    RendererUnavailable {
        /// Program that was spawned
        program: String,
        /// Spawn error
        #[source]
        source: std::io::Error,
    },

    /// The renderer ran but exited unsuccessfully
    #[error("renderer '{program}' failed ({status}): {stderr}")]
    RendererFailed {
        /// Program that was spawned
        program: String,
        /// Exit status as reported by the OS
        status: String,
        /// Renderer stderr, verbatim
        stderr: String,
    },

    /// The renderer did not finish in time and was killed
    #[error("renderer '{program}' timed out after {timeout:?}")]
    RendererTimeout {
        /// Program that was spawned
        program: String,
        /// Configured limit
        timeout: Duration,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
