//! Error handling for the carve application.
//! Defines the error type and result alias used throughout the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring or running a transformation.
///
/// Per-file failures are stored in the run report rather than propagated,
/// so most variants here reach the caller only through
/// [`crate::processor::Report::failures`].
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem operation failed on a specific path
    #[error("IO error on '{}': {source}.", .path.display())]
    FileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The target root does not exist or is not a directory
    #[error("Target directory '{root}' does not exist or is not a directory.")]
    InvalidRootError { root: String },

    /// A glob pattern could not be compiled
    #[error("Invalid glob pattern '{pattern}': {source}.")]
    GlobError {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// An entry below the root could not be read during discovery
    #[error("Failed to walk '{}': {source}.", .path.display())]
    WalkError {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The directive prefix cannot be used to build markers
    #[error("Invalid directive prefix '{prefix}'.")]
    InvalidPrefixError { prefix: String },

    /// Configuration file could not be parsed
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Interactive confirmation failed
    #[error("Prompt error: {0}.")]
    PromptError(String),
}

impl Error {
    /// Wraps an IO error with the path it happened on.
    pub fn file<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Error::FileError { path: path.into(), source }
    }
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
