//! Error types produced while resolving and executing a test run.

use camino::{Utf8Path, Utf8PathBuf};
use figment::Error as FigmentError;
use thiserror::Error;

/// Convenience alias for results carrying an [`EntryError`].
pub type EntryResult<T> = Result<T, EntryError>;

/// Errors that can occur while resolving configuration or preparing a run.
///
/// Scenario-level failures are not errors: the framework records them
/// per scenario and they surface through the aggregate
/// [`Outcome`](crate::Outcome) instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EntryError {
    /// Error parsing command-line arguments.
    #[error("Failed to parse command-line arguments: {0}")]
    CliParsing(#[from] Box<clap::Error>),

    /// Error while gathering configuration from file and environment providers.
    #[error("Failed to gather configuration: {0}")]
    Gathering(#[from] Box<FigmentError>),

    /// The configured feature path could not be read.
    #[error("Feature path '{path}' could not be resolved: {source}")]
    Features {
        /// Path that failed to resolve.
        path: Utf8PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// The configured feature path exists but is not a directory.
    #[error("Feature path '{path}' is not a directory")]
    NotADirectory {
        /// Offending path.
        path: Utf8PathBuf,
    },

    /// A reporter artifact target could not be created.
    #[error("Failed to create reporter target '{target}': {source}")]
    Reporter {
        /// Artifact path that failed to open.
        target: Utf8PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// Validation failures when building the runner configuration.
    #[error("Validation failed for '{key}': {message}")]
    Validation {
        /// Configuration key that failed validation.
        key: String,
        /// Human-readable explanation of the validation failure.
        message: String,
    },
}

impl EntryError {
    /// Wraps a CLI parse failure.
    pub(crate) fn cli_parsing(err: clap::Error) -> Self {
        Self::CliParsing(Box::new(err))
    }

    /// Wraps a provider gathering failure.
    pub(crate) fn gathering(err: FigmentError) -> Self {
        Self::Gathering(Box::new(err))
    }

    /// Builds a [`EntryError::Features`] for `path`.
    pub(crate) fn features(path: &Utf8Path, source: std::io::Error) -> Self {
        Self::Features {
            path: path.to_owned(),
            source,
        }
    }

    /// Builds a [`EntryError::Reporter`] for `target`.
    pub(crate) fn reporter(target: &Utf8Path, source: std::io::Error) -> Self {
        Self::Reporter {
            target: target.to_owned(),
            source,
        }
    }

    /// Builds a [`EntryError::Validation`] for `key`.
    pub(crate) fn validation(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            key: key.into(),
            message: message.into(),
        }
    }
}
