//! Errors raised inside the engine and the guard that contains them.
//!
//! The public entry points never return these: [`contain`] turns every
//! failure, panics included, into a `LintError` that the caller folds into
//! its result as a single diagnostic string.

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use thiserror::Error;

/// Possible failures while preparing or running an analysis.
#[derive(Debug, Error)]
pub enum LintError {
    /// The grammar text exceeds the configured character limit.
    #[error("grammar text is {len} characters long, exceeding the limit of {max}")]
    InputTooLarge {
        /// Length of the rejected input in characters.
        len: usize,
        /// The configured limit.
        max: usize,
    },

    /// A validation level name was not recognised.
    #[error("unknown validation level '{0}' (expected strict, moderate or lenient)")]
    UnknownLevel(String),

    /// An analysis depth name was not recognised.
    #[error("unknown analysis depth '{0}' (expected basic, detailed or comprehensive)")]
    UnknownDepth(String),

    /// A configuration document could not be read as a [`Config`](crate::config::Config).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Reading grammar or configuration input failed.
    #[error("failed to read {path}")]
    Io {
        /// The path being read.
        path: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// An unexpected failure while processing the grammar.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LintError {
    /// Wraps an I/O failure with the path that produced it.
    #[must_use]
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LintError::Io {
            path: path.into().display().to_string(),
            source,
        }
    }
}

/// Runs `op`, converting a panic into [`LintError::Internal`].
///
/// # Errors
///
/// Returns the error produced by `op`, or `Internal` if it panicked.
pub fn contain<T>(op: impl FnOnce() -> Result<T, LintError>) -> Result<T, LintError> {
    panic::catch_unwind(AssertUnwindSafe(op)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown failure".to_string());
        tracing::error!(%message, "grammar processing panicked");
        Err(LintError::Internal(message))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contain_passes_results_through() {
        assert_eq!(contain(|| Ok::<_, LintError>(7)).unwrap(), 7);
        let err = contain(|| Err::<(), _>(LintError::UnknownLevel("loose".into()))).unwrap_err();
        assert!(matches!(err, LintError::UnknownLevel(_)));
    }

    #[test]
    fn test_contain_catches_panics() {
        let err = contain(|| -> Result<(), LintError> { panic!("scanner blew up") }).unwrap_err();
        assert_eq!(err.to_string(), "internal error: scanner blew up");
    }

    #[test]
    fn test_messages() {
        let err = LintError::InputTooLarge { len: 12, max: 10 };
        assert_eq!(
            err.to_string(),
            "grammar text is 12 characters long, exceeding the limit of 10"
        );
    }
}
