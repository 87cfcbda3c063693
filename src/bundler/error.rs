//! Error types for the relocation pipeline.
//!
//! Fatal conditions abort the whole post-build pass; no partial bundle is
//! considered valid. Unresolved bare library names are the only soft
//! condition and are collected into [`crate::bundler::ResolvedSet`] instead
//! of an error unless the strict policy is selected.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline error type
#[derive(Error, Debug)]
pub enum Error {
    /// A referenced local path does not exist on disk. Always fatal: the
    /// build produced a binary pointing at a library that is not installed.
    #[error("broken dependency: {reference} (referenced by {referrer}) not found")]
    BrokenDependency {
        /// The reference as embedded in the binary
        reference: String,
        /// The binary that carries the reference
        referrer: PathBuf,
    },

    /// Bare library names that no search path directory could satisfy.
    /// Raised only under the strict resolution policy.
    #[error("unresolved libraries: {}", .0.join(", "))]
    UnresolvedLibraries(Vec<String>),

    /// An external inspection/rewrite tool exited nonzero on a call site
    /// that did not opt into the soft failure policy.
    #[error("{tool} exited with status {code:?}")]
    ToolFailure {
        /// Tool name
        tool: String,
        /// Exit code, if the process exited normally
        code: Option<i32>,
    },

    /// The build was interrupted while an external tool was running.
    #[error("interrupted while waiting for {0}")]
    Interrupted(String),

    /// No dependency backend exists for the requested platform.
    #[error("no dependency backend for platform {0}")]
    PlatformUnsupported(String),

    /// A binary could not be parsed as the expected object format.
    #[error("failed to parse {path}: {reason}")]
    BinaryParse {
        /// Path to the offending file
        path: PathBuf,
        /// Parser diagnostic
        reason: String,
    },

    /// IO failure with filesystem context
    #[error("{context}: {path}: {source}")]
    Fs {
        /// What was being attempted
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Bare IO failure
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Catch-all for one-off failures
    #[error("{0}")]
    GenericError(String),
}

/// Attaches a message and path to IO errors.
pub trait ErrorExt<T> {
    /// Wrap an IO failure with filesystem context
    fn fs_context(self, context: &str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &str, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Minimal context adapter for `Option` values.
pub trait Context<T> {
    /// Convert `None` into a [`Error::GenericError`] with the given message
    fn context(self, message: &str) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context(self, message: &str) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(message.to_string()))
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)).into())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guarded(ok: bool) -> Result<()> {
        if !ok {
            crate::bail!("guard tripped: {}", 7);
        }
        Ok(())
    }

    #[test]
    fn bail_returns_a_generic_error() {
        assert!(guarded(true).is_ok());
        let err = guarded(false).unwrap_err();
        assert!(matches!(err, Error::GenericError(msg) if msg == "guard tripped: 7"));
    }
}
