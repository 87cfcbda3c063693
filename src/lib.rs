//! Post-build shared-library bundler and load-path relocator.
//!
//! This library takes a compiled binary (or macOS .app bundle), discovers its
//! transitive shared-library dependencies, copies the non-system ones into a
//! relocatable bundle layout and rewrites embedded load-path metadata so the
//! bundle no longer depends on the build machine's filesystem.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;

// Re-export commonly used types
pub use error::{CliError, RelopackError, Result};
