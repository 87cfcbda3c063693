//! Platform probes that list a binary's dynamic-library references.
//!
//! Each backend shells out to (or parses with) the platform's native
//! inspection mechanism and normalizes loader-relative tokens against the
//! queried binary's directory. The probes report what the binary says it
//! needs; deciding what to do with each reference is the classifier's job.

pub mod linux;
pub mod macos;
pub mod windows;

use crate::bundler::error::Result;
use crate::bundler::settings::TargetPlatform;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

/// A single load-time reference extracted from a binary.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum RawDependency {
    /// Absolute path after loader-token normalization
    Path(PathBuf),
    /// Bare library name, resolved later through the search path
    Name(String),
}

/// Boxed future returned by [`Introspect::dependencies`], so the trait stays
/// object safe while probe subprocesses run under the interrupt-aware
/// executor.
pub type DependencyFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<RawDependency>>> + Send + 'a>>;

/// Platform probe returning the immediate dynamic-library references of a
/// binary. Object safe so the resolver can be driven by synthetic probes in
/// tests.
pub trait Introspect: Send + Sync {
    /// List the references embedded in `binary`, in the order the binary
    /// declares them.
    fn dependencies<'a>(&'a self, binary: &'a Path) -> DependencyFuture<'a>;
}

/// Select the probe backend for a platform.
pub fn for_platform(platform: TargetPlatform) -> Box<dyn Introspect> {
    match platform {
        TargetPlatform::Linux => Box::new(linux::LddProbe),
        TargetPlatform::MacOs => Box::new(macos::OtoolProbe),
        TargetPlatform::Windows => Box::new(windows::PeProbe),
    }
}
