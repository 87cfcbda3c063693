//! Pipeline configuration.
//!
//! All configuration is collected into one immutable [`Settings`] value
//! threaded through the classifier and resolver, never read from ambient
//! process state after startup.

mod arch;
mod file;
mod toolchain;

pub use arch::Arch;
pub use file::ConfigFile;
pub use toolchain::MsvcToolchain;

use crate::bundler::error::{Error, Result};
use std::path::PathBuf;

/// Platform whose dependency/rewrite backends drive the pipeline.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetPlatform {
    /// ELF binaries, `ldd` introspection, `patchelf` rewriting
    Linux,
    /// Mach-O binaries, `otool` introspection, `install_name_tool` rewriting
    #[value(name = "macos")]
    #[serde(rename = "macos")]
    MacOs,
    /// PE binaries, import-table introspection, no rewriting needed
    Windows,
}

impl TargetPlatform {
    /// Detect the host platform, failing hard when no backend exists for it.
    pub fn host() -> Result<Self> {
        if cfg!(target_os = "linux") {
            Ok(TargetPlatform::Linux)
        } else if cfg!(target_os = "macos") {
            Ok(TargetPlatform::MacOs)
        } else if cfg!(windows) {
            Ok(TargetPlatform::Windows)
        } else {
            Err(Error::PlatformUnsupported(std::env::consts::OS.to_string()))
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            TargetPlatform::Linux => "linux",
            TargetPlatform::MacOs => "macos",
            TargetPlatform::Windows => "windows",
        }
    }
}

/// How the C/C++ runtime is linked into the target binary.
///
/// Dynamic linkage pulls in the MSVC runtime DLL set on Windows even though
/// the import table never names most of it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Linkage {
    /// Runtime statically linked; nothing extra to bundle
    Static,
    /// Runtime loaded from DLLs that must travel with the binary
    Dynamic,
}

/// What to do when a bare library name is not found in any search path.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolvePolicy {
    /// Unresolved names fail the build
    Strict,
    /// Unresolved names are collected and reported as warnings
    Lenient,
}

/// Immutable pipeline configuration.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Bundle directory (or .app bundle) the materializer populates
    pub bundle_root: PathBuf,
    /// Root binaries whose dependency closure is resolved
    pub binaries: Vec<PathBuf>,
    /// Platform backend selection
    pub platform: TargetPlatform,
    /// Target architecture
    pub arch: Arch,
    /// CRT linkage mode
    pub linkage: Linkage,
    /// Unresolved-name policy
    pub policy: ResolvePolicy,
    /// MSVC toolchain state, when targeting Windows
    pub toolchain: Option<MsvcToolchain>,
    /// Optional path for the JSON resolution manifest
    pub manifest: Option<PathBuf>,
}
