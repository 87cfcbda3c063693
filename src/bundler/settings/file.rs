//! Optional TOML settings file.
//!
//! Values from the file are merged underneath command line flags: a flag
//! given on the command line always wins.

use super::{Arch, Linkage, TargetPlatform};
use std::path::{Path, PathBuf};

/// On-disk settings, all optional.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ConfigFile {
    /// Bundle directory (or .app bundle) to populate
    pub bundle_root: Option<PathBuf>,
    /// Root binaries to resolve
    pub binaries: Option<Vec<PathBuf>>,
    /// Target platform
    pub target: Option<TargetPlatform>,
    /// Target architecture
    pub arch: Option<Arch>,
    /// CRT linkage mode
    pub linkage: Option<Linkage>,
    /// Escalate unresolved bare names to a hard failure
    pub strict: Option<bool>,
    /// MSVC tools version, e.g. "14.29.30133"
    pub vc_tools_version: Option<semver::Version>,
    /// MSVC redistributable directory
    pub vc_redist_dir: Option<PathBuf>,
    /// Universal CRT SDK directory
    pub ucrt_dir: Option<PathBuf>,
}

impl ConfigFile {
    /// Load and parse a settings file.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
