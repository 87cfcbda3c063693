//! MSVC toolchain state consumed by the Windows classifier.
//!
//! Built from environment variables a Visual Studio developer prompt exports
//! (`VCToolsVersion`, `VCToolsRedistDir`, `UniversalCRTSdkDir`) or from
//! explicit CLI flags. Only the Windows search-path construction and the
//! runtime-DLL table read this; the POSIX backends ignore it.

use semver::Version;
use std::path::PathBuf;

/// Toolchain installation state for the Windows target.
#[derive(Clone, Debug)]
pub struct MsvcToolchain {
    /// Full tools version, e.g. `14.29.30133`. Gates version-dependent
    /// runtime DLLs; unknown version means gated DLLs are not injected.
    pub tools_version: Option<Version>,
    /// `VCToolsRedistDir` - root of the per-architecture CRT redistributables
    pub redist_dir: Option<PathBuf>,
    /// `UniversalCRTSdkDir` - root of the Windows 10 SDK UCRT redistributables
    pub ucrt_dir: Option<PathBuf>,
}

impl MsvcToolchain {
    /// Returns true when no toolchain state was provided at all.
    pub fn is_empty(&self) -> bool {
        self.tools_version.is_none() && self.redist_dir.is_none() && self.ucrt_dir.is_none()
    }

    /// CRT directory name inside the per-architecture redist folder,
    /// e.g. `Microsoft.VC142.CRT` for tools 14.2x.
    pub fn crt_dir_name(&self) -> Option<String> {
        let version = self.tools_version.as_ref()?;
        Some(format!(
            "Microsoft.VC{}{}.CRT",
            version.major,
            version.minor / 10
        ))
    }
}
