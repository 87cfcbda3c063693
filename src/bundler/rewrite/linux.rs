//! ELF rpath rewriting via patchelf.
//!
//! ELF NEEDED entries are plain sonames, so pointing the rpath at the
//! bundle's library directory is the whole job; individual references never
//! need editing.

use crate::bundler::error::Result;
use crate::bundler::layout::BundleLayout;
use crate::bundler::settings::Settings;
use crate::bundler::utils::process::{run_tool, Fatality};
use std::ffi::OsString;
use std::path::Path;

pub async fn rewrite(settings: &Settings, layout: &BundleLayout) -> Result<()> {
    for binary in &settings.binaries {
        set_rpath(binary, &layout.loader_directive(binary)).await?;
    }
    for lib in super::bundle_libraries(&layout.lib_dir())? {
        set_rpath(&lib, &layout.loader_directive(&lib)).await?;
    }
    Ok(())
}

/// Replace the artifact's rpath outright. `--set-rpath` overwrites, so
/// re-running on an already-relocated artifact is a no-op by construction.
async fn set_rpath(artifact: &Path, rpath: &str) -> Result<()> {
    log::debug!("patchelf --set-rpath {} {}", rpath, artifact.display());
    let args: Vec<OsString> = vec![
        OsString::from("--set-rpath"),
        OsString::from(rpath),
        artifact.as_os_str().to_os_string(),
    ];
    run_tool("patchelf", &args, Fatality::Hard).await?;
    Ok(())
}
