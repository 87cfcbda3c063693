//! Load-path metadata rewriting backends.
//!
//! Runs after materialization so every rewritten reference points at a file
//! that is already inside the layout. Signing must happen after this step:
//! rewriting load paths invalidates an existing signature.

mod linux;
mod macos;

use crate::bundler::classify::Classifier;
use crate::bundler::error::{ErrorExt, Result};
use crate::bundler::introspect::Introspect;
use crate::bundler::layout::BundleLayout;
use crate::bundler::settings::{Settings, TargetPlatform};
use std::path::{Path, PathBuf};

/// Rewrite load-path metadata for the main binaries and every library
/// inside the layout. Idempotent per artifact.
pub async fn rewrite(
    settings: &Settings,
    layout: &BundleLayout,
    probe: &dyn Introspect,
    classifier: &Classifier,
) -> Result<()> {
    match settings.platform {
        TargetPlatform::Linux => linux::rewrite(settings, layout).await,
        TargetPlatform::MacOs => macos::rewrite(settings, layout, probe, classifier).await,
        TargetPlatform::Windows => {
            // The PE loader searches the executable's directory first
            log::debug!("flat PE layout needs no load-path rewriting");
            Ok(())
        }
    }
}

/// Regular files directly inside the layout's library directory.
/// Subdirectories (framework bundles, resources) are skipped.
fn bundle_libraries(lib_dir: &Path) -> Result<Vec<PathBuf>> {
    if !lib_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut libs = Vec::new();
    for entry in walkdir::WalkDir::new(lib_dir).min_depth(1).max_depth(1) {
        let entry = entry
            .map_err(|e| std::io::Error::other(e))
            .fs_context("listing library directory", lib_dir)?;
        if entry.file_type().is_dir() {
            continue;
        }
        libs.push(entry.into_path());
    }
    libs.sort();
    Ok(libs)
}
