//! Post-build relocation pipeline orchestration.
//!
//! Coordinates the resolve -> materialize -> rewrite sequence for one
//! bundle. All fatal conditions abort the remaining steps; soft warnings
//! are collected and reported once resolution is complete.

use crate::bundler::classify::Classifier;
use crate::bundler::error::{Error, ErrorExt, Result};
use crate::bundler::introspect::{self, Introspect};
use crate::bundler::layout::BundleLayout;
use crate::bundler::settings::{Settings, TargetPlatform};
use crate::bundler::utils::tool_detection::{
    HAS_INSTALL_NAME_TOOL, HAS_LDD, HAS_OTOOL, HAS_PATCHELF,
};
use crate::bundler::{materialize, resolve, rewrite};
use std::path::PathBuf;

/// Main pipeline orchestrator.
///
/// Platform backends are selected once at construction; a platform with no
/// backend fails here rather than attempting a no-op.
pub struct Relocator {
    settings: Settings,
    layout: BundleLayout,
    probe: Box<dyn Introspect>,
    classifier: Classifier,
}

/// Outcome of one pipeline run.
#[derive(Debug, serde::Serialize)]
pub struct RelocationReport {
    /// Source paths of every bundled library
    pub bundled: Vec<PathBuf>,
    /// Paths placed inside the layout, links included
    pub placed: Vec<PathBuf>,
    /// Bare names no search path directory could satisfy
    pub unresolved: Vec<String>,
}

impl Relocator {
    /// Build the pipeline for the given settings, verifying the external
    /// tools the selected platform needs are actually installed.
    pub fn new(settings: Settings) -> Result<Self> {
        check_tools(settings.platform)?;
        let layout = BundleLayout::for_platform(settings.platform, &settings.bundle_root);
        let probe = introspect::for_platform(settings.platform);
        let classifier = Classifier::new(&settings);
        Ok(Relocator {
            settings,
            layout,
            probe,
            classifier,
        })
    }

    /// Run the full pipeline: resolve, materialize, rewrite, report.
    pub async fn run(&self) -> Result<RelocationReport> {
        log::info!(
            "resolving dependencies for {} root binaries ({})",
            self.settings.binaries.len(),
            self.settings.platform.name()
        );

        let resolved = resolve::resolve(
            &self.settings.binaries,
            self.probe.as_ref(),
            &self.classifier,
            self.settings.policy,
        )
        .await?;
        log::info!("resolved {} bundleable libraries", resolved.bundled.len());
        for path in &resolved.bundled {
            log::debug!("  - {}", path.display());
        }

        let placed = materialize::materialize(&resolved, &self.layout)?;
        log::info!(
            "materialized {} entries into {}",
            placed.len(),
            self.layout.lib_dir().display()
        );

        rewrite::rewrite(&self.settings, &self.layout, self.probe.as_ref(), &self.classifier)
            .await?;

        // Soft failures, reported together so operators can audit them
        for name in &resolved.unresolved {
            log::warn!("library not found in any search path: {name}");
        }

        let report = RelocationReport {
            bundled: resolved.bundled.iter().cloned().collect(),
            placed,
            unresolved: resolved.unresolved.clone(),
        };

        if let Some(path) = &self.settings.manifest {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| Error::GenericError(format!("failed to serialize manifest: {e}")))?;
            std::fs::write(path, json).fs_context("writing manifest", path)?;
            log::info!("wrote resolution manifest to {}", path.display());
        }

        Ok(report)
    }
}

/// Fail fast when the platform's inspection or rewrite tool is missing.
/// The Windows backend parses import tables in-process and needs nothing.
fn check_tools(platform: TargetPlatform) -> Result<()> {
    match platform {
        TargetPlatform::MacOs => {
            if !*HAS_OTOOL {
                crate::bail!("otool not found. Install the Xcode command line tools");
            }
            if !*HAS_INSTALL_NAME_TOOL {
                crate::bail!("install_name_tool not found. Install the Xcode command line tools");
            }
        }
        TargetPlatform::Linux => {
            if !*HAS_LDD {
                crate::bail!("ldd not found. Install glibc development tools");
            }
            if !*HAS_PATCHELF {
                crate::bail!(
                    "patchelf not found. Please install patchelf (e.g. apt-get install patchelf)"
                );
            }
        }
        TargetPlatform::Windows => {}
    }
    Ok(())
}
