//! Mach-O load-path rewriting via install_name_tool.

use crate::bundler::classify::Classifier;
use crate::bundler::error::{Context, Result};
use crate::bundler::introspect::{self, Introspect, RawDependency};
use crate::bundler::layout::BundleLayout;
use crate::bundler::settings::Settings;
use crate::bundler::utils::process::{run_tool, Fatality};
use std::ffi::OsString;
use std::path::Path;

/// Build-machine install prefixes that must not leak into shipped bundles.
const STALE_RPATHS: &[&str] = &["/usr/local/lib", "/opt/local/lib"];

pub async fn rewrite(
    settings: &Settings,
    layout: &BundleLayout,
    probe: &dyn Introspect,
    classifier: &Classifier,
) -> Result<()> {
    for root in &settings.binaries {
        let binary = introspect::macos::main_binary(root)?;
        rewrite_artifact(&binary, layout, probe, classifier, false).await?;
    }
    for lib in super::bundle_libraries(&layout.lib_dir())? {
        rewrite_artifact(&lib, layout, probe, classifier, true).await?;
    }
    Ok(())
}

/// Apply the full rewrite sequence to one artifact: install name (libraries
/// only), loader-relative rpath, per-dependency reference rewrites, stale
/// rpath removal.
async fn rewrite_artifact(
    artifact: &Path,
    layout: &BundleLayout,
    probe: &dyn Introspect,
    classifier: &Classifier,
    set_id: bool,
) -> Result<()> {
    let directive = layout.loader_directive(artifact);

    if set_id {
        let name = artifact
            .file_name()
            .context("library path has no file name")?
            .to_string_lossy()
            .into_owned();
        tool(
            &["-id", &format!("{directive}/{name}"), &path_arg(artifact)],
            Fatality::Hard,
        )
        .await?;
    }

    // Adding an rpath that is already present exits nonzero; that is the
    // desired end state, not a failure
    tool(
        &["-add_rpath", &directive, &path_arg(artifact)],
        Fatality::Soft,
    )
    .await?;

    for dep in probe.dependencies(artifact).await? {
        let RawDependency::Path(dep_path) = dep else {
            continue;
        };
        if classifier.is_system_path(&dep_path) {
            continue;
        }
        let dep_name = dep_path
            .file_name()
            .context("dependency path has no file name")?
            .to_string_lossy()
            .into_owned();
        log::debug!(
            "rewriting {} -> {directive}/{dep_name} in {}",
            dep_path.display(),
            artifact.display()
        );
        tool(
            &[
                "-change",
                &dep_path.to_string_lossy(),
                &format!("{directive}/{dep_name}"),
                &path_arg(artifact),
            ],
            Fatality::Hard,
        )
        .await?;
    }

    // Absence of the rpath being deleted is not an error
    for stale in STALE_RPATHS {
        tool(
            &["-delete_rpath", stale, &path_arg(artifact)],
            Fatality::Soft,
        )
        .await?;
    }

    Ok(())
}

async fn tool(args: &[&str], fatality: Fatality) -> Result<bool> {
    let args: Vec<OsString> = args.iter().map(OsString::from).collect();
    run_tool("install_name_tool", &args, fatality).await
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
