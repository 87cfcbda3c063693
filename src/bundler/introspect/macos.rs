//! Mach-O dependency discovery via `otool -L`.

use super::{DependencyFuture, Introspect, RawDependency};
use crate::bundler::error::{Context, Result};
use crate::bundler::utils::process::run_capture;
use path_absolutize::Absolutize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Probe backed by the `otool` load-command dumper.
pub struct OtoolProbe;

impl Introspect for OtoolProbe {
    fn dependencies<'a>(&'a self, binary: &'a Path) -> DependencyFuture<'a> {
        Box::pin(async move {
            let binary = main_binary(binary)?;
            let stdout = run_capture("otool", &[OsStr::new("-L"), binary.as_os_str()]).await?;
            normalize(parse_otool_output(&stdout), &binary)
        })
    }
}

/// `.app` directories are inspected through their embedded main executable.
pub fn main_binary(path: &Path) -> Result<PathBuf> {
    let is_app = path.extension().and_then(|e| e.to_str()) == Some("app");
    if is_app && path.is_dir() {
        let stem = path
            .file_stem()
            .context("app bundle path has no file name")?;
        Ok(path.join("Contents").join("MacOS").join(stem))
    } else {
        Ok(path.to_path_buf())
    }
}

/// Extract the reference strings from `otool -L` output.
///
/// The first line echoes the queried file; each following line is an
/// indented reference with a `(compatibility ...)` suffix.
fn parse_otool_output(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip(1)
        .filter_map(|line| line.split('(').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize loader-relative tokens against the querying binary's directory
/// and drop references the loader resolves itself (`@rpath` and friends).
fn normalize(refs: Vec<String>, binary: &Path) -> Result<Vec<RawDependency>> {
    let base = binary.parent().unwrap_or_else(|| Path::new("."));
    let mut out = Vec::new();

    for raw in refs {
        let candidate = if let Some(rest) = raw.strip_prefix("@executable_path/") {
            base.join(rest)
        } else if let Some(rest) = raw.strip_prefix("@loader_path/") {
            base.join(rest)
        } else if raw.contains('*') {
            // Homebrew emits wildcard install names for keg-only formulas
            match expand_wildcard(&raw) {
                Some(path) => path,
                None => {
                    log::warn!("cannot expand wildcard reference {raw}");
                    continue;
                }
            }
        } else {
            PathBuf::from(&raw)
        };

        if !candidate.is_absolute() {
            log::debug!("skipping loader-resolved reference {raw}");
            continue;
        }

        let candidate = candidate.absolutize()?.into_owned();
        out.push(RawDependency::Path(candidate));
    }

    Ok(out)
}

/// Resolve `/opt/homebrew/*/...` references through the Cellar.
fn expand_wildcard(raw: &str) -> Option<PathBuf> {
    let rest = raw.strip_prefix("/opt/homebrew/*/")?;
    let pattern = format!("/opt/homebrew/Cellar/*/{rest}");
    glob::glob(&pattern)
        .ok()?
        .flatten()
        .find(|entry| entry.exists())
}
