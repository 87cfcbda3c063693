//! ELF dependency discovery via `ldd`.

use super::{DependencyFuture, Introspect, RawDependency};
use crate::bundler::error::Result;
use crate::bundler::utils::process::run_capture;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Probe backed by the dynamic linker's `ldd` resolver.
///
/// `ldd` reports where each NEEDED entry actually resolved on this machine,
/// which is exactly the file set a self-contained bundle has to carry.
pub struct LddProbe;

impl Introspect for LddProbe {
    fn dependencies<'a>(&'a self, binary: &'a Path) -> DependencyFuture<'a> {
        Box::pin(async move {
            let stdout = run_capture("ldd", &[binary.as_os_str()]).await?;
            normalize(parse_ldd_output(&stdout), binary)
        })
    }
}

/// Extract resolved target strings from `ldd` output.
///
/// Lines look like one of:
/// ```text
///     linux-vdso.so.1 (0x00007ffd0b5fe000)
///     libssl.so.3 => /usr/lib/libssl.so.3 (0x00007f1a2c000000)
///     /lib64/ld-linux-x86-64.so.2 (0x00007f1a2c40e000)
/// ```
fn parse_ldd_output(stdout: &str) -> Vec<String> {
    let mut refs = Vec::new();

    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let target = match line.split_once("=>") {
            Some((_, rhs)) => rhs.trim(),
            None => line,
        };
        // Strip the trailing load address
        let target = target.split(" (").next().unwrap_or(target).trim();
        if target.is_empty() {
            continue;
        }
        refs.push(target.to_string());
    }

    refs
}

/// Normalize `$ORIGIN/` tokens and drop loader-internal entries such as the
/// vdso, which never resolve to a file.
fn normalize(refs: Vec<String>, binary: &Path) -> Result<Vec<RawDependency>> {
    let base = binary.parent().unwrap_or_else(|| Path::new("."));
    let mut out = Vec::new();

    for raw in refs {
        let candidate = if let Some(rest) = raw.strip_prefix("$ORIGIN/") {
            base.join(rest)
        } else {
            PathBuf::from(&raw)
        };

        if !candidate.is_absolute() {
            log::debug!("skipping loader-internal reference {raw}");
            continue;
        }

        let candidate = candidate.absolutize()?.into_owned();
        out.push(RawDependency::Path(candidate));
    }

    Ok(out)
}
