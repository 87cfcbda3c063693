//! Copies resolved dependencies into the bundle layout.
//!
//! Symlinks are recreated as symlinks with the same link text, and the link
//! target is materialized through the same rule, so versioned soname chains
//! (`libfoo.so -> libfoo.so.1 -> libfoo.so.1.2`) survive bundling instead of
//! being flattened into duplicate copies.

use crate::bundler::error::{Context, ErrorExt, Result};
use crate::bundler::layout::BundleLayout;
use crate::bundler::resolve::ResolvedSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum symlink-chain depth reproduced in the destination. Deeper chains
/// collapse into a plain copy of the fully resolved file.
pub const MAX_LINK_CHAIN: usize = 3;

/// Copy every bundleable dependency into the layout's library directory.
///
/// Idempotent: an existing destination file is left untouched, so re-running
/// after a partial build neither fails nor duplicates work. Returns the
/// paths placed inside the layout, links included.
pub fn materialize(set: &ResolvedSet, layout: &BundleLayout) -> Result<Vec<PathBuf>> {
    let lib_dir = layout.lib_dir();
    fs::create_dir_all(&lib_dir).fs_context("creating library directory", &lib_dir)?;

    let mut placed = Vec::new();
    for src in &set.bundled {
        log::debug!("materializing {}", src.display());
        copy_with_links(
            src,
            &lib_dir,
            layout.replace_existing_links(),
            &mut placed,
        )?;
    }
    Ok(placed)
}

/// Copy one library, recreating each symlink hop under its own name before
/// following it, up to [`MAX_LINK_CHAIN`] hops.
fn copy_with_links(
    src: &Path,
    dest_dir: &Path,
    replace_links: bool,
    placed: &mut Vec<PathBuf>,
) -> Result<()> {
    let mut src = src.to_path_buf();
    let mut hops = 0;

    loop {
        let name = src.file_name().context("library path has no file name")?;
        let dest = dest_dir.join(name);

        let meta = fs::symlink_metadata(&src).fs_context("inspecting library", &src)?;
        if !meta.file_type().is_symlink() {
            copy_file_once(&src, &dest)?;
            placed.push(dest);
            return Ok(());
        }

        if hops == MAX_LINK_CHAIN {
            // Chain deeper than the supported depth: ship the resolved file
            let resolved = src
                .canonicalize()
                .fs_context("resolving symlink chain", &src)?;
            copy_file_once(&resolved, &dest)?;
            placed.push(dest);
            return Ok(());
        }

        let target = fs::read_link(&src).fs_context("reading symlink", &src)?;
        // Absolute link text would point back at the source machine; the
        // next hop lands beside this link, so its basename is the right
        // target inside the bundle.
        let link_text = if target.is_absolute() {
            PathBuf::from(
                target
                    .file_name()
                    .context("symlink target has no file name")?,
            )
        } else {
            target.clone()
        };
        recreate_link(&link_text, &dest, replace_links)?;
        placed.push(dest);

        src = if target.is_absolute() {
            target
        } else {
            src.parent()
                .context("symlink has no parent directory")?
                .join(&target)
        };
        hops += 1;
    }
}

/// Copy `src` to `dest` unless something already sits at `dest`.
fn copy_file_once(src: &Path, dest: &Path) -> Result<()> {
    if dest.symlink_metadata().is_ok() {
        return Ok(());
    }
    fs::copy(src, dest).fs_context("copying library", dest)?;
    Ok(())
}

/// Recreate a symlink with the given link text. Existing regular files are
/// left alone; existing links are replaced only when `replace` is set.
fn recreate_link(target: &Path, dest: &Path, replace: bool) -> Result<()> {
    if let Ok(meta) = dest.symlink_metadata() {
        if !(replace && meta.file_type().is_symlink()) {
            return Ok(());
        }
        fs::remove_file(dest).fs_context("removing stale link", dest)?;
    }
    symlink(target, dest).fs_context("creating symlink", dest)?;
    Ok(())
}

#[cfg(unix)]
fn symlink(target: &Path, dest: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, dest)
}

#[cfg(windows)]
fn symlink(target: &Path, dest: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, dest)
}
