//! External tool availability checking.
//!
//! Cached results so the pipeline can fail fast at construction instead of
//! half-way through a bundle.

use std::sync::LazyLock;

fn have(tool: &str) -> bool {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("found {} at {}", tool, path.display());
            true
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            false
        }
    }
}

/// Mach-O load-command dumper (macOS introspection)
pub static HAS_OTOOL: LazyLock<bool> = LazyLock::new(|| have("otool"));

/// Mach-O load-path editor (macOS rewriting)
pub static HAS_INSTALL_NAME_TOOL: LazyLock<bool> = LazyLock::new(|| have("install_name_tool"));

/// Dynamic linker dependency resolver (Linux introspection)
pub static HAS_LDD: LazyLock<bool> = LazyLock::new(|| have("ldd"));

/// ELF rpath editor (Linux rewriting)
pub static HAS_PATCHELF: LazyLock<bool> = LazyLock::new(|| have("patchelf"));
