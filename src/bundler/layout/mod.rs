//! Destination directory conventions for relocatable bundles.

use crate::bundler::settings::TargetPlatform;
use std::path::{Path, PathBuf};

/// The target directory structure the materializer populates.
///
/// Invariant once materialized: every bundleable dependency of every binary
/// in the bundle has a file physically present inside the layout.
#[derive(Clone, Debug)]
pub enum BundleLayout {
    /// `<root>/bin` + `<root>/lib`, rpath-based lookup
    PosixTree {
        /// Bundle root directory
        root: PathBuf,
    },
    /// `<root>/Contents/MacOS` + `<root>/Contents/Frameworks`
    MacApp {
        /// The `.app` directory
        root: PathBuf,
    },
    /// Libraries sit beside the executable; the PE loader finds them there
    WindowsFlat {
        /// Directory containing the executable
        root: PathBuf,
    },
}

impl BundleLayout {
    /// Layout convention for a platform rooted at `root`.
    pub fn for_platform(platform: TargetPlatform, root: &Path) -> Self {
        let root = root.to_path_buf();
        match platform {
            TargetPlatform::Linux => BundleLayout::PosixTree { root },
            TargetPlatform::MacOs => BundleLayout::MacApp { root },
            TargetPlatform::Windows => BundleLayout::WindowsFlat { root },
        }
    }

    /// Directory bundleable libraries are copied into.
    pub fn lib_dir(&self) -> PathBuf {
        match self {
            BundleLayout::PosixTree { root } => root.join("lib"),
            BundleLayout::MacApp { root } => root.join("Contents").join("Frameworks"),
            BundleLayout::WindowsFlat { root } => root.clone(),
        }
    }

    /// Loader-relative search directive for an artifact at `path`: libraries
    /// search their own directory, executables search the library directory.
    pub fn loader_directive(&self, artifact: &Path) -> String {
        let in_lib_dir = artifact.starts_with(self.lib_dir());
        match self {
            BundleLayout::PosixTree { .. } => {
                if in_lib_dir {
                    "$ORIGIN".to_string()
                } else {
                    "$ORIGIN/../lib".to_string()
                }
            }
            BundleLayout::MacApp { .. } => {
                if in_lib_dir {
                    "@loader_path/../Frameworks".to_string()
                } else {
                    "@executable_path/../Frameworks".to_string()
                }
            }
            BundleLayout::WindowsFlat { .. } => String::new(),
        }
    }

    /// Whether stale destination symlinks are unlinked and recreated.
    /// Only the .app layout replaces links: a prior partial run may have
    /// left links pointing at the wrong chain member.
    pub fn replace_existing_links(&self) -> bool {
        matches!(self, BundleLayout::MacApp { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posix_layout_paths() {
        let layout = BundleLayout::for_platform(TargetPlatform::Linux, Path::new("/dist/app"));
        assert_eq!(layout.lib_dir(), Path::new("/dist/app/lib"));
        assert_eq!(
            layout.loader_directive(Path::new("/dist/app/bin/app")),
            "$ORIGIN/../lib"
        );
        assert_eq!(
            layout.loader_directive(Path::new("/dist/app/lib/libfoo.so.1")),
            "$ORIGIN"
        );
    }

    #[test]
    fn mac_layout_paths() {
        let layout = BundleLayout::for_platform(TargetPlatform::MacOs, Path::new("/dist/App.app"));
        assert_eq!(
            layout.lib_dir(),
            Path::new("/dist/App.app/Contents/Frameworks")
        );
        assert_eq!(
            layout.loader_directive(Path::new("/dist/App.app/Contents/MacOS/App")),
            "@executable_path/../Frameworks"
        );
        assert_eq!(
            layout.loader_directive(Path::new(
                "/dist/App.app/Contents/Frameworks/libbar.dylib"
            )),
            "@loader_path/../Frameworks"
        );
        assert!(layout.replace_existing_links());
    }

    #[test]
    fn windows_layout_is_flat() {
        let layout = BundleLayout::for_platform(TargetPlatform::Windows, Path::new("C:/dist"));
        assert_eq!(layout.lib_dir(), Path::new("C:/dist"));
        assert!(!layout.replace_existing_links());
    }
}
