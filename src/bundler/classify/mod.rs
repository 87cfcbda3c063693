//! System vs bundleable classification rules.
//!
//! A dependency classified "system" ships with the OS and must never be
//! copied into the bundle; everything else is bundleable and must be.

pub mod windows;

use crate::bundler::settings::{Settings, TargetPlatform};
use std::path::{Path, PathBuf};
use windows::WindowsRules;

/// Classification verdict for one dependency.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Class {
    /// Provided by the OS; excluded from the bundle
    System,
    /// Must be copied into the bundle
    Bundleable,
}

/// Directory prefixes that mark a resolved path as an OS library.
const SYSTEM_PREFIXES: &[&str] = &["/usr/lib", "/usr/lib64", "/lib", "/lib64", "/System"];

/// Per-platform classification rule set, built once from the pipeline
/// settings and consulted by the resolver and rewriter.
pub struct Classifier {
    platform: TargetPlatform,
    windows: Option<WindowsRules>,
}

impl Classifier {
    /// Build the rule set for the configured platform.
    pub fn new(settings: &Settings) -> Self {
        let windows = match settings.platform {
            TargetPlatform::Windows => Some(WindowsRules::new(
                settings.arch,
                settings.linkage,
                settings.toolchain.clone(),
            )),
            _ => None,
        };
        Classifier {
            platform: settings.platform,
            windows,
        }
    }

    /// Whether an absolute path lives under a recognized OS library
    /// directory.
    pub fn is_system_path(&self, path: &Path) -> bool {
        SYSTEM_PREFIXES
            .iter()
            .any(|prefix| path.starts_with(prefix))
    }

    /// Classify a resolved absolute path.
    pub fn classify_path(&self, path: &Path) -> Class {
        if self.is_system_path(path) {
            Class::System
        } else {
            Class::Bundleable
        }
    }

    /// Classify a bare library name (Windows import entries).
    pub fn classify_name(&self, name: &str) -> Class {
        match &self.windows {
            Some(rules) if rules.is_system_dll(name) => Class::System,
            _ => Class::Bundleable,
        }
    }

    /// Resolve a bundleable bare name through the ordered search path.
    pub fn resolve_bare(&self, name: &str) -> Option<PathBuf> {
        self.windows.as_ref()?.resolve(name)
    }

    /// Runtime DLLs the loader pulls in without an import-table entry.
    /// Empty everywhere except the Windows dynamic-linkage configuration.
    pub fn runtime_dlls(&self) -> Vec<String> {
        match &self.windows {
            Some(rules) => rules.runtime_dlls(),
            None => Vec::new(),
        }
    }

    /// Platform this rule set was built for.
    pub fn platform(&self) -> TargetPlatform {
        self.platform
    }
}
