//! Windows classification rules.
//!
//! Three concerns live here: the allow-list of core OS DLLs that must never
//! be bundled, the table of MSVC runtime DLLs that must be bundled under
//! dynamic CRT linkage even though the import table never names them, and
//! the ordered search path used to turn bare DLL names into files.

use crate::bundler::settings::{Arch, Linkage, MsvcToolchain};
use std::path::PathBuf;

/// Core OS DLLs that ship with Windows. Lowercase; matching is
/// case-insensitive because import entries preserve whatever casing the
/// import library used.
const SYSTEM_DLLS: &[&str] = &[
    "advapi32.dll",
    "bcrypt.dll",
    "comctl32.dll",
    "comdlg32.dll",
    "crypt32.dll",
    "d3d11.dll",
    "dbghelp.dll",
    "dnsapi.dll",
    "dwmapi.dll",
    "gdi32.dll",
    "gdiplus.dll",
    "imm32.dll",
    "iphlpapi.dll",
    "kernel32.dll",
    "msimg32.dll",
    "msvcrt.dll",
    "ncrypt.dll",
    "ntdll.dll",
    "ole32.dll",
    "oleaut32.dll",
    "powrprof.dll",
    "psapi.dll",
    "rpcrt4.dll",
    "secur32.dll",
    "setupapi.dll",
    "shcore.dll",
    "shell32.dll",
    "shlwapi.dll",
    "user32.dll",
    "userenv.dll",
    "uxtheme.dll",
    "version.dll",
    "winhttp.dll",
    "winmm.dll",
    "ws2_32.dll",
];

/// One row of the dynamic-CRT injection table.
struct RuntimeDllRule {
    name: &'static str,
    /// Minimum (major, minor) MSVC tools version that ships the file.
    /// `None` means the file exists for every VC14x toolset.
    min_tools: Option<(u64, u64)>,
    /// Restrict to specific target architectures; `None` means all.
    archs: Option<&'static [Arch]>,
}

/// Runtime DLLs pulled in by the loader under dynamic CRT linkage.
/// Thresholds are encoded here once; call sites never compare versions.
const RUNTIME_DLLS: &[RuntimeDllRule] = &[
    RuntimeDllRule {
        name: "msvcp140.dll",
        min_tools: None,
        archs: None,
    },
    RuntimeDllRule {
        name: "msvcp140_1.dll",
        min_tools: None,
        archs: None,
    },
    RuntimeDllRule {
        name: "msvcp140_2.dll",
        min_tools: None,
        archs: None,
    },
    RuntimeDllRule {
        name: "vcruntime140.dll",
        min_tools: None,
        archs: None,
    },
    RuntimeDllRule {
        name: "concrt140.dll",
        min_tools: None,
        archs: None,
    },
    // 64-bit exception unwinding helper split out of vcruntime140.dll
    RuntimeDllRule {
        name: "vcruntime140_1.dll",
        min_tools: Some((14, 20)),
        archs: Some(&[Arch::X86_64, Arch::AArch64]),
    },
    RuntimeDllRule {
        name: "msvcp140_codecvt_ids.dll",
        min_tools: Some((14, 26)),
        archs: None,
    },
    RuntimeDllRule {
        name: "msvcp140_atomic_wait.dll",
        min_tools: Some((14, 28)),
        archs: None,
    },
    RuntimeDllRule {
        name: "ucrtbase.dll",
        min_tools: None,
        archs: None,
    },
];

/// Windows rule set: allow-list checks, runtime-DLL injection and bare-name
/// resolution over the toolchain search path.
pub struct WindowsRules {
    arch: Arch,
    linkage: Linkage,
    toolchain: Option<MsvcToolchain>,
    search_path: Vec<PathBuf>,
}

impl WindowsRules {
    /// Build the rule set; the search path is derived once from the
    /// toolchain directories and the target architecture.
    pub fn new(arch: Arch, linkage: Linkage, toolchain: Option<MsvcToolchain>) -> Self {
        let search_path = build_search_path(arch, toolchain.as_ref());
        WindowsRules {
            arch,
            linkage,
            toolchain,
            search_path,
        }
    }

    /// Whether a bare DLL name is a core OS DLL (case-insensitive), or an
    /// API-set forwarder the loader virtualizes.
    pub fn is_system_dll(&self, name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        lower.starts_with("api-ms-win-")
            || lower.starts_with("ext-ms-win-")
            || SYSTEM_DLLS.contains(&lower.as_str())
    }

    /// Runtime DLL names to inject into the bundleable set.
    pub fn runtime_dlls(&self) -> Vec<String> {
        if self.linkage == Linkage::Static {
            return Vec::new();
        }
        let tools = self
            .toolchain
            .as_ref()
            .and_then(|tc| tc.tools_version.as_ref());

        RUNTIME_DLLS
            .iter()
            .filter(|rule| {
                if let Some(archs) = rule.archs {
                    if !archs.contains(&self.arch) {
                        return false;
                    }
                }
                match (rule.min_tools, tools) {
                    (None, _) => true,
                    (Some((major, minor)), Some(version)) => {
                        (version.major, version.minor) >= (major, minor)
                    }
                    // Gated files are skipped when the toolset is unknown
                    (Some(_), None) => false,
                }
            })
            .map(|rule| rule.name.to_string())
            .collect()
    }

    /// First existing match for a bare name across the ordered search path.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        self.search_path
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.exists())
    }

    /// Ordered candidate directories for bare-name resolution.
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }
}

/// Candidate directories, most specific first: the toolset CRT folder, the
/// per-architecture redist root, then the UCRT DLL directory.
fn build_search_path(arch: Arch, toolchain: Option<&MsvcToolchain>) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let Some(tc) = toolchain else {
        return dirs;
    };

    if let Some(redist) = &tc.redist_dir {
        let arch_dir = redist.join(arch.windows_subdir());
        if let Some(crt_dir) = tc.crt_dir_name() {
            dirs.push(arch_dir.join(crt_dir));
        }
        dirs.push(arch_dir);
    }
    if let Some(ucrt) = &tc.ucrt_dir {
        dirs.push(
            ucrt.join("Redist")
                .join("ucrt")
                .join("DLLs")
                .join(arch.windows_subdir()),
        );
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    fn toolchain(version: Option<&str>) -> MsvcToolchain {
        MsvcToolchain {
            tools_version: version.map(|v| Version::parse(v).unwrap()),
            redist_dir: None,
            ucrt_dir: None,
        }
    }

    fn rules(arch: Arch, linkage: Linkage, version: Option<&str>) -> WindowsRules {
        WindowsRules::new(arch, linkage, Some(toolchain(version)))
    }

    #[test]
    fn allow_list_is_case_insensitive() {
        let rules = rules(Arch::X86_64, Linkage::Dynamic, None);
        assert!(rules.is_system_dll("KERNEL32.DLL"));
        assert!(rules.is_system_dll("Ws2_32.dll"));
        assert!(rules.is_system_dll("api-ms-win-crt-runtime-l1-1-0.dll"));
        assert!(!rules.is_system_dll("libcrypto-3-x64.dll"));
        assert!(!rules.is_system_dll("zlib1.dll"));
    }

    #[test]
    fn static_linkage_injects_nothing() {
        let rules = rules(Arch::X86_64, Linkage::Static, Some("14.29.30133"));
        assert!(rules.runtime_dlls().is_empty());
    }

    #[test]
    fn new_toolsets_gain_version_gated_dlls() {
        let dlls = rules(Arch::X86_64, Linkage::Dynamic, Some("14.29.30133")).runtime_dlls();
        assert!(dlls.contains(&"msvcp140_atomic_wait.dll".to_string()));
        assert!(dlls.contains(&"msvcp140_codecvt_ids.dll".to_string()));
        assert!(dlls.contains(&"vcruntime140_1.dll".to_string()));
    }

    #[test]
    fn old_toolsets_skip_version_gated_dlls() {
        let dlls = rules(Arch::X86_64, Linkage::Dynamic, Some("14.16.27012")).runtime_dlls();
        assert!(dlls.contains(&"msvcp140.dll".to_string()));
        assert!(dlls.contains(&"vcruntime140.dll".to_string()));
        assert!(!dlls.contains(&"msvcp140_atomic_wait.dll".to_string()));
        assert!(!dlls.contains(&"msvcp140_codecvt_ids.dll".to_string()));
        assert!(!dlls.contains(&"vcruntime140_1.dll".to_string()));
    }

    #[test]
    fn unwinding_helper_is_64_bit_only() {
        let dlls = rules(Arch::X86, Linkage::Dynamic, Some("14.29.30133")).runtime_dlls();
        assert!(!dlls.contains(&"vcruntime140_1.dll".to_string()));

        let dlls = rules(Arch::AArch64, Linkage::Dynamic, Some("14.29.30133")).runtime_dlls();
        assert!(dlls.contains(&"vcruntime140_1.dll".to_string()));
    }

    #[test]
    fn unknown_toolset_skips_gated_dlls() {
        let dlls = rules(Arch::X86_64, Linkage::Dynamic, None).runtime_dlls();
        assert!(dlls.contains(&"msvcp140.dll".to_string()));
        assert!(!dlls.contains(&"vcruntime140_1.dll".to_string()));
    }

    #[test]
    fn search_path_prefers_toolset_crt_dir() {
        let temp = tempfile::tempdir().unwrap();
        let redist = temp.path().join("redist");
        let crt_dir = redist.join("x64").join("Microsoft.VC142.CRT");
        std::fs::create_dir_all(&crt_dir).unwrap();
        std::fs::create_dir_all(redist.join("x64")).unwrap();
        std::fs::write(crt_dir.join("msvcp140.dll"), b"crt copy").unwrap();
        std::fs::write(redist.join("x64").join("msvcp140.dll"), b"stray copy").unwrap();

        let tc = MsvcToolchain {
            tools_version: Some(Version::parse("14.29.30133").unwrap()),
            redist_dir: Some(redist),
            ucrt_dir: None,
        };
        let rules = WindowsRules::new(Arch::X86_64, Linkage::Dynamic, Some(tc));

        let resolved = rules.resolve("msvcp140.dll").unwrap();
        assert_eq!(resolved, crt_dir.join("msvcp140.dll"));
        assert!(rules.resolve("nonexistent.dll").is_none());
    }
}
