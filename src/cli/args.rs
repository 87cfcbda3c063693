//! Command line argument parsing and validation.

use crate::bundler::settings::{
    Arch, ConfigFile, Linkage, MsvcToolchain, ResolvePolicy, Settings, TargetPlatform,
};
use crate::error::CliError;
use clap::Parser;
use std::path::PathBuf;

/// Post-build dependency bundler and load-path relocator
#[derive(Parser, Debug)]
#[command(
    name = "relopack",
    version,
    about = "Bundles shared-library dependencies and relocates load paths",
    long_about = "Resolves the transitive shared-library dependencies of freshly built binaries,
copies the non-system ones into the bundle layout for the target platform and
rewrites load-path metadata so the bundle is relocatable.

Run after compilation and before archiving or code signing.

Usage:
  relopack --bundle-root dist/myapp --binary dist/myapp/bin/myapp
  relopack --bundle-root dist/MyApp.app --binary dist/MyApp.app --target macos
  relopack --bundle-root dist --binary dist/myapp.exe --target windows --arch x64

Exit code 0 = bundle fully materialized and relocated."
)]
pub struct Args {
    /// Bundle directory (or .app bundle) to populate
    #[arg(short = 'r', long, value_name = "DIR")]
    pub bundle_root: Option<PathBuf>,

    /// Root binary to resolve; may be given multiple times
    #[arg(short = 'b', long = "binary", value_name = "PATH")]
    pub binaries: Vec<PathBuf>,

    /// Target platform (defaults to the host OS)
    #[arg(short, long, value_enum, value_name = "PLATFORM")]
    pub target: Option<TargetPlatform>,

    /// Target architecture
    #[arg(long, value_enum, env = "RELOPACK_ARCH", value_name = "ARCH")]
    pub arch: Option<Arch>,

    /// C/C++ runtime linkage of the target binaries
    #[arg(long, value_enum, env = "RELOPACK_LINKAGE", value_name = "MODE")]
    pub linkage: Option<Linkage>,

    /// Fail when a bare library name cannot be found in any search path
    #[arg(long)]
    pub strict: bool,

    /// MSVC tools version, e.g. 14.29.30133
    #[arg(long, env = "VCTOOLSVERSION", value_name = "VERSION")]
    pub vc_tools_version: Option<semver::Version>,

    /// MSVC redistributable directory (per-architecture CRT folders)
    #[arg(long, env = "VCTOOLSREDISTDIR", value_name = "DIR")]
    pub vc_redist_dir: Option<PathBuf>,

    /// Universal CRT SDK directory
    #[arg(long, env = "UNIVERSALCRTSDKDIR", value_name = "DIR")]
    pub ucrt_dir: Option<PathBuf>,

    /// Write a JSON manifest of the resolved set
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// TOML settings file merged underneath command line flags
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Merge CLI flags over the optional settings file and produce the
    /// immutable pipeline configuration.
    pub fn into_settings(self) -> crate::error::Result<Settings> {
        let file = match &self.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };

        let bundle_root = self.bundle_root.or(file.bundle_root).ok_or_else(|| {
            CliError::MissingArgument {
                argument: "--bundle-root".to_string(),
            }
        })?;

        let binaries = if self.binaries.is_empty() {
            file.binaries.unwrap_or_default()
        } else {
            self.binaries
        };
        if binaries.is_empty() {
            return Err(CliError::MissingArgument {
                argument: "--binary".to_string(),
            }
            .into());
        }

        let platform = match self.target.or(file.target) {
            Some(platform) => platform,
            None => TargetPlatform::host()?,
        };

        let arch = self.arch.or(file.arch).unwrap_or(Arch::X86_64);
        if arch == Arch::Universal && platform != TargetPlatform::MacOs {
            return Err(CliError::InvalidArguments {
                reason: format!(
                    "universal binaries only exist on macos, not {}",
                    platform.name()
                ),
            }
            .into());
        }

        let toolchain = MsvcToolchain {
            tools_version: self.vc_tools_version.or(file.vc_tools_version),
            redist_dir: self.vc_redist_dir.or(file.vc_redist_dir),
            ucrt_dir: self.ucrt_dir.or(file.ucrt_dir),
        };

        let policy = if self.strict || file.strict.unwrap_or(false) {
            ResolvePolicy::Strict
        } else {
            ResolvePolicy::Lenient
        };

        Ok(Settings {
            bundle_root,
            binaries,
            platform,
            arch,
            linkage: self.linkage.or(file.linkage).unwrap_or(Linkage::Dynamic),
            policy,
            toolchain: (!toolchain.is_empty()).then_some(toolchain),
            manifest: self.manifest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("relopack").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn minimal_invocation_builds_settings() {
        let settings = args(&["--bundle-root", "dist/app", "--binary", "dist/app/bin/app"])
            .into_settings()
            .unwrap();
        assert_eq!(settings.bundle_root, PathBuf::from("dist/app"));
        assert_eq!(settings.binaries, vec![PathBuf::from("dist/app/bin/app")]);
        assert_eq!(settings.arch, Arch::X86_64);
        assert_eq!(settings.linkage, Linkage::Dynamic);
        assert_eq!(settings.policy, ResolvePolicy::Lenient);
        assert!(settings.toolchain.is_none());
    }

    #[test]
    fn missing_binary_is_rejected() {
        let err = args(&["--bundle-root", "dist/app"]).into_settings().unwrap_err();
        assert!(err.to_string().contains("--binary"));
    }

    #[test]
    fn strict_flag_selects_strict_policy() {
        let settings = args(&[
            "--bundle-root",
            "dist",
            "--binary",
            "dist/app.exe",
            "--target",
            "windows",
            "--strict",
        ])
        .into_settings()
        .unwrap();
        assert_eq!(settings.policy, ResolvePolicy::Strict);
        assert_eq!(settings.platform, TargetPlatform::Windows);
    }

    #[test]
    fn universal_arch_is_macos_only() {
        let err = args(&[
            "--bundle-root",
            "dist",
            "--binary",
            "dist/app.exe",
            "--target",
            "windows",
            "--arch",
            "universal",
        ])
        .into_settings()
        .unwrap_err();
        assert!(err.to_string().contains("universal"));

        let settings = args(&[
            "--bundle-root",
            "dist/App.app",
            "--binary",
            "dist/App.app",
            "--target",
            "macos",
            "--arch",
            "universal",
        ])
        .into_settings()
        .unwrap();
        assert_eq!(settings.arch, Arch::Universal);
    }

    #[test]
    fn toolchain_flags_build_toolchain_state() {
        let settings = args(&[
            "--bundle-root",
            "dist",
            "--binary",
            "dist/app.exe",
            "--target",
            "windows",
            "--vc-tools-version",
            "14.29.30133",
            "--vc-redist-dir",
            "C:/VC/Redist/MSVC/14.29.30133",
        ])
        .into_settings()
        .unwrap();
        let toolchain = settings.toolchain.unwrap();
        assert_eq!(
            toolchain.tools_version.unwrap(),
            semver::Version::parse("14.29.30133").unwrap()
        );
        assert!(toolchain.redist_dir.is_some());
    }
}
