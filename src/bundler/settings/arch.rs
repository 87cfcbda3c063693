//! CPU architecture types and utilities.

/// CPU architecture for target binaries.
///
/// Selects the architecture-specific subdirectory of the Windows
/// redistributable search path and gates architecture-dependent runtime DLLs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, clap::ValueEnum)]
pub enum Arch {
    /// x86_64 / AMD64 (64-bit)
    #[value(name = "x64")]
    #[serde(rename = "x64")]
    X86_64,
    /// x86 / i686 (32-bit)
    #[value(name = "x86")]
    #[serde(rename = "x86")]
    X86,
    /// AArch64 / ARM64 (64-bit)
    #[value(name = "arm64")]
    #[serde(rename = "arm64")]
    AArch64,
    /// macOS universal binary - contains both x86_64 and AArch64
    #[value(name = "universal")]
    #[serde(rename = "universal")]
    Universal,
}

impl Arch {
    /// Architecture subfolder name used by the MSVC and Windows SDK
    /// redistributable directory layouts.
    pub fn windows_subdir(&self) -> &'static str {
        match self {
            Arch::X86_64 | Arch::Universal => "x64",
            Arch::X86 => "x86",
            Arch::AArch64 => "arm64",
        }
    }
}
