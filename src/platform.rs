use crate::error::InstallError;
use crate::utils::{print_status, TagColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    Macos,
    Windows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    Arm64,
}

impl Os {
    /// Capitalized OS token used by the release builder's archive names.
    pub fn release_token(&self) -> &'static str {
        match self {
            Os::Linux => "Linux",
            Os::Macos => "Darwin",
            Os::Windows => "Windows",
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Os::Windows)
    }
}

impl Arch {
    pub fn release_token(&self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Arm64 => "arm64",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlatformInfo {
    pub os: Os,
    pub arch: Arch,
    pub raw_os: String,
    pub raw_arch: String,
}

impl PlatformInfo {
    pub fn build() -> Result<Self, InstallError> {
        Self::resolve(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Maps host-reported identifiers onto release-naming tokens. Both sides
    /// must map or the whole install aborts before touching network or disk.
    pub fn resolve(raw_os: &str, raw_arch: &str) -> Result<Self, InstallError> {
        let os = match raw_os {
            "linux" => Some(Os::Linux),
            "macos" | "darwin" => Some(Os::Macos),
            "windows" | "win32" => Some(Os::Windows),
            _ => None,
        };

        let arch = match raw_arch {
            "x86_64" | "x64" => Some(Arch::X86_64),
            "aarch64" | "arm64" => Some(Arch::Arm64),
            _ => None,
        };

        match (os, arch) {
            (Some(os), Some(arch)) => Ok(PlatformInfo {
                os,
                arch,
                raw_os: raw_os.to_string(),
                raw_arch: raw_arch.to_string(),
            }),
            _ => Err(InstallError::UnsupportedPlatform {
                os: raw_os.to_string(),
                arch: raw_arch.to_string(),
            }),
        }
    }

    /// Binary file name for this platform; Windows executables carry `.exe`.
    pub fn exe_name(&self, base: &str) -> String {
        if self.os.is_windows() {
            format!("{base}.exe")
        } else {
            base.to_string()
        }
    }

    pub fn print_summary(&self) {
        print_status(
            "INFO",
            "Operating System",
            &format!("{} ({})", self.os.release_token(), self.raw_os),
            TagColor::Cyan,
        );
        print_status(
            "INFO",
            "Architecture",
            self.arch.release_token(),
            TagColor::Cyan,
        );
    }
}
