use std::fmt;

use current_platform::CURRENT_PLATFORM;
#[cfg(test)]
use proptest::prelude::*;
#[cfg(test)]
use proptest_derive::Arbitrary;

/// Error returned when the current platform is not supported by gvm.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("gvm does not (yet) support your platform ({platform})")]
pub struct UnsupportedPlatformError {
    pub platform: String,
}

/// Operating systems that toolchain downloads are published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Macos,
    Windows,
}

impl Os {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architectures, named the way Rust target triples name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86_64,
    Aarch64,
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents the host platforms that gvm supports.
///
/// Using an enum with no wildcard fallback ensures the compiler enforces
/// exhaustive handling. Adding a new platform variant (e.g., `WindowsAarch64`)
/// will produce compiler errors at every call site until all methods handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum HostPlatform {
    MacosAarch64,
    MacosX86_64,
    LinuxX86_64,
    LinuxMuslX86_64,
    LinuxAarch64,
    LinuxMuslAarch64,
    WindowsX86_64,
}

impl HostPlatform {
    /// Detect the current host platform.
    ///
    /// Checks the `GVM_TEST_PLATFORM` env var first (for testing), then falls
    /// back to the compile-time `CURRENT_PLATFORM`.
    pub fn current() -> Result<Self, UnsupportedPlatformError> {
        if let Ok(platform) = std::env::var("GVM_TEST_PLATFORM") {
            Self::from_target_triple(&platform)
        } else {
            Self::from_target_triple(CURRENT_PLATFORM)
        }
    }

    /// Parse a Rust target triple into a `HostPlatform`.
    pub fn from_target_triple(triple: &str) -> Result<Self, UnsupportedPlatformError> {
        match triple {
            "aarch64-apple-darwin" => Ok(Self::MacosAarch64),
            "x86_64-apple-darwin" => Ok(Self::MacosX86_64),
            "x86_64-unknown-linux-gnu" => Ok(Self::LinuxX86_64),
            "x86_64-unknown-linux-musl" => Ok(Self::LinuxMuslX86_64),
            "aarch64-unknown-linux-gnu" => Ok(Self::LinuxAarch64),
            "aarch64-unknown-linux-musl" => Ok(Self::LinuxMuslAarch64),
            "x86_64-pc-windows-msvc" => Ok(Self::WindowsX86_64),
            other => Err(UnsupportedPlatformError {
                platform: other.to_string(),
            }),
        }
    }

    pub fn os(&self) -> Os {
        match self {
            Self::MacosAarch64 | Self::MacosX86_64 => Os::Macos,
            Self::LinuxX86_64
            | Self::LinuxAarch64
            | Self::LinuxMuslX86_64
            | Self::LinuxMuslAarch64 => Os::Linux,
            Self::WindowsX86_64 => Os::Windows,
        }
    }

    pub fn arch(&self) -> Arch {
        match self {
            Self::MacosAarch64 | Self::LinuxAarch64 | Self::LinuxMuslAarch64 => Arch::Aarch64,
            Self::MacosX86_64 | Self::LinuxX86_64 | Self::LinuxMuslX86_64 | Self::WindowsX86_64 => {
                Arch::X86_64
            }
        }
    }

    /// Whether this is a Windows platform.
    pub fn is_windows(&self) -> bool {
        self.os() == Os::Windows
    }

    /// All supported platforms.
    ///
    /// **Maintainer note:** When adding a new variant, add it here too.
    /// The exhaustive matches in every other method will force a compiler
    /// error when you add a variant, bringing you into this file.
    pub fn all() -> &'static [Self] {
        &[
            Self::MacosAarch64,
            Self::MacosX86_64,
            Self::LinuxX86_64,
            Self::LinuxMuslX86_64,
            Self::LinuxAarch64,
            Self::LinuxMuslAarch64,
            Self::WindowsX86_64,
        ]
    }

    /// The Rust target triple for this platform.
    pub fn target_triple(&self) -> &'static str {
        match self {
            Self::MacosAarch64 => "aarch64-apple-darwin",
            Self::MacosX86_64 => "x86_64-apple-darwin",
            Self::LinuxX86_64 => "x86_64-unknown-linux-gnu",
            Self::LinuxMuslX86_64 => "x86_64-unknown-linux-musl",
            Self::LinuxAarch64 => "aarch64-unknown-linux-gnu",
            Self::LinuxMuslAarch64 => "aarch64-unknown-linux-musl",
            Self::WindowsX86_64 => "x86_64-pc-windows-msvc",
        }
    }

    /// The separator used between entries of the `PATH` variable.
    pub fn path_separator(&self) -> char {
        if self.is_windows() { ';' } else { ':' }
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os(), self.arch())
    }
}
