//! Host platform detection.
//!
//! Resolution never fails: an operating system we have no profile for maps
//! to [`PlatformId::Unknown`], which downstream code turns into an empty
//! profile.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The operating systems buildline knows how to compose commands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    Linux,
    #[serde(alias = "darwin")]
    MacOs,
    Windows,
    Unknown,
}

impl PlatformId {
    /// All platforms, in table order.
    pub const ALL: [PlatformId; 4] = [
        PlatformId::Linux,
        PlatformId::MacOs,
        PlatformId::Windows,
        PlatformId::Unknown,
    ];

    /// Map an OS name (as reported by `std::env::consts::OS` or a user) to a
    /// platform. Anything unrecognized becomes `Unknown`.
    pub fn from_os_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "linux" => PlatformId::Linux,
            "macos" | "darwin" => PlatformId::MacOs,
            "windows" => PlatformId::Windows,
            _ => PlatformId::Unknown,
        }
    }

    /// Stable lowercase key used in config files and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformId::Linux => "linux",
            PlatformId::MacOs => "macos",
            PlatformId::Windows => "windows",
            PlatformId::Unknown => "unknown",
        }
    }

    /// Check if this is one of the platforms with a built-in profile.
    pub fn is_known(&self) -> bool {
        !matches!(self, PlatformId::Unknown)
    }
}

/// Detect the platform of the running host.
pub fn resolve() -> PlatformId {
    let platform = PlatformId::from_os_name(std::env::consts::OS);
    tracing::debug!(
        "resolved host os `{}` to platform {}",
        std::env::consts::OS,
        platform.as_str()
    );
    platform
}

impl fmt::Display for PlatformId {
    /// System names as printed in the build banner.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlatformId::Linux => "Linux",
            PlatformId::MacOs => "Darwin",
            PlatformId::Windows => "Windows",
            PlatformId::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

impl FromStr for PlatformId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unknown" => Ok(PlatformId::Unknown),
            other => match PlatformId::from_os_name(other) {
                PlatformId::Unknown => Err(format!(
                    "invalid platform '{}'; expected 'linux', 'macos', 'windows', or 'unknown'",
                    s
                )),
                platform => Ok(platform),
            },
        }
    }
}
