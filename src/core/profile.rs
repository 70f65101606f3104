//! Per-platform compiler flag profiles.
//!
//! The built-in table mirrors what the project needs on each host: SDL2 and
//! GLFW from the system on Linux, the SDL2 framework on macOS, and MinGW
//! import libraries on Windows. Every platform is defined on its own; no
//! flags are shared between rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::platform::PlatformId;

/// Compiler flags for one operating system target.
///
/// Fields are kept as the raw flag strings the compiler will see. An empty
/// string means "nothing to pass" and is still a valid profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformProfile {
    /// Preprocessor defines and other flags placed before the sources
    pub define_flags: String,
    /// Header search path flags (`-I...`)
    pub include_flags: String,
    /// Library and framework link flags (`-l...`, `-framework ...`)
    pub library_flags: String,
    /// Name of the produced executable
    pub output_name: String,
}

impl PlatformProfile {
    /// Create a profile from its four fields.
    pub fn new(
        define_flags: impl Into<String>,
        include_flags: impl Into<String>,
        library_flags: impl Into<String>,
        output_name: impl Into<String>,
    ) -> Self {
        PlatformProfile {
            define_flags: define_flags.into(),
            include_flags: include_flags.into(),
            library_flags: library_flags.into(),
            output_name: output_name.into(),
        }
    }

    /// The profile used when the platform is not recognized.
    pub fn empty() -> Self {
        PlatformProfile::default()
    }

    /// Check whether every field is empty.
    pub fn is_empty(&self) -> bool {
        self.define_flags.is_empty()
            && self.include_flags.is_empty()
            && self.library_flags.is_empty()
            && self.output_name.is_empty()
    }

    /// Apply field-wise overrides; unset fields keep their current value.
    pub fn apply(&mut self, overrides: &ProfileOverride) {
        if let Some(ref defines) = overrides.defines {
            self.define_flags = defines.clone();
        }
        if let Some(ref includes) = overrides.includes {
            self.include_flags = includes.clone();
        }
        if let Some(ref libraries) = overrides.libraries {
            self.library_flags = libraries.clone();
        }
        if let Some(ref output) = overrides.output {
            self.output_name = output.clone();
        }
    }
}

/// Look up the built-in profile for a platform.
///
/// Never fails: `Unknown` yields an empty profile.
pub fn lookup(platform: PlatformId) -> PlatformProfile {
    match platform {
        PlatformId::Linux => PlatformProfile::new(
            "-D LINUX",
            "-I ./include/ -I ./include/glm",
            "-lSDL2 -ldl -lglfw",
            "prog",
        ),
        PlatformId::MacOs => PlatformProfile::new(
            "-D MAC",
            "-I ./include/ -I ./include/glm",
            "-F/Library/Frameworks -framework SDL2 -rpath /Library/Frameworks",
            "prog",
        ),
        PlatformId::Windows => PlatformProfile::new(
            "-D MINGW -static-libgcc -static-libstdc++",
            "-I./include/ -I./include/glm -I./include/glfw",
            "-lmingw32 -lSDL2main -lSDL2",
            "prog.exe",
        ),
        PlatformId::Unknown => PlatformProfile::empty(),
    }
}

/// Partial profile read from a config file's `[profile.<platform>]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOverride {
    /// Replaces `define_flags`
    pub defines: Option<String>,
    /// Replaces `include_flags`
    pub includes: Option<String>,
    /// Replaces `library_flags`
    pub libraries: Option<String>,
    /// Replaces `output_name`
    pub output: Option<String>,
}

impl ProfileOverride {
    /// Merge another override into this one (other takes precedence).
    pub fn merge(&mut self, other: ProfileOverride) {
        if other.defines.is_some() {
            self.defines = other.defines;
        }
        if other.includes.is_some() {
            self.includes = other.includes;
        }
        if other.libraries.is_some() {
            self.libraries = other.libraries;
        }
        if other.output.is_some() {
            self.output = other.output;
        }
    }
}

/// Immutable table of profiles, one per platform.
///
/// Built once at startup from the built-ins plus configuration, then only
/// read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileTable {
    profiles: BTreeMap<&'static str, PlatformProfile>,
}

impl ProfileTable {
    /// The built-in table with no configuration applied.
    pub fn builtin() -> Self {
        let profiles = PlatformId::ALL
            .iter()
            .map(|p| (p.as_str(), lookup(*p)))
            .collect();
        ProfileTable { profiles }
    }

    /// Rename the executable on every known platform.
    ///
    /// On Windows the `.exe` suffix is added when missing.
    pub fn with_executable(mut self, name: &str) -> Self {
        for platform in PlatformId::ALL.iter().filter(|p| p.is_known()) {
            let output = if *platform == PlatformId::Windows && !name.ends_with(".exe") {
                format!("{}.exe", name)
            } else {
                name.to_string()
            };
            if let Some(profile) = self.profiles.get_mut(platform.as_str()) {
                profile.output_name = output;
            }
        }
        self
    }

    /// Apply per-platform overrides keyed by platform name.
    ///
    /// Keys that don't name a platform are skipped with a warning.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, ProfileOverride>) -> Self {
        for (key, profile_override) in overrides {
            let platform = match key.parse::<PlatformId>() {
                Ok(platform) => platform,
                Err(_) => {
                    tracing::warn!("ignoring profile for unrecognized platform `{}`", key);
                    continue;
                }
            };
            if let Some(profile) = self.profiles.get_mut(platform.as_str()) {
                profile.apply(profile_override);
            }
        }
        self
    }

    /// Get the profile for a platform. Never fails.
    pub fn lookup(&self, platform: PlatformId) -> PlatformProfile {
        self.profiles
            .get(platform.as_str())
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for ProfileTable {
    fn default() -> Self {
        ProfileTable::builtin()
    }
}
