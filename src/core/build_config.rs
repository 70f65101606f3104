//! The resolved inputs of a single build invocation.

use serde::{Deserialize, Serialize};

use super::profile::PlatformProfile;

/// Default compiler driver and global flags.
pub const DEFAULT_COMPILER: &str = "g++ -g -std=c++17";

/// Default source globs, compiled in this order.
pub const DEFAULT_SOURCES: &[&str] = &[
    "./src/*.cpp",
    "./src/Startup/*.cpp",
    "./src/Particles/*.cpp",
];

/// Everything the composer needs to produce a command line.
///
/// Constructed once per run and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Compiler driver, optionally followed by global flags (`g++ -g -std=c++17`)
    pub compiler: String,
    /// Source file patterns (globs), in order
    pub source_patterns: Vec<String>,
    /// Flags selected for the current platform
    pub profile: PlatformProfile,
}

impl BuildConfig {
    /// Create a build config.
    pub fn new(
        compiler: impl Into<String>,
        source_patterns: impl IntoIterator<Item = impl Into<String>>,
        profile: PlatformProfile,
    ) -> Self {
        BuildConfig {
            compiler: compiler.into(),
            source_patterns: source_patterns.into_iter().map(|p| p.into()).collect(),
            profile,
        }
    }

    /// Default compiler and sources combined with the given profile.
    pub fn with_profile(profile: PlatformProfile) -> Self {
        BuildConfig::new(DEFAULT_COMPILER, DEFAULT_SOURCES.iter().copied(), profile)
    }

    /// Override the output executable name.
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.profile.output_name = output.into();
        self
    }
}
