//! Configuration file support for buildline.
//!
//! buildline reads two optional configuration files:
//! - Global: `~/.buildline/config.toml` - User-wide defaults
//! - Project: `./buildline.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. With neither file
//! present the built-in compiler, sources and platform profiles are used
//! unchanged.
//!
//! ```toml
//! [build]
//! compiler = "clang++ -std=c++20"
//! sources = ["./src/*.cpp"]
//! executable = "game"
//!
//! [profile.linux]
//! libraries = "-lSDL2 -ldl"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::build_config::{DEFAULT_COMPILER, DEFAULT_SOURCES};
use crate::core::{ProfileOverride, ProfileTable};

/// File name of the project configuration.
pub const PROJECT_CONFIG_NAME: &str = "buildline.toml";

/// buildline configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildSection,

    /// Per-platform profile overrides, keyed by platform name
    pub profile: BTreeMap<String, ProfileOverride>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Compiler driver and global flags
    pub compiler: Option<String>,

    /// Source file patterns, replacing the defaults entirely
    pub sources: Option<Vec<String>>,

    /// Executable name for every known platform
    pub executable: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing
    /// or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.compiler.is_some() {
            self.build.compiler = other.build.compiler;
        }
        if other.build.sources.is_some() {
            self.build.sources = other.build.sources;
        }
        if other.build.executable.is_some() {
            self.build.executable = other.build.executable;
        }

        for (platform, profile) in other.profile {
            self.profile.entry(platform).or_default().merge(profile);
        }
    }

    /// Effective compiler string.
    pub fn compiler(&self) -> &str {
        self.build.compiler.as_deref().unwrap_or(DEFAULT_COMPILER)
    }

    /// Effective source patterns.
    pub fn sources(&self) -> Vec<String> {
        match self.build.sources {
            Some(ref sources) => sources.clone(),
            None => DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Build the profile table: built-ins, then the executable name, then
    /// per-platform overrides.
    pub fn profile_table(&self) -> ProfileTable {
        let table = ProfileTable::builtin();
        let table = match self.build.executable {
            Some(ref name) => table.with_executable(name),
            None => table,
        };
        table.with_overrides(&self.profile)
    }
}

/// Get the global buildline config directory (~/.buildline).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".buildline"))
}

/// Get the global config path (~/.buildline/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (./buildline.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_NAME)
}

fn load_global(global_path: Option<&Path>) -> Config {
    match global_path {
        Some(path) if path.exists() => {
            tracing::debug!("loading global config from {}", path.display());
            Config::load_or_default(path)
        }
        _ => Config::default(),
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (./buildline.toml)
/// 2. Global config (~/.buildline/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = load_global(global_path);

    // Project config overrides global
    if project_path.exists() {
        tracing::debug!("loading project config from {}", project_path.display());
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Load configuration with an explicitly named project file.
///
/// Unlike [`load_config`], the explicit file must exist and parse.
pub fn load_config_explicit(global_path: Option<&Path>, explicit_path: &Path) -> Result<Config> {
    let mut config = load_global(global_path);
    config.merge(Config::load(explicit_path)?);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlatformId;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.compiler(), "g++ -g -std=c++17");
        assert_eq!(config.sources().len(), 3);
        assert_eq!(config.profile_table(), ProfileTable::builtin());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("buildline.toml");

        std::fs::write(
            &config_path,
            r#"
[build]
compiler = "clang++ -std=c++20"
sources = ["./src/*.cpp", "./lib/*.cpp"]
executable = "game"

[profile.linux]
libraries = "-lSDL2"

[profile.darwin]
defines = "-D MAC -D RETINA"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.compiler(), "clang++ -std=c++20");
        assert_eq!(config.sources(), vec!["./src/*.cpp", "./lib/*.cpp"]);

        let table = config.profile_table();
        let linux = table.lookup(PlatformId::Linux);
        assert_eq!(linux.library_flags, "-lSDL2");
        assert_eq!(linux.output_name, "game");
        assert_eq!(
            table.lookup(PlatformId::MacOs).define_flags,
            "-D MAC -D RETINA"
        );
        assert_eq!(table.lookup(PlatformId::Windows).output_name, "game.exe");
    }

    #[test]
    fn test_profile_output_beats_executable() {
        let config: Config = toml::from_str(
            r#"
[build]
executable = "game"

[profile.windows]
output = "game-win64.exe"
"#,
        )
        .unwrap();

        let table = config.profile_table();
        assert_eq!(table.lookup(PlatformId::Windows).output_name, "game-win64.exe");
        assert_eq!(table.lookup(PlatformId::Linux).output_name, "game");
    }

    #[test]
    fn test_config_load_rejects_malformed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("buildline.toml");
        std::fs::write(&config_path, "[build\ncompiler = ").unwrap();

        assert!(Config::load(&config_path).is_err());
        assert_eq!(Config::load_or_default(&config_path), Config::default());
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.build.compiler = Some("g++".to_string());
        base.build.executable = Some("base".to_string());
        base.profile.insert(
            "linux".to_string(),
            ProfileOverride {
                defines: Some("-D BASE".to_string()),
                ..Default::default()
            },
        );

        let mut override_cfg = Config::default();
        override_cfg.build.compiler = Some("clang++".to_string());
        override_cfg.profile.insert(
            "linux".to_string(),
            ProfileOverride {
                libraries: Some("-lm".to_string()),
                ..Default::default()
            },
        );

        base.merge(override_cfg);

        assert_eq!(base.compiler(), "clang++");
        assert_eq!(base.build.executable.as_deref(), Some("base")); // Not overridden
        let linux = &base.profile["linux"];
        assert_eq!(linux.defines.as_deref(), Some("-D BASE"));
        assert_eq!(linux.libraries.as_deref(), Some("-lm"));
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("buildline.toml");

        std::fs::write(
            &global_path,
            r#"
[build]
compiler = "g++-13"
executable = "global"
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[build]
compiler = "clang++"
"#,
        )
        .unwrap();

        let config = load_config(Some(&global_path), &project_path);

        // Project config should override compiler
        assert_eq!(config.compiler(), "clang++");
        // Global executable should be preserved
        assert_eq!(config.build.executable.as_deref(), Some("global"));
    }

    #[test]
    fn test_load_config_missing_files() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(
            Some(&tmp.path().join("nope.toml")),
            &tmp.path().join("buildline.toml"),
        );
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_config_explicit_requires_file() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("custom.toml");
        assert!(load_config_explicit(None, &missing).is_err());

        std::fs::write(&missing, "[build]\nexecutable = \"demo\"\n").unwrap();
        let config = load_config_explicit(None, &missing).unwrap();
        assert_eq!(config.build.executable.as_deref(), Some("demo"));
    }
}
