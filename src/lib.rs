//! buildline - cross-platform compiler command composition for C++ projects
//!
//! This crate detects the host platform, selects a profile of compiler
//! flags for it, composes a single compiler invocation and runs it,
//! reducing the outcome to a success/failure exit code.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use crate::builder::{compose, CommandLine, ExecMode, RunResult, Runner};
pub use crate::core::{BuildConfig, PlatformId, PlatformProfile, ProfileTable};
pub use crate::util::config::Config;
