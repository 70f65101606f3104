//! Core data structures for buildline.
//!
//! This module contains the types every run is built from:
//! - Platform identification
//! - Per-platform flag profiles
//! - The resolved build configuration

pub mod build_config;
pub mod platform;
pub mod profile;

pub use build_config::BuildConfig;
pub use platform::PlatformId;
pub use profile::{PlatformProfile, ProfileOverride, ProfileTable};
