//! High-level operations.
//!
//! This module contains the implementation of the `buildline` command.

pub mod buildline_compile;

pub use buildline_compile::{compile, plan, print_banner, CompileOptions, CompileOutcome, CompilePlan};
