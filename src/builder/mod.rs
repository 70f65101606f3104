//! Compiler command construction and execution.

pub mod command;
pub mod runner;

pub use command::{compose, CommandLine, Segment, SegmentKind};
pub use runner::{run, ExecMode, RunFailure, RunResult, Runner};
