//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use buildline::core::PlatformId;
use buildline::util::shell::ColorChoice;

/// buildline - compose and run the compiler command for this project
#[derive(Parser)]
#[command(name = "buildline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Output format for messages
    #[arg(long, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    /// Compose for this platform instead of the host (linux, macos, windows, unknown)
    #[arg(long)]
    pub platform: Option<PlatformId>,

    /// Compiler driver and global flags (e.g. "clang++ -std=c++20")
    #[arg(long, env = "BUILDLINE_COMPILER")]
    pub compiler: Option<String>,

    /// Source file pattern; may be repeated, replaces the configured list
    #[arg(long = "source", value_name = "PATTERN")]
    pub sources: Vec<String>,

    /// Output executable name
    #[arg(short, long)]
    pub output: Option<String>,

    /// Configuration file to use instead of ./buildline.toml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Spawn the compiler directly instead of through the system shell
    #[arg(long)]
    pub no_shell: bool,

    /// Print the command without running it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}
