//! buildline CLI - compose and run the compiler command for this project

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use buildline::builder::ExecMode;
use buildline::ops::{compile, CompileOptions};
use buildline::util::config::{
    global_config_path, load_config, load_config_explicit, project_config_path,
};
use buildline::util::Shell;
use cli::{Cli, MessageFormat};

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("buildline=debug")
    } else {
        EnvFilter::new("buildline=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let shell = Shell::from_flags(
        cli.quiet,
        cli.verbose,
        cli.color,
        cli.message_format == MessageFormat::Json,
    );

    // Load configuration (global + project, or an explicit file)
    let global = global_config_path();
    let config = match cli.config {
        Some(ref path) => load_config_explicit(global.as_deref(), path)?,
        None => {
            let cwd = std::env::current_dir()?;
            load_config(global.as_deref(), &project_config_path(&cwd))
        }
    };

    let opts = CompileOptions {
        platform: cli.platform,
        compiler: cli.compiler,
        sources: cli.sources,
        output: cli.output,
        exec_mode: if cli.no_shell {
            ExecMode::Direct
        } else {
            ExecMode::Shell
        },
        dry_run: cli.dry_run,
    };

    let outcome = compile(&config, &opts, &shell);
    Ok(outcome.exit_code())
}
