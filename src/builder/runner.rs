//! Process execution and exit-code normalization.
//!
//! The runner never returns an error and never panics: every way a run can
//! go wrong is folded into a [`RunResult`], whose [`tool_exit_code`] is the
//! only status buildline reports outward.
//!
//! [`tool_exit_code`]: RunResult::tool_exit_code

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use super::command::CommandLine;
use crate::util::process::{find_executable, ProcessBuilder};

/// Exit code recorded when the child could not be started at all.
///
/// Same value a POSIX shell uses for "command not found".
pub const SPAWN_FAILURE_CODE: i32 = 127;

/// Exit code recorded when the child ended without one (killed by a signal).
pub const NO_EXIT_CODE: i32 = -1;

/// How the composed command is handed to the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecMode {
    /// Pass the rendered string to the command interpreter.
    #[default]
    Shell,
    /// Spawn the compiler directly with split, glob-expanded arguments.
    Direct,
}

/// Why a run did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RunFailure {
    /// The child process could not be created.
    #[error("could not run `{program}`: {reason}")]
    #[diagnostic(
        code(buildline::run::spawn),
        help("Check that the compiler is installed and on your PATH")
    )]
    Spawn { program: String, reason: String },

    /// The child ran and exited unsuccessfully.
    #[error("compilation failed ({})", describe_code(.code))]
    #[diagnostic(
        code(buildline::run::compile),
        help("The compiler output above describes the problem")
    )]
    Compile { code: i32 },
}

fn describe_code(code: &i32) -> String {
    if *code == NO_EXIT_CODE {
        "terminated by signal".to_string()
    } else {
        format!("exit code {}", code)
    }
}

/// Outcome of one compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Raw exit code of the child, or a sentinel for spawn failure / signal
    pub exit_code: i32,
    /// True iff `exit_code == 0`
    pub succeeded: bool,
    /// Failure cause, for diagnostics only
    pub failure: Option<RunFailure>,
}

impl RunResult {
    /// Result of a child that ran to completion.
    pub fn from_code(exit_code: i32) -> Self {
        let succeeded = exit_code == 0;
        RunResult {
            exit_code,
            succeeded,
            failure: (!succeeded).then_some(RunFailure::Compile { code: exit_code }),
        }
    }

    /// Result of a child that never started.
    pub fn spawn_failed(program: impl Into<String>, reason: impl Into<String>) -> Self {
        RunResult {
            exit_code: SPAWN_FAILURE_CODE,
            succeeded: false,
            failure: Some(RunFailure::Spawn {
                program: program.into(),
                reason: reason.into(),
            }),
        }
    }

    /// This tool's own exit status: `0` on success, `1` otherwise.
    pub fn tool_exit_code(&self) -> i32 {
        if self.succeeded {
            0
        } else {
            1
        }
    }
}

/// Executes composed commands.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    mode: ExecMode,
    cwd: Option<PathBuf>,
}

impl Runner {
    /// Create a runner with the given execution mode.
    pub fn new(mode: ExecMode) -> Self {
        Runner { mode, cwd: None }
    }

    /// Run the child in a specific working directory.
    pub fn with_cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Run the command and block until it finishes.
    pub fn run(&self, command: &CommandLine) -> RunResult {
        let process = match self.mode {
            ExecMode::Shell => match shell_process(command, self.cwd.as_deref()) {
                Ok(process) => process,
                Err(result) => return result,
            },
            ExecMode::Direct => match direct_process(command) {
                Ok(process) => process,
                Err(result) => return result,
            },
        };
        let process = match self.cwd {
            Some(ref cwd) => process.cwd(cwd),
            None => process,
        };

        tracing::debug!("spawning `{}`", process.display_command());

        let result = match process.status() {
            Ok(status) => RunResult::from_code(status.code().unwrap_or(NO_EXIT_CODE)),
            Err(e) => RunResult::spawn_failed(
                process.get_program().display().to_string(),
                format!("{:#}", e),
            ),
        };

        tracing::debug!(
            "child finished with exit code {} (succeeded: {})",
            result.exit_code,
            result.succeeded
        );
        result
    }
}

/// Build a shell process for the rendered command.
///
/// The compiler is located first: the interpreter would report a missing
/// compiler only as exit code 127.
fn shell_process(command: &CommandLine, cwd: Option<&Path>) -> Result<ProcessBuilder, RunResult> {
    let Some(program) = command.program() else {
        return Err(RunResult::spawn_failed("", "no compiler configured"));
    };

    if !is_runnable(program, cwd) {
        let reason = if program.contains(std::path::is_separator) {
            "no such file"
        } else {
            "executable not found in PATH"
        };
        return Err(RunResult::spawn_failed(program, reason));
    }

    Ok(ProcessBuilder::shell(command.to_string()))
}

/// Whether `program` names something the shell could start: a file when it
/// is a path, otherwise an executable on PATH.
fn is_runnable(program: &str, cwd: Option<&Path>) -> bool {
    if program.contains(std::path::is_separator) {
        let path = match cwd {
            Some(cwd) => cwd.join(program),
            None => PathBuf::from(program),
        };
        path.is_file()
    } else {
        find_executable(program).is_some()
    }
}

/// Build a shell-less process, resolving the compiler on PATH first so a
/// missing binary is reported by name.
fn direct_process(command: &CommandLine) -> Result<ProcessBuilder, RunResult> {
    let argv = command.expanded_argv();
    let Some((program, args)) = argv.split_first() else {
        return Err(RunResult::spawn_failed("", "no compiler configured"));
    };

    let resolved = match find_executable(program) {
        Some(path) => path,
        None => {
            return Err(RunResult::spawn_failed(
                program.clone(),
                "executable not found in PATH",
            ))
        }
    };

    Ok(ProcessBuilder::new(resolved).args(args))
}

/// Run a command with the default (shell) runner.
pub fn run(command: &CommandLine) -> RunResult {
    Runner::default().run(command)
}
