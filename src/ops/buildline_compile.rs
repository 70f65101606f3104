//! Implementation of a `buildline` run: detect, compose, execute.

use miette::Diagnostic;

use crate::builder::{compose, CommandLine, ExecMode, RunResult, Runner};
use crate::core::{platform, BuildConfig, PlatformId};
use crate::util::shell::{Shell, Status};
use crate::util::Config;

const RULE: &str =
    "===============================================================================";

/// Options for a compile run. Every field left unset falls back to the
/// configuration, and from there to the built-ins.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Platform override (None = detect the host)
    pub platform: Option<PlatformId>,

    /// Compiler override
    pub compiler: Option<String>,

    /// Source patterns override (empty = use configuration)
    pub sources: Vec<String>,

    /// Output executable name override
    pub output: Option<String>,

    /// How to execute the command
    pub exec_mode: ExecMode,

    /// Compose and print only
    pub dry_run: bool,
}

/// Everything decided before anything is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilePlan {
    pub platform: PlatformId,
    pub config: BuildConfig,
    pub command: CommandLine,
}

/// Result of a compile run.
#[derive(Debug, Clone)]
pub struct CompileOutcome {
    pub plan: CompilePlan,
    /// None for a dry run
    pub result: Option<RunResult>,
}

impl CompileOutcome {
    /// Process exit status for this run: `0` on success or dry run, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        self.result.as_ref().map_or(0, RunResult::tool_exit_code)
    }
}

/// Resolve the platform, select its profile and compose the command.
///
/// Pure apart from host detection; never fails.
pub fn plan(config: &Config, opts: &CompileOptions) -> CompilePlan {
    let platform = opts.platform.unwrap_or_else(platform::resolve);
    let profile = config.profile_table().lookup(platform);

    let compiler = opts
        .compiler
        .clone()
        .unwrap_or_else(|| config.compiler().to_string());
    let sources = if opts.sources.is_empty() {
        config.sources()
    } else {
        opts.sources.clone()
    };

    let mut build_config = BuildConfig::new(compiler, sources, profile);
    if let Some(ref output) = opts.output {
        build_config = build_config.with_output(output.clone());
    }

    let command = compose(&build_config);
    tracing::debug!("composed command: {}", command);

    CompilePlan {
        platform,
        config: build_config,
        command,
    }
}

/// Run the full pipeline: plan, print the banner, execute and report.
pub fn compile(config: &Config, opts: &CompileOptions, shell: &Shell) -> CompileOutcome {
    let plan = plan(config, opts);

    if !plan.platform.is_known() {
        shell.warn(format!(
            "no profile for platform `{}`; compiling without platform flags",
            plan.platform.as_str()
        ));
    }

    shell.status(Status::Detected, format!("platform {}", plan.platform));
    print_banner(shell, &plan);
    shell.json_event(&serde_json::json!({
        "reason": "compile-plan",
        "platform": plan.platform.as_str(),
        "command": plan.command.to_string(),
        "argv": plan.command.argv(),
        "dry_run": opts.dry_run,
    }));
    if shell.is_verbose() && opts.exec_mode == ExecMode::Direct {
        shell.note(format!(
            "arguments: {}",
            plan.command.expanded_argv().join(" ")
        ));
    }

    if opts.dry_run {
        shell.status(Status::Skipped, "execution (dry run)");
        return CompileOutcome { plan, result: None };
    }

    let span = shell.span(
        Status::Compiling,
        format!("{} ({})", plan.config.profile.output_name, plan.platform),
    );
    let result = Runner::new(opts.exec_mode).run(&plan.command);

    shell.json_event(&serde_json::json!({
        "reason": "compile-finished",
        "success": result.succeeded,
        "exit_code": result.exit_code,
        "failure": result.failure.as_ref().map(|f| f.to_string()),
    }));

    match result.failure {
        None => span.finish_with_message(&plan.config.profile.output_name),
        Some(ref failure) => {
            shell.error(failure);
            if let Some(help) = failure.help() {
                shell.note(help);
            }
        }
    }

    CompileOutcome {
        plan,
        result: Some(result),
    }
}

/// Print the human-readable explanation of the command to stdout.
pub fn print_banner(shell: &Shell, plan: &CompilePlan) {
    let profile = &plan.config.profile;
    let heading = format!(" Compiling on: {} ", plan.platform);

    shell.print_line(RULE);
    shell.print_line(format!("{:=^width$}", heading, width = RULE.len()));
    shell.print_line(RULE);
    shell.print_line("Below is the command buildline is running to compile your source code.");
    shell.print_line("\tNote: You could type this out yourself, or just run buildline again\n");
    shell.print_line(&plan.command);
    shell.print_line("");
    shell.print_line(
        "-I is the path to header files, or the directories in which .h and .hpp files are searched for.",
    );
    shell.print_line(format!("\t for example: {}\n", profile.include_flags));
    shell.print_line(
        "-l (lowercase L) names libraries that have already been compiled and are 'glued' into the program.",
    );
    shell.print_line("Note: on macOS libraries may instead be packaged as a 'framework' and linked with -F.");
    shell.print_line(format!("\t for example: {}\n", profile.library_flags));
    shell.print_line(RULE);
    shell.print_line(RULE);
}
