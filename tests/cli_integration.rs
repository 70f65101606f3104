//! CLI integration tests for buildline.
//!
//! These tests drive the binary end to end: platform selection, command
//! composition, configuration files, execution and exit codes.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the buildline binary command, isolated from the caller's environment.
fn buildline() -> Command {
    let mut cmd = Command::cargo_bin("buildline").unwrap();
    cmd.env_remove("BUILDLINE_COMPILER");
    cmd
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

const LINUX_COMMAND: &str =
    "g++ -g -std=c++17 -D LINUX ./src/*.cpp -o prog  -I ./include/ -I ./include/glm -lSDL2 -ldl -lglfw";

// ============================================================================
// composition
// ============================================================================

#[test]
fn test_dry_run_prints_linux_command() {
    let tmp = temp_dir();

    buildline()
        .args([
            "--dry-run",
            "--platform",
            "linux",
            "--compiler",
            "g++ -g -std=c++17",
            "--source",
            "./src/*.cpp",
        ])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(LINUX_COMMAND))
        .stdout(predicate::str::contains("Compiling on: Linux"));
}

#[test]
fn test_dry_run_windows_profile() {
    let tmp = temp_dir();

    buildline()
        .args(["--dry-run", "--platform", "windows"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "-D MINGW -static-libgcc -static-libstdc++ ./src/*.cpp",
        ))
        .stdout(predicate::str::contains(
            "-o prog.exe  -I./include/ -I./include/glm -I./include/glfw -lmingw32 -lSDL2main -lSDL2",
        ));
}

#[test]
fn test_dry_run_macos_profile_has_no_mingw_flags() {
    let tmp = temp_dir();

    buildline()
        .args(["--dry-run", "--platform", "macos"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("-D MAC"))
        .stdout(predicate::str::contains("-framework SDL2"))
        .stdout(predicate::str::contains("MinGW").not())
        .stdout(predicate::str::contains("-lmingw32").not());
}

#[test]
fn test_unknown_platform_degrades_to_empty_profile() {
    let tmp = temp_dir();

    buildline()
        .args([
            "--dry-run",
            "--platform",
            "unknown",
            "--compiler",
            "c++",
            "--source",
            "main.cpp",
        ])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("c++  main.cpp -o"))
        .stderr(predicate::str::contains("no profile for platform `unknown`"));
}

#[test]
fn test_unknown_platform_warns_once_naming_selection() {
    let tmp = temp_dir();

    let output = buildline()
        .args(["--dry-run", "--platform", "unknown"])
        .current_dir(tmp.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.matches("no profile for platform").count(), 1);
    assert!(!stderr.contains(&format!("`{}`", std::env::consts::OS)));
}

#[test]
fn test_invalid_platform_is_rejected() {
    buildline()
        .args(["--dry-run", "--platform", "plan9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid platform"));
}

#[test]
fn test_quiet_suppresses_banner() {
    let tmp = temp_dir();

    buildline()
        .args(["--dry-run", "--quiet", "--platform", "linux"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_verbose_direct_mode_lists_arguments() {
    let tmp = temp_dir();

    buildline()
        .args([
            "--dry-run",
            "--verbose",
            "--no-shell",
            "--platform",
            "unknown",
            "--compiler",
            "cc",
            "--source",
            "main.cpp",
        ])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("arguments: cc main.cpp -o"));
}

#[test]
fn test_json_message_format() {
    let tmp = temp_dir();

    let output = buildline()
        .args([
            "--dry-run",
            "--message-format",
            "json",
            "--platform",
            "linux",
            "--source",
            "./src/*.cpp",
        ])
        .current_dir(tmp.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let event: serde_json::Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(event["reason"], "compile-plan");
    assert_eq!(event["platform"], "linux");
    assert_eq!(event["command"], LINUX_COMMAND);
    assert_eq!(event["argv"][0], "g++");
}

// ============================================================================
// configuration
// ============================================================================

#[test]
fn test_project_config_is_applied() {
    let tmp = temp_dir();
    fs::write(
        tmp.path().join("buildline.toml"),
        r#"
[build]
compiler = "clang++ -std=c++20"
sources = ["./game/*.cpp"]
executable = "game"

[profile.linux]
libraries = "-lSDL2"
"#,
    )
    .unwrap();

    buildline()
        .args(["--dry-run", "--platform", "linux"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "clang++ -std=c++20 -D LINUX ./game/*.cpp -o game  -I ./include/ -I ./include/glm -lSDL2",
        ));
}

#[test]
fn test_cli_flags_override_config() {
    let tmp = temp_dir();
    fs::write(
        tmp.path().join("buildline.toml"),
        "[build]\ncompiler = \"clang++\"\nexecutable = \"game\"\n",
    )
    .unwrap();

    buildline()
        .args([
            "--dry-run",
            "--platform",
            "linux",
            "--compiler",
            "g++-13",
            "--output",
            "demo",
        ])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("g++-13 -D LINUX"))
        .stdout(predicate::str::contains("-o demo  "));
}

#[test]
fn test_malformed_project_config_is_ignored() {
    let tmp = temp_dir();
    fs::write(tmp.path().join("buildline.toml"), "[build\ncompiler =").unwrap();

    buildline()
        .args(["--dry-run", "--platform", "linux"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("g++ -g -std=c++17 -D LINUX"));
}

#[test]
fn test_explicit_config_must_exist() {
    let tmp = temp_dir();

    buildline()
        .args(["--dry-run", "--config", "missing.toml"])
        .current_dir(tmp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read config file"));
}

// ============================================================================
// execution
// ============================================================================

#[cfg(unix)]
#[test]
fn test_successful_compile_exits_zero() {
    let tmp = temp_dir();

    buildline()
        .args(["--platform", "linux", "--compiler", "true"])
        .current_dir(tmp.path())
        .assert()
        .code(0)
        .stderr(predicate::str::contains("Finished"));
}

#[cfg(unix)]
#[test]
fn test_failed_compile_exits_one() {
    let tmp = temp_dir();

    buildline()
        .args(["--platform", "linux", "--compiler", "sh -c 'exit 2'"])
        .current_dir(tmp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("compilation failed (exit code 2)"));
}

#[cfg(unix)]
#[test]
fn test_missing_compiler_exits_one() {
    let tmp = temp_dir();

    buildline()
        .args(["--platform", "linux", "--compiler", "buildline-no-such-compiler-xyz"])
        .current_dir(tmp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not run `buildline-no-such-compiler-xyz`"))
        .stderr(predicate::str::contains("compilation failed").not());
}

#[test]
fn test_missing_compiler_without_shell_exits_one() {
    let tmp = temp_dir();

    buildline()
        .args([
            "--no-shell",
            "--platform",
            "linux",
            "--compiler",
            "buildline-no-such-compiler-xyz",
        ])
        .current_dir(tmp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not run `buildline-no-such-compiler-xyz`"));
}

#[cfg(unix)]
#[test]
fn test_shell_expands_source_globs() {
    let tmp = temp_dir();
    fs::create_dir(tmp.path().join("src")).unwrap();
    fs::write(tmp.path().join("src/main.cpp"), "").unwrap();

    // Succeeds only if the glob was expanded to an existing file
    buildline()
        .args([
            "--quiet",
            "--platform",
            "unknown",
            "--compiler",
            "sh -c 'test -f \"$1\"' check-source",
            "--source",
            "./src/*.cpp",
        ])
        .current_dir(tmp.path())
        .assert()
        .code(0);
}

#[cfg(unix)]
#[test]
fn test_repeated_runs_agree() {
    let tmp = temp_dir();

    for _ in 0..2 {
        buildline()
            .args(["--quiet", "--platform", "linux", "--compiler", "false"])
            .current_dir(tmp.path())
            .assert()
            .code(1);
    }
}
