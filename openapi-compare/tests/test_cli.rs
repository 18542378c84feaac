// Copyright 2025 Oxide Computer Company

//! Tests for the openapi-compare command.  The comparison itself is tested
//! more thoroughly in the library; these check what ends up on stdout and the
//! exit status.

use camino::Utf8Path;
use camino_tempfile::Utf8TempDir;
use expectorate::assert_contents;
use std::path::PathBuf;
use subprocess::{Exec, ExitStatus, NullFile, Redirection};

/// name of the "openapi-compare" executable
const CMD_OPENAPI_COMPARE: &str = env!("CARGO_BIN_EXE_openapi-compare");

const EXIT_SUCCESS: u32 = 0;
const EXIT_FAILURE: u32 = 1;
const EXIT_USAGE: u32 = 2;
const EXIT_DIFFERENCES: u32 = 4;

fn path_to_executable(cmd_name: &str) -> PathBuf {
    let mut rv = PathBuf::from(cmd_name);
    // Drop the ".exe" extension on Windows.  Otherwise, this appears in
    // stderr output, which then differs across platforms.
    rv.set_extension("");
    rv
}

fn data_file(name: &str) -> String {
    Utf8Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
        .into_string()
}

/// Run openapi-compare with `args`, returning the exit status, stdout and
/// stderr
fn run_compare(args: &[&str]) -> (ExitStatus, String, String) {
    let exec = Exec::cmd(path_to_executable(CMD_OPENAPI_COMPARE))
        .args(args)
        .env_remove("OPENAPI_COMPARE_CONFIG")
        .stdin(NullFile)
        .stdout(Redirection::Pipe)
        .stderr(Redirection::Pipe);
    let cmdline = exec.to_cmdline_lossy();
    let capture = exec.capture().expect("failed to run openapi-compare");
    let stdout = capture.stdout_str();
    let stderr = capture.stderr_str();
    println!("command: {}", cmdline);
    println!("stderr:\n------\n{}\n-----", stderr);
    (capture.exit_status, stdout, stderr)
}

fn assert_exit_code(exit_status: ExitStatus, code: u32, stderr_text: &str) {
    if let ExitStatus::Exited(exit_code) = exit_status {
        assert_eq!(exit_code, code, "stderr:\n{}", stderr_text);
    } else {
        panic!(
            "expected normal process exit with code {}, got {:?}",
            code, exit_status
        );
    }
}

#[test]
fn test_equivalent_across_mount_points() {
    let (exit_status, stdout_text, stderr_text) = run_compare(&[
        "--color",
        "never",
        &data_file("zaken-v1.yaml"),
        &data_file("zaken-v1-mounted.json"),
    ]);
    assert_exit_code(exit_status, EXIT_SUCCESS, &stderr_text);
    assert_contents("tests/output/equivalent.out", &stdout_text);
    assert!(stderr_text.contains("no differences found"));
}

#[test]
fn test_version_only() {
    let (exit_status, stdout_text, stderr_text) = run_compare(&[
        "--color",
        "never",
        &data_file("zaken-v1.yaml"),
        &data_file("zaken-v1.0.1.yaml"),
    ]);
    assert_exit_code(exit_status, EXIT_DIFFERENCES, &stderr_text);
    assert_contents("tests/output/version-only.out", &stdout_text);
    assert!(stderr_text.contains("1 problem found"));
}

#[test]
fn test_missing_operation() {
    let (exit_status, stdout_text, stderr_text) = run_compare(&[
        "--color",
        "never",
        &data_file("zaken-v1.yaml"),
        &data_file("zaken-v1-no-create.yaml"),
    ]);
    assert_exit_code(exit_status, EXIT_DIFFERENCES, &stderr_text);
    assert_contents("tests/output/missing-operation.out", &stdout_text);
}

#[test]
fn test_several_differences() {
    let spec1 = format!("file://{}", data_file("zaken-v1.yaml"));
    let (exit_status, stdout_text, stderr_text) = run_compare(&[
        "--color",
        "never",
        &spec1,
        &data_file("zaken-v2.yaml"),
    ]);
    assert_exit_code(exit_status, EXIT_DIFFERENCES, &stderr_text);
    assert_contents("tests/output/v1-v2.out", &stdout_text);
    assert!(stderr_text.contains("4 problems found"));
}

#[test]
fn test_exit_zero() {
    let (exit_status, stdout_text, stderr_text) = run_compare(&[
        "--exit-zero",
        &data_file("zaken-v1.yaml"),
        &data_file("zaken-v1.0.1.yaml"),
    ]);
    assert_exit_code(exit_status, EXIT_SUCCESS, &stderr_text);
    assert_contents("tests/output/version-only.out", &stdout_text);
}

#[test]
fn test_config_file() {
    let dir = Utf8TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    let log_path = dir.path().join("compare.log");
    std::fs::write(
        &config_path,
        format!(
            "[log]\n\
             mode = \"file\"\n\
             level = \"debug\"\n\
             path = \"{log_path}\"\n\
             if_exists = \"truncate\"\n\
             \n\
             [compare]\n\
             exit_zero = true\n"
        ),
    )
    .unwrap();

    let (exit_status, stdout_text, stderr_text) = run_compare(&[
        "--config",
        config_path.as_str(),
        &data_file("zaken-v1.yaml"),
        &data_file("zaken-v1-no-create.yaml"),
    ]);
    assert_exit_code(exit_status, EXIT_SUCCESS, &stderr_text);
    assert_contents("tests/output/missing-operation.out", &stdout_text);
    assert!(stderr_text
        .contains(&format!("configured to log to \"{log_path}\"")));

    let log_text = std::fs::read_to_string(&log_path).unwrap();
    assert!(log_text.contains("loaded OpenAPI document"));
    assert!(log_text.contains("ran comparator"));
}

#[test]
fn test_bad_config_file() {
    let dir = Utf8TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(&config_path, "[compare]\nexit_zero = \"yes\"\n").unwrap();

    let (exit_status, stdout_text, stderr_text) = run_compare(&[
        "--config",
        config_path.as_str(),
        &data_file("zaken-v1.yaml"),
        &data_file("zaken-v1.yaml"),
    ]);
    assert_exit_code(exit_status, EXIT_FAILURE, &stderr_text);
    assert!(stdout_text.is_empty());
    assert!(stderr_text.starts_with(&format!(
        "failure: failed to parse config file {config_path}"
    )));
}

#[test]
fn test_load_failures() {
    let missing = data_file("missing.yaml");
    let (exit_status, stdout_text, stderr_text) =
        run_compare(&[&data_file("zaken-v1.yaml"), &missing]);
    assert_exit_code(exit_status, EXIT_FAILURE, &stderr_text);
    assert!(stdout_text.is_empty());
    assert!(stderr_text.starts_with(&format!(
        "failure: loading specification 2 ({missing}): failed to read {missing}"
    )));

    let (exit_status, _, stderr_text) = run_compare(&[
        "https://example.com/zaken.yaml",
        &data_file("zaken-v1.yaml"),
    ]);
    assert_exit_code(exit_status, EXIT_FAILURE, &stderr_text);
    assert!(stderr_text.contains("unsupported URI scheme \"https\""));
}

#[test]
fn test_invalid_document() {
    let (exit_status, stdout_text, stderr_text) = run_compare(&[
        "--color",
        "never",
        &data_file("path-reference.yaml"),
        &data_file("zaken-v1.yaml"),
    ]);
    assert_exit_code(exit_status, EXIT_FAILURE, &stderr_text);
    assert!(stdout_text.is_empty());
    assert!(stderr_text.contains(
        "path \"/zaken\" is a reference \
         (\"#/components/pathItems/zaken\"), which is not supported"
    ));
    assert!(stderr_text.contains("failure: bailing out after 1 error above"));
}

#[test]
fn test_bad_args() {
    let (exit_status, stdout_text, stderr_text) =
        run_compare(&[&data_file("zaken-v1.yaml")]);
    assert_exit_code(exit_status, EXIT_USAGE, &stderr_text);
    assert!(stdout_text.is_empty());
    assert!(stderr_text.contains("<SPEC2>"));
}
