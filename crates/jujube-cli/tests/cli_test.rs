//! Integration tests for the `jujube` CLI binary.
//!
//! These validate argument parsing, help output, shell completions, and
//! error handling — all without requiring a live Juju controller.
#![allow(clippy::unwrap_used)]

use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `jujube` binary with env isolation.
///
/// Clears all `JUJUBE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real settings.
fn jujube_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("jujube").unwrap();
    cmd.env("HOME", "/tmp/jujube-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/jujube-cli-test-nonexistent")
        .env_remove("JUJUBE_MODEL")
        .env_remove("JUJUBE_OUTPUT")
        .env_remove("JUJUBE_TIMEOUT")
        .env_remove("JUJUBE_RETRY_DELAY_MS")
        .env_remove("JUJUBE_JUJU_COMMAND")
        .env_remove("JUJUBE_DEFAULTS__MODEL")
        .env_remove("JUJUBE_DEFAULTS__OUTPUT")
        .env_remove("JUJUBE_JUJU__COMMAND")
        .env_remove("NO_COLOR");
    cmd
}

/// Concatenate stdout + stderr for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

const MODEL_UUID: &str = "f72ef260-3f4d-4f29-8e2a-32fc2bbfea60";

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = jujube_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    jujube_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Juju")
            .and(predicate::str::contains("app-config"))
            .and(predicate::str::contains("controller"))
            .and(predicate::str::contains("completions")),
    );
}

#[test]
fn test_version_flag() {
    jujube_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jujube"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    jujube_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    jujube_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    jujube_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = jujube_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_app_config_without_model_is_usage_error() {
    let output = jujube_cmd()
        .args(["app-config", "tiny-bash"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("model") || text.contains("Model"),
        "Expected error mentioning the missing model:\n{text}"
    );
}

#[test]
fn test_app_config_rejects_non_uuid_model() {
    let output = jujube_cmd()
        .args(["app-config", "tiny-bash", "--model", "not-a-uuid"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("model"),
        "Expected error mentioning the model value:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = jujube_cmd()
        .args(["--output", "sparkles", "controller"])
        .output()
        .unwrap();

    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

// ── Credential loading failures (fatal, not logged-and-continued) ──

#[test]
fn test_missing_juju_binary_is_fatal() {
    let output = jujube_cmd()
        .args([
            "app-config",
            "tiny-bash",
            "--model",
            MODEL_UUID,
            "--juju-command",
            "/nonexistent/path/to/juju",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(5), "Expected external-tool exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("juju"),
        "Expected diagnostic mentioning juju:\n{text}"
    );
}

#[test]
fn test_controller_with_missing_juju_binary() {
    jujube_cmd()
        .args(["controller", "--juju-command", "/nonexistent/path/to/juju"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("juju"));
}

// ── End-to-end against a stub juju (unix shell scripts) ─────────────

#[cfg(unix)]
mod with_stub_juju {
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    use super::*;

    fn stub_juju(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("juju");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[test]
    fn failing_juju_maps_to_external_tool_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let juju = stub_juju(&dir, "echo 'ERROR no controllers registered' >&2\nexit 1");

        let output = jujube_cmd()
            .args(["app-config", "tiny-bash", "--model", MODEL_UUID])
            .arg("--juju-command")
            .arg(&juju)
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(5));
    }

    #[test]
    fn garbage_juju_output_maps_to_external_tool_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let juju = stub_juju(&dir, "echo 'not json'");

        let output = jujube_cmd()
            .args(["app-config", "tiny-bash", "--model", MODEL_UUID])
            .arg("--juju-command")
            .arg(&juju)
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(5));
        let text = combined_output(&output);
        assert!(
            text.contains("parse") || text.contains("output"),
            "Expected a parse diagnostic:\n{text}"
        );
    }

    #[test]
    fn controller_renders_stub_credentials_without_password() {
        let dir = tempfile::tempdir().unwrap();
        let juju = stub_juju(
            &dir,
            concat!(
                "cat <<'EOF'\n",
                r#"{"ctl1":{"details":{"ca-cert":"CERT","api-endpoints":["10.0.0.1:17070"],"cloud":"localhost","region":"default"},"account":{"user":"admin","password":"sekrit","access":"superuser"}}}"#,
                "\nEOF",
            ),
        );

        let output = jujube_cmd()
            .args(["controller", "--output", "json"])
            .arg("--juju-command")
            .arg(&juju)
            .output()
            .unwrap();

        assert!(output.status.success(), "controller command should succeed");
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("ctl1"));
        assert!(stdout.contains("10.0.0.1:17070"));
        assert!(
            !stdout.contains("sekrit"),
            "password must never be printed:\n{stdout}"
        );
    }

    #[test]
    fn unreachable_controller_times_out_with_timeout_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        // Credentials load fine; the dial then sweeps a refused port
        // until the (tight) deadline trips.
        let juju = stub_juju(
            &dir,
            concat!(
                "cat <<'EOF'\n",
                r#"{"ctl1":{"details":{"ca-cert":"","api-endpoints":["127.0.0.1:1"]},"account":{"user":"admin","password":"secret"}}}"#,
                "\nEOF",
            ),
        );

        let output = jujube_cmd()
            .args([
                "app-config",
                "tiny-bash",
                "--model",
                MODEL_UUID,
                "--timeout",
                "1",
                "--retry-delay-ms",
                "50",
            ])
            .arg("--juju-command")
            .arg(&juju)
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(8), "Expected timeout exit code");
        let text = combined_output(&output);
        assert!(
            text.contains("timed out"),
            "Expected timeout diagnostic:\n{text}"
        );
    }
}
