// crates/uek-audit-cli/tests/config_commands.rs
// ============================================================================
// Module: CLI Config and Catalog Command Tests
// Description: Integration tests for config validation and control listing.
// Purpose: Ensure config validation fails closed and extra controls are listed.
// Dependencies: uek-audit-cli binary, serde_json
// ============================================================================

//! ## Overview
//! Runs the CLI binary for `config validate`, `controls list`, and `--version`.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

mod common;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

const EXTRA_CONTROL: &str = r#"
[[controls]]
id = "uek-running-kernel"
title = "Running kernel is a UEK build"

[[controls.checks]]
subject = "stdout"
probe = { kind = "command", command = "uname -r" }
matcher = { op = "contains", value = "uek" }
"#;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Verifies validation without any config file reports defaults.
#[test]
fn config_validate_without_file_uses_defaults() {
    let root = common::temp_root("config-defaults");
    let output = common::run_in(&root, &["config", "validate"]);

    assert!(output.status.success());
    let stdout = common::stdout(&output);
    assert!(stdout.contains("Config valid."));
    assert!(stdout.contains("built-in defaults"));
    assert!(stdout.contains("Transport: local"));
    assert!(stdout.contains("Controls: 2"));
    common::cleanup(&root);
}

/// Verifies an explicit config file is loaded and reported.
#[test]
fn config_validate_accepts_valid_config() {
    let root = common::temp_root("config-valid");
    let path = common::write_file(&root, "audit.toml", EXTRA_CONTROL);
    let output = common::run_in(&root, &["--config", path.to_string_lossy().as_ref(), "config", "validate"]);

    assert!(output.status.success(), "stderr: {}", common::stderr(&output));
    let stdout = common::stdout(&output);
    assert!(stdout.contains("audit.toml"));
    assert!(stdout.contains("Controls: 3"));
    common::cleanup(&root);
}

/// Verifies invalid config fails closed with exit code 2.
#[test]
fn config_validate_rejects_invalid_config() {
    let root = common::temp_root("config-invalid");
    common::write_file(&root, "uek-audit.toml", "[target]\ntransport = \"ssh\"\n");
    let output = common::run_in(&root, &["config", "validate"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = common::stderr(&output);
    assert!(stderr.contains("Failed to load config"));
    assert!(stderr.contains("target.transport=ssh requires [target.ssh]"));
    common::cleanup(&root);
}

/// Verifies a missing explicit config path fails closed.
#[test]
fn config_missing_explicit_path_fails() {
    let root = common::temp_root("config-missing");
    let missing = root.join("missing.toml");
    let output = common::run_in(&root, &["--config", missing.to_string_lossy().as_ref(), "status"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(common::stderr(&output).contains("config io error"));
    common::cleanup(&root);
}

/// Verifies the environment override is honored.
#[test]
fn config_environment_override_is_used() {
    let root = common::temp_root("config-env");
    let path = common::write_file(&root, "from-env.toml", "[report]\nformat = \"yaml\"\n");
    let output = std::process::Command::new(common::uek_audit_bin())
        .args(["config", "validate"])
        .current_dir(&root)
        .env("UEK_AUDIT_CONFIG", &path)
        .output()
        .expect("run uek-audit");

    assert_eq!(output.status.code(), Some(2));
    assert!(common::stderr(&output).contains("config parse error"));
    common::cleanup(&root);
}

/// Verifies the control catalog includes configured controls.
#[test]
fn controls_list_includes_extra_controls() {
    let root = common::temp_root("controls-list");
    common::write_file(&root, "uek-audit.toml", EXTRA_CONTROL);
    let output = common::run_in(&root, &["controls", "list"]);

    assert!(output.status.success());
    let stdout = common::stdout(&output);
    assert!(stdout.contains("uek-kernel-installed  Check if UEK kernel is installed"));
    assert!(stdout.contains("uek-kernel-not-installed  Check if UEK kernel is not installed"));
    assert!(stdout.contains("uek-running-kernel  Running kernel is a UEK build"));
    assert!(stdout.contains("  - Command: `uname -r` stdout should match /uek/"));
    common::cleanup(&root);
}

/// Verifies the JSON control catalog.
#[test]
fn controls_list_json_is_canonical() {
    let root = common::temp_root("controls-json");
    let output = common::run_in(&root, &["controls", "list", "--format", "json"]);

    assert!(output.status.success());
    let controls: Value = serde_json::from_slice(&output.stdout).expect("json catalog");
    let controls = controls.as_array().expect("array");
    assert_eq!(controls.len(), 2);
    assert_eq!(controls[0]["id"], "uek-kernel-installed");
    assert_eq!(controls[0]["checks"][0]["probe"]["kind"], "packages");
    common::cleanup(&root);
}

/// Verifies the version flag.
#[test]
fn version_flag_prints_version() {
    let root = common::temp_root("version");
    let output = common::run_in(&root, &["--version"]);

    assert!(output.status.success());
    assert_eq!(common::stdout(&output).trim(), format!("uek-audit {}", env!("CARGO_PKG_VERSION")));
    common::cleanup(&root);
}
