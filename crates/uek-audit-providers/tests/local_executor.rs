// crates/uek-audit-providers/tests/local_executor.rs
// ============================================================================
// Module: Local Shell Executor Tests
// Description: Runs real commands through the local POSIX shell.
// Purpose: Validate exit status handling, pipelines, and execution errors.
// Dependencies: uek-audit-providers, uek-audit-core
// ============================================================================

//! ## Overview
//! Tests the local executor for:
//! - Happy path: stdout capture and ordinary exit statuses
//! - Pipelines: exit status of the last stage, as with `rpm -qa | grep -i uek`
//! - Error handling: missing commands, missing shells, oversized output
//! - Output limits: endless streams are cut off instead of buffered

#![cfg(unix)]
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

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use uek_audit_core::CommandExecutor;
use uek_audit_core::CommandResult;
use uek_audit_core::DEFAULT_MAX_OUTPUT_BYTES;
use uek_audit_core::ExecError;
use uek_audit_providers::LocalShellConfig;
use uek_audit_providers::LocalShellExecutor;

// ============================================================================
// SECTION: Happy Path Tests
// ============================================================================

/// Tests that stdout and exit status are captured.
#[test]
fn local_executor_captures_stdout() {
    let executor = LocalShellExecutor::new(LocalShellConfig::default());
    let result = executor.execute("echo UEK-repo enabled").unwrap();
    assert_eq!(result.stdout, "UEK-repo enabled\n");
    assert_eq!(result.exit_status, 0);
    assert_eq!(result.command, "echo UEK-repo enabled");
}

/// Tests that non-zero exit statuses are results, not errors.
#[test]
fn local_executor_reports_nonzero_exit_as_result() {
    let executor = LocalShellExecutor::new(LocalShellConfig::default());
    let result = executor.execute("echo oops >&2; exit 3").unwrap();
    assert_eq!(result.exit_status, 3);
    assert_eq!(result.stderr, "oops\n");
}

/// Tests that a pipeline reports the exit status of grep.
#[test]
fn local_executor_pipeline_uses_last_stage_status() {
    let executor = LocalShellExecutor::new(LocalShellConfig::default());
    let miss = executor.execute("printf 'bash\\nkernel\\n' | grep -i uek").unwrap();
    assert_eq!(miss.exit_status, 1);
    let hit = executor.execute("printf 'kernel-UEK-5.15\\n' | grep -i uek").unwrap();
    assert_eq!(hit.exit_status, 0);
    assert_eq!(hit.stdout, "kernel-UEK-5.15\n");
}

// ============================================================================
// SECTION: Error Handling Tests
// ============================================================================

/// Tests that a missing command is an execution error.
#[test]
fn local_executor_missing_command_is_not_found() {
    let executor = LocalShellExecutor::new(LocalShellConfig::default());
    let err = executor.execute("uek-audit-definitely-missing-binary --version").unwrap_err();
    assert!(matches!(err, ExecError::NotFound { .. }));
}

/// Tests that a missing shell fails to spawn as not found.
#[test]
fn local_executor_missing_shell_is_not_found() {
    let executor = LocalShellExecutor::new(LocalShellConfig {
        shell: PathBuf::from("/nonexistent/uek-audit/sh"),
        ..LocalShellConfig::default()
    });
    let err = executor.execute("true").unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

/// Tests that output beyond the limit is rejected.
#[test]
fn local_executor_enforces_output_limit() {
    let executor = LocalShellExecutor::new(LocalShellConfig {
        max_output_bytes: 8,
        ..LocalShellConfig::default()
    });
    let err = executor.execute("echo 0123456789").unwrap_err();
    assert_eq!(
        err,
        ExecError::OutputTooLarge {
            command: "echo 0123456789".to_string(),
            limit: 8,
        }
    );
}

/// Runs `command` on a worker thread and waits at most `limit` for it.
fn execute_within(
    config: LocalShellConfig,
    command: &'static str,
    limit: Duration,
) -> Result<CommandResult, ExecError> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let executor = LocalShellExecutor::new(config);
        let _ = sender.send(executor.execute(command));
    });
    receiver.recv_timeout(limit).expect("executor did not return after exceeding its output limit")
}

/// Tests that an endless stdout stream is cut off at the limit.
#[test]
fn local_executor_stops_endless_stdout_at_limit() {
    let config = LocalShellConfig {
        max_output_bytes: 1024,
        ..LocalShellConfig::default()
    };
    let err = execute_within(config, "yes", Duration::from_secs(10)).unwrap_err();
    assert_eq!(
        err,
        ExecError::OutputTooLarge {
            command: "yes".to_string(),
            limit: 1024,
        }
    );
}

/// Tests that an endless stderr stream is cut off at the limit.
#[test]
fn local_executor_stops_endless_stderr_at_limit() {
    let config = LocalShellConfig {
        max_output_bytes: 1024,
        ..LocalShellConfig::default()
    };
    let err = execute_within(config, "yes >&2", Duration::from_secs(10)).unwrap_err();
    assert_eq!(err.kind(), "output_too_large");
}

/// Tests that output exactly at the limit is kept.
#[test]
fn local_executor_keeps_output_at_limit() {
    let executor = LocalShellExecutor::new(LocalShellConfig {
        max_output_bytes: 8,
        ..LocalShellConfig::default()
    });
    let result = executor.execute("printf 01234567").unwrap();
    assert_eq!(result.stdout, "01234567");
}

/// Tests that the default limit is shared with the core crate.
#[test]
fn local_executor_default_limit_matches_core() {
    assert_eq!(LocalShellConfig::default().max_output_bytes, DEFAULT_MAX_OUTPUT_BYTES);
}

/// Tests the target label.
#[test]
fn local_executor_labels_target_with_shell() {
    let executor = LocalShellExecutor::new(LocalShellConfig::default());
    assert_eq!(executor.target_label(), "local (/bin/sh)");
}
