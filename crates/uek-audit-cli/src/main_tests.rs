// crates/uek-audit-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for argument mapping and report rendering.
// Purpose: Ensure text reports and CLI overrides render as expected.
// Dependencies: uek-audit-cli main helpers
// ============================================================================

//! ## Overview
//! Validates format and expectation overrides plus the text rendering of run
//! reports, host state reports, and the control catalog.

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

use clap::CommandFactory;
use uek_audit_config::ReportFormat;
use uek_audit_core::AssertionOutcome;
use uek_audit_core::AssertionStatus;
use uek_audit_core::ControlId;
use uek_audit_core::ControlOutcome;
use uek_audit_core::ExpectedState;
use uek_audit_core::HostStateReport;
use uek_audit_core::RunReport;
use uek_audit_core::builtin_controls;

use super::Cli;
use super::ExpectArg;
use super::FormatArg;
use super::expected_state_from_arg;
use super::render_controls_text;
use super::render_host_state_text;
use super::render_run_report_text;
use super::resolve_format;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn outcome(id: &str, statuses: Vec<AssertionStatus>) -> ControlOutcome {
    let assertions = statuses
        .into_iter()
        .enumerate()
        .map(|(index, status)| AssertionOutcome {
            description: format!("check {index}"),
            status,
        })
        .collect();
    ControlOutcome::from_assertions(ControlId::new(id), format!("{id} title"), assertions)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn format_flag_overrides_config() {
    assert_eq!(resolve_format(Some(FormatArg::Json), ReportFormat::Text), ReportFormat::Json);
    assert_eq!(resolve_format(Some(FormatArg::Text), ReportFormat::Json), ReportFormat::Text);
    assert_eq!(resolve_format(None, ReportFormat::Json), ReportFormat::Json);
}

#[test]
fn expect_arg_maps_to_expected_state() {
    assert_eq!(expected_state_from_arg(ExpectArg::Installed), ExpectedState::Installed);
    assert_eq!(expected_state_from_arg(ExpectArg::Absent), ExpectedState::Absent);
}

#[test]
fn run_report_text_lists_each_assertion() {
    let control = outcome(
        "uek-kernel-installed",
        vec![
            AssertionStatus::Passed,
            AssertionStatus::Failed {
                actual: "\"\"".to_string(),
            },
            AssertionStatus::Error {
                kind: "not_found".to_string(),
                message: "command not found: yum repolist".to_string(),
            },
        ],
    );
    let text = render_run_report_text(&RunReport::new("fixture", vec![control]));
    let expected = [
        "Target: fixture",
        "",
        "Control uek-kernel-installed: uek-kernel-installed title",
        "  [PASS] check 0",
        "  [FAIL] check 1 (actual: \"\")",
        "  [ERROR] check 2 (not_found: command not found: yum repolist)",
        "  Result: error (1 passed, 1 failed, 1 errored)",
        "",
        "Summary: 0 of 1 controls passed; status error.",
    ]
    .join("\n");
    assert_eq!(text, expected);
}

#[test]
fn host_state_text_names_state_and_both_controls() {
    let installed = outcome("uek-kernel-installed", vec![AssertionStatus::Passed]);
    let absent = outcome(
        "uek-kernel-not-installed",
        vec![AssertionStatus::Failed {
            actual: "exit status 0".to_string(),
        }],
    );
    let text = render_host_state_text(&HostStateReport::new("local (/bin/sh)", installed, absent));
    assert!(text.starts_with("Target: local (/bin/sh)\nHost state: installed\n"));
    assert!(text.contains("Control uek-kernel-installed:"));
    assert!(text.contains("Control uek-kernel-not-installed:"));
}

#[test]
fn controls_text_lists_check_descriptions() {
    let text = render_controls_text(&builtin_controls());
    assert!(text.contains("uek-kernel-installed  Check if UEK kernel is installed"));
    assert!(text.contains("  - Command: `yum repolist` stdout should match /UEK/"));
    assert!(text.contains("  - Command: `yum repolist` stdout should not match /UEK/"));
}
