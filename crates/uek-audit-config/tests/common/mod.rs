// crates/uek-audit-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for uek-audit-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use uek_audit_config::ConfigError;
use uek_audit_config::UekAuditConfig;

/// Parses and validates a TOML string.
pub fn config_from_toml(toml_str: &str) -> Result<UekAuditConfig, ConfigError> {
    UekAuditConfig::from_toml_str(toml_str)
}

/// Writes a config file into a fresh temp directory.
pub fn write_config(contents: &str) -> Result<(TempDir, PathBuf), String> {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("uek-audit.toml");
    fs::write(&path, contents).map_err(|err| err.to_string())?;
    Ok((dir, path))
}

/// Asserts that a result is an error whose message contains `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

/// A valid additional control over `uname -r`.
pub const RUNNING_KERNEL_CONTROL: &str = r#"
[[controls]]
id = "uek-running-kernel"
title = "Running kernel is a UEK build"

[[controls.checks]]
subject = "stdout"
probe = { kind = "command", command = "uname -r" }
matcher = { op = "contains", value = "uek" }
"#;
