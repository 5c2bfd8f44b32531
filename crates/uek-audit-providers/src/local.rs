// crates/uek-audit-providers/src/local.rs
// ============================================================================
// Module: Local Shell Executor
// Description: Command executor backed by a local POSIX shell.
// Purpose: Inspect the host the audit runs on.
// Dependencies: uek-audit-core
// ============================================================================

//! ## Overview
//! Commands run as `<shell> -c <command>` with stdin closed, so pipelines such
//! as `rpm -qa | grep -i uek` behave as they would in an interactive shell and
//! report the exit status of the last pipeline stage.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::process::Command;

use uek_audit_core::CommandExecutor;
use uek_audit_core::CommandResult;
use uek_audit_core::DEFAULT_MAX_OUTPUT_BYTES;
use uek_audit_core::ExecError;

use crate::output::run_bounded;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the local shell executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalShellConfig {
    /// Shell used to interpret commands.
    pub shell: PathBuf,
    /// Maximum captured bytes per stream.
    pub max_output_bytes: usize,
}

impl Default for LocalShellConfig {
    fn default() -> Self {
        Self {
            shell: PathBuf::from("/bin/sh"),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

// ============================================================================
// SECTION: Executor
// ============================================================================

/// Executor running commands through a local shell.
pub struct LocalShellExecutor {
    /// Executor configuration.
    config: LocalShellConfig,
}

impl LocalShellExecutor {
    /// Creates a local executor.
    #[must_use]
    pub const fn new(config: LocalShellConfig) -> Self {
        Self {
            config,
        }
    }
}

impl CommandExecutor for LocalShellExecutor {
    fn execute(&self, command: &str) -> Result<CommandResult, ExecError> {
        let mut process = Command::new(&self.config.shell);
        process.arg("-c").arg(command);
        run_bounded(command, &mut process, self.config.max_output_bytes)?.into_result(command)
    }

    fn target_label(&self) -> String {
        format!("local ({})", self.config.shell.display())
    }
}
