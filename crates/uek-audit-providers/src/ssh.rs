// crates/uek-audit-providers/src/ssh.rs
// ============================================================================
// Module: SSH Executor
// Description: Command executor backed by the OpenSSH client.
// Purpose: Inspect a remote host over a non-interactive ssh session.
// Dependencies: uek-audit-core
// ============================================================================

//! ## Overview
//! Commands are handed to the remote login shell through
//! `ssh -o BatchMode=yes [-p port] [-i identity] [-o opt]... [user@]host -- cmd`.
//! `BatchMode` prevents password prompts from blocking a run. The client
//! reports 255 for its own failures; that is mapped to a transport error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use uek_audit_core::CommandExecutor;
use uek_audit_core::CommandResult;
use uek_audit_core::DEFAULT_MAX_OUTPUT_BYTES;
use uek_audit_core::ExecError;

use crate::output::run_bounded;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Exit status reported by the ssh client for connection errors.
const SSH_TRANSPORT_FAILURE: i32 = 255;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the ssh executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshConfig {
    /// Remote host name or address.
    pub host: String,
    /// Optional remote user.
    pub user: Option<String>,
    /// Optional remote port.
    pub port: Option<u16>,
    /// Optional identity file.
    pub identity_file: Option<PathBuf>,
    /// Extra `-o` options passed to the client.
    pub options: Vec<String>,
    /// ssh client program.
    pub program: PathBuf,
    /// Maximum captured bytes per stream.
    pub max_output_bytes: usize,
}

impl SshConfig {
    /// Creates a configuration for `host` with client defaults.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: None,
            port: None,
            identity_file: None,
            options: Vec::new(),
            program: PathBuf::from("ssh"),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }

    /// Returns the `[user@]host` destination.
    #[must_use]
    pub fn destination(&self) -> String {
        self.user.as_ref().map_or_else(|| self.host.clone(), |user| format!("{user}@{}", self.host))
    }
}

// ============================================================================
// SECTION: Executor
// ============================================================================

/// Executor running commands on a remote host through ssh.
pub struct SshExecutor {
    /// Executor configuration.
    config: SshConfig,
}

impl SshExecutor {
    /// Creates an ssh executor.
    #[must_use]
    pub const fn new(config: SshConfig) -> Self {
        Self {
            config,
        }
    }

    /// Builds the ssh client argument list for a command.
    #[must_use]
    pub fn client_args(&self, command: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-o".into(), "BatchMode=yes".into()];
        if let Some(port) = self.config.port {
            args.push("-p".into());
            args.push(port.to_string().into());
        }
        if let Some(identity) = &self.config.identity_file {
            args.push("-i".into());
            args.push(identity.as_os_str().to_os_string());
        }
        for option in &self.config.options {
            args.push("-o".into());
            args.push(option.into());
        }
        args.push(self.config.destination().into());
        args.push("--".into());
        args.push(command.into());
        args
    }
}

impl CommandExecutor for SshExecutor {
    fn execute(&self, command: &str) -> Result<CommandResult, ExecError> {
        let mut process = Command::new(&self.config.program);
        process.args(self.client_args(command));
        let captured = run_bounded(command, &mut process, self.config.max_output_bytes)?;
        if captured.code == Some(SSH_TRANSPORT_FAILURE) {
            return Err(ExecError::Transport {
                command: command.to_string(),
                message: String::from_utf8_lossy(&captured.stderr).trim().to_string(),
            });
        }
        captured.into_result(command)
    }

    fn target_label(&self) -> String {
        format!("ssh ({})", self.config.destination())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
