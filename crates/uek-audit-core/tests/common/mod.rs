// crates/uek-audit-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Scripted executors and recording sinks for evaluator tests.
// Purpose: Provide deterministic host snapshots without touching the real host.
// Dependencies: uek-audit-core
// ============================================================================

//! ## Overview
//! Shared helpers that model a host as a table of command responses, plus an
//! audit sink that captures events for inspection.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::Mutex;

use uek_audit_core::AuditSink;
use uek_audit_core::CommandExecutor;
use uek_audit_core::CommandResult;
use uek_audit_core::ControlAuditEvent;
use uek_audit_core::ExecError;
use uek_audit_core::PACKAGE_QUERY_COMMAND;
use uek_audit_core::ProbeAuditEvent;
use uek_audit_core::REPOLIST_COMMAND;
use uek_audit_core::RPM_GREP_COMMAND;

// ============================================================================
// SECTION: Scripted Executor
// ============================================================================

/// Executor answering commands from an in-memory table.
#[derive(Default)]
pub struct ScriptedExecutor {
    responses: BTreeMap<String, Result<CommandResult, ExecError>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn respond(mut self, command: &str, stdout: &str, exit_status: i32) -> Self {
        self.responses
            .insert(command.to_string(), Ok(CommandResult::new(command, stdout, exit_status)));
        self
    }

    pub fn fail(mut self, command: &str, error: ExecError) -> Self {
        self.responses.insert(command.to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn execute(&self, command: &str) -> Result<CommandResult, ExecError> {
        self.calls.borrow_mut().push(command.to_string());
        self.responses.get(command).cloned().unwrap_or_else(|| {
            Err(ExecError::NotFound {
                command: command.to_string(),
            })
        })
    }

    fn target_label(&self) -> String {
        "scripted".to_string()
    }
}

// ============================================================================
// SECTION: Host Snapshots
// ============================================================================

/// Host with UEK installed and the UEK repository enabled.
pub fn uek_host() -> ScriptedExecutor {
    ScriptedExecutor::default()
        .respond(
            PACKAGE_QUERY_COMMAND,
            "bash\t5.1.8-6.el9\nkernel-uek\t5.15.0-200.131.27.el9uek\nkernel-uek-core\t5.15.0-200.\
             131.27.el9uek\n",
            0,
        )
        .respond(
            REPOLIST_COMMAND,
            "repo id          repo name\nol9_UEKR7        Oracle Linux 9 UEK Release 7 (x86_64)\n",
            0,
        )
        .respond(RPM_GREP_COMMAND, "kernel-uek-5.15.0-200.131.27.el9uek.x86_64\n", 0)
}

/// Host without UEK packages or repositories.
pub fn rhck_host() -> ScriptedExecutor {
    ScriptedExecutor::default()
        .respond(PACKAGE_QUERY_COMMAND, "bash\t5.1.8-6.el9\nkernel\t5.14.0-362.8.1.el9_3\n", 0)
        .respond(
            REPOLIST_COMMAND,
            "repo id          repo name\nol9_baseos_latest  Oracle Linux 9 BaseOS Latest (x86_64)\n",
            0,
        )
        .respond(RPM_GREP_COMMAND, "", 1)
}

// ============================================================================
// SECTION: Recording Sink
// ============================================================================

/// Audit sink capturing event names and subjects.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl AuditSink for RecordingSink {
    fn record_probe(&self, event: &ProbeAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(format!("{}:{}", event.event, event.command));
        }
    }

    fn record_control(&self, event: &ControlAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(format!("{}:{}:{}", event.event, event.control_id, event.status.as_str()));
        }
    }
}
