// crates/uek-audit-core/src/runtime/audit.rs
// ============================================================================
// Module: UEK Audit Logging
// Description: Structured audit events for probe execution and control results.
// Purpose: Emit JSON-line audit logs without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Audit events are serialized as one JSON object per line. Sinks write to
//! stderr, an append-only file, or nowhere. Report output never goes through a
//! sink, so stdout stays reserved for reports.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::identifiers::ControlId;
use crate::core::outcome::ControlOutcome;
use crate::core::outcome::ControlStatus;
use crate::core::probe::CommandResult;
use crate::interfaces::ExecError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Probe execution audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Control the probe ran for.
    pub control_id: ControlId,
    /// Command line executed.
    pub command: String,
    /// Exit status when the command completed.
    pub exit_status: Option<i32>,
    /// Error kind label when the command could not run.
    pub error_kind: Option<&'static str>,
    /// Captured stdout size in bytes.
    pub stdout_bytes: usize,
    /// Captured stderr size in bytes.
    pub stderr_bytes: usize,
}

impl ProbeAuditEvent {
    /// Builds an event from a probe execution result.
    #[must_use]
    pub fn new(
        control_id: &ControlId,
        command: &str,
        result: &Result<CommandResult, ExecError>,
    ) -> Self {
        let (exit_status, error_kind, stdout_bytes, stderr_bytes) = match result {
            Ok(output) => (Some(output.exit_status), None, output.stdout.len(), output.stderr.len()),
            Err(err) => (None, Some(err.kind()), 0, 0),
        };
        Self {
            event: "probe_executed",
            timestamp_ms: now_ms(),
            control_id: control_id.clone(),
            command: command.to_string(),
            exit_status,
            error_kind,
            stdout_bytes,
            stderr_bytes,
        }
    }
}

/// Control evaluation audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ControlAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Control identifier.
    pub control_id: ControlId,
    /// Aggregate control status.
    pub status: ControlStatus,
    /// Passed assertions.
    pub passed: usize,
    /// Failed assertions.
    pub failed: usize,
    /// Errored assertions.
    pub errored: usize,
}

impl ControlAuditEvent {
    /// Builds an event from a control outcome.
    #[must_use]
    pub fn new(outcome: &ControlOutcome) -> Self {
        let counts = outcome.counts();
        Self {
            event: "control_evaluated",
            timestamp_ms: now_ms(),
            control_id: outcome.control_id.clone(),
            status: outcome.status,
            passed: counts.passed,
            failed: counts.failed,
            errored: counts.errored,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for evaluation events.
pub trait AuditSink: Send + Sync {
    /// Records a probe execution event.
    fn record_probe(&self, event: &ProbeAuditEvent);

    /// Records a control evaluation event.
    fn record_control(&self, event: &ControlAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record_probe(&self, event: &ProbeAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_control(&self, event: &ControlAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends a serialized payload as one line.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record_probe(&self, event: &ProbeAuditEvent) {
        self.append(event);
    }

    fn record_control(&self, event: &ControlAuditEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_probe(&self, _event: &ProbeAuditEvent) {}

    fn record_control(&self, _event: &ControlAuditEvent) {}
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the current time in milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |duration| duration.as_millis())
}
