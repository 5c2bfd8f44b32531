// crates/uek-audit-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Control Evaluator
// Description: Sequential evaluation of control specs against a host.
// Purpose: Run each check's probe and record every assertion independently.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The evaluator runs one probe per check, in declaration order, through the
//! configured [`CommandExecutor`]. Assertion failures never short-circuit the
//! remaining checks. Execution failures are recorded as error assertions and
//! make the control a hard failure. Probe results are not shared between
//! checks or controls; every evaluation observes the host afresh.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::catalog::uek_installed_control;
use crate::core::catalog::uek_not_installed_control;
use crate::core::control::CheckSpec;
use crate::core::control::ControlSpec;
use crate::core::control::Subject;
use crate::core::identifiers::ControlId;
use crate::core::outcome::AssertionOutcome;
use crate::core::outcome::AssertionStatus;
use crate::core::outcome::ControlOutcome;
use crate::core::outcome::HostStateReport;
use crate::core::outcome::RunReport;
use crate::core::probe::CommandResult;
use crate::core::probe::Probe;
use crate::interfaces::CommandExecutor;
use crate::interfaces::ExecError;
use crate::runtime::audit::AuditSink;
use crate::runtime::audit::ControlAuditEvent;
use crate::runtime::audit::ProbeAuditEvent;
use crate::runtime::matcher::MatchError;
use crate::runtime::matcher::SubjectValue;
use crate::runtime::matcher::compile_pattern;
use crate::runtime::matcher::evaluate_matcher;
use crate::runtime::packages::PACKAGE_QUERY_COMMAND;
use crate::runtime::packages::parse_package_listing;

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// Evaluates controls against the host behind a command executor.
pub struct ControlEvaluator<'a> {
    /// Command-execution interface to the host.
    executor: &'a dyn CommandExecutor,
    /// Sink for probe and control audit events.
    audit: &'a dyn AuditSink,
}

impl<'a> ControlEvaluator<'a> {
    /// Creates an evaluator over an executor and audit sink.
    #[must_use]
    pub fn new(executor: &'a dyn CommandExecutor, audit: &'a dyn AuditSink) -> Self {
        Self {
            executor,
            audit,
        }
    }

    /// Evaluates a single control.
    #[must_use]
    pub fn evaluate(&self, control: &ControlSpec) -> ControlOutcome {
        let assertions =
            control.checks.iter().map(|check| self.evaluate_check(&control.id, check)).collect();
        let outcome = ControlOutcome::from_assertions(control.id.clone(), &control.title, assertions);
        self.audit.record_control(&ControlAuditEvent::new(&outcome));
        outcome
    }

    /// Evaluates controls in order and aggregates them into a run report.
    #[must_use]
    pub fn run(&self, controls: &[ControlSpec]) -> RunReport {
        let outcomes = controls.iter().map(|control| self.evaluate(control)).collect();
        RunReport::new(self.executor.target_label(), outcomes)
    }

    /// Evaluates both built-in controls and classifies the host.
    #[must_use]
    pub fn host_state(&self) -> HostStateReport {
        let installed = self.evaluate(&uek_installed_control());
        let absent = self.evaluate(&uek_not_installed_control());
        HostStateReport::new(self.executor.target_label(), installed, absent)
    }

    /// Runs the check's probe and applies its matcher.
    fn evaluate_check(&self, control_id: &ControlId, check: &CheckSpec) -> AssertionOutcome {
        let status = match &check.probe {
            Probe::Packages {
                pattern,
            } => match compile_pattern(pattern) {
                Ok(pattern) => self
                    .probe(control_id, PACKAGE_QUERY_COMMAND)
                    .and_then(|listing| parse_package_listing(&pattern, &listing))
                    .map_or_else(
                        |err| error_status(&err),
                        |packages| {
                            let statuses = packages.statuses();
                            judge(check, &SubjectValue::Statuses(&statuses))
                        },
                    ),
                Err(err) => match_error_status(check, &err),
            },
            Probe::Command {
                command,
            } => self.probe(control_id, command).map_or_else(
                |err| error_status(&err),
                |output| match check.subject {
                    Subject::ExitStatus => judge(check, &SubjectValue::ExitStatus(output.exit_status)),
                    Subject::Stdout => judge(check, &SubjectValue::Stdout(&output.stdout)),
                    Subject::Statuses => invalid_check(check),
                },
            ),
        };
        AssertionOutcome {
            description: check.description(),
            status,
        }
    }

    /// Executes a probe command and records the audit event.
    fn probe(&self, control_id: &ControlId, command: &str) -> Result<CommandResult, ExecError> {
        let result = self.executor.execute(command);
        self.audit.record_probe(&ProbeAuditEvent::new(control_id, command, &result));
        result
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Applies the check's matcher to an observed value.
fn judge(check: &CheckSpec, value: &SubjectValue<'_>) -> AssertionStatus {
    match evaluate_matcher(&check.matcher, value) {
        Ok(true) => AssertionStatus::Passed,
        Ok(false) => AssertionStatus::Failed {
            actual: value.summary(),
        },
        Err(err) => match_error_status(check, &err),
    }
}

/// Converts a matcher that cannot produce a verdict into an error assertion.
fn match_error_status(check: &CheckSpec, err: &MatchError) -> AssertionStatus {
    match err {
        MatchError::SubjectMismatch => invalid_check(check),
        MatchError::InvalidPattern { .. } => AssertionStatus::Error {
            kind: err.kind().to_string(),
            message: err.to_string(),
        },
    }
}

/// Reports a check whose subject or matcher does not fit its probe.
fn invalid_check(check: &CheckSpec) -> AssertionStatus {
    AssertionStatus::Error {
        kind: "invalid_check".to_string(),
        message: format!("check on {} does not fit its probe", check.subject.as_str()),
    }
}

/// Converts an execution failure into an error assertion.
fn error_status(err: &ExecError) -> AssertionStatus {
    AssertionStatus::Error {
        kind: err.kind().to_string(),
        message: err.to_string(),
    }
}
