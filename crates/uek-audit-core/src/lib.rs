// crates/uek-audit-core/src/lib.rs
// ============================================================================
// Module: UEK Audit Core Library
// Description: Public API surface for the UEK Audit core.
// Purpose: Expose control specs, outcomes, executor interfaces, and the evaluator.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! UEK Audit core evaluates host compliance controls about the Unbreakable
//! Enterprise Kernel package and its repository. Controls are declarative
//! [`ControlSpec`] values; the [`ControlEvaluator`] runs their probes through a
//! [`CommandExecutor`] and records every assertion independently. Execution
//! failures are reported as errors, never folded into pass/fail.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::CommandExecutor;
pub use interfaces::DEFAULT_MAX_OUTPUT_BYTES;
pub use interfaces::ExecError;
pub use runtime::AuditSink;
pub use runtime::ControlAuditEvent;
pub use runtime::ControlEvaluator;
pub use runtime::FileAuditSink;
pub use runtime::NoopAuditSink;
pub use runtime::PACKAGE_QUERY_COMMAND;
pub use runtime::ProbeAuditEvent;
pub use runtime::StderrAuditSink;
pub use runtime::MatchError;
pub use runtime::SubjectValue;
pub use runtime::compile_pattern;
pub use runtime::evaluate_matcher;
pub use runtime::parse_package_listing;
