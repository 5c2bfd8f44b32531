// crates/uek-audit-core/src/runtime/mod.rs
// ============================================================================
// Module: UEK Audit Runtime
// Description: Control evaluation, matching, package parsing, and audit sinks.
// Purpose: Turn control specs into outcomes by probing a host.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime evaluates controls sequentially: each probe runs to completion
//! before the next begins, and every assertion is recorded independently.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod evaluator;
pub mod matcher;
pub mod packages;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::ControlAuditEvent;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::ProbeAuditEvent;
pub use audit::StderrAuditSink;
pub use evaluator::ControlEvaluator;
pub use matcher::MatchError;
pub use matcher::SubjectValue;
pub use matcher::compile_pattern;
pub use matcher::evaluate_matcher;
pub use packages::PACKAGE_QUERY_COMMAND;
pub use packages::parse_package_listing;
