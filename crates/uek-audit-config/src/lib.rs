// crates/uek-audit-config/src/lib.rs
// ============================================================================
// Module: UEK Audit Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for uek-audit.toml semantics.
// Dependencies: uek-audit-core, serde, toml
// ============================================================================

//! ## Overview
//! `uek-audit-config` defines the configuration model for UEK audits: the
//! target transport, the default control selection, report and audit sink
//! settings, and additional controls. Validation is strict and fail-closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
