// crates/uek-audit-cli/src/lib.rs
// ============================================================================
// Module: UEK Audit CLI Library
// Description: Shared helpers for the UEK audit command-line interface.
// Purpose: Provide reusable components (i18n) for the CLI binary and tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! This library module houses shared CLI utilities, including the message
//! catalog. The binary entry point (`src/main.rs`) imports these helpers to
//! keep all user-facing output consistent.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;
