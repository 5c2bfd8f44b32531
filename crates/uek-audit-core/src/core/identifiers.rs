// crates/uek-audit-core/src/core/identifiers.rs
// ============================================================================
// Module: UEK Audit Identifiers
// Description: Opaque identifiers for compliance controls.
// Purpose: Provide a strongly typed, serializable control ID with a stable string form.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Control identifiers are opaque strings. Validation (non-empty, unique) is
//! handled where controls are declared rather than within the wrapper.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Identifier of a compliance control.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlId(String);

impl ControlId {
    /// Creates a new control identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ControlId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ControlId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
