// crates/uek-audit-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for future localization support.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The UEK audit CLI stores user-facing strings in a small translation catalog
//! to keep report wording consistent across commands. All runtime output
//! should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself to avoid panics.
//! - Placeholders are substituted in a single pass over the template.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static catalog entries loaded into the message bundle.
const CATALOG_ITEMS: &[(&str, &str)] = &[
    ("main.version", "uek-audit {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("config.validate.source", "Source: {path}"),
    ("config.validate.defaults", "Source: built-in defaults (no config file found)"),
    ("config.validate.transport", "Transport: {transport}"),
    ("config.validate.controls", "Controls: {count}"),
    ("check.selection_failed", "Failed to select controls: {error}"),
    ("target.fixture_failed", "Failed to load fixture {path}: {error}"),
    ("target.ssh_missing", "target.transport=ssh requires [target.ssh]"),
    ("target.fixture_missing", "target.transport=fixture requires target.fixture_path"),
    ("audit.open_failed", "Failed to open audit log {path}: {error}"),
    ("report.serialize_failed", "Failed to serialize report: {error}"),
    ("report.target", "Target: {target}"),
    ("report.control.header", "Control {id}: {title}"),
    ("report.assertion.passed", "  [PASS] {description}"),
    ("report.assertion.failed", "  [FAIL] {description} (actual: {actual})"),
    ("report.assertion.error", "  [ERROR] {description} ({kind}: {message})"),
    (
        "report.control.result",
        "  Result: {status} ({passed} passed, {failed} failed, {errored} errored)",
    ),
    ("report.summary", "Summary: {passed} of {total} controls passed; status {status}."),
    ("status.state", "Host state: {state}"),
    (
        "status.detail.installed",
        "The UEK kernel is installed and UEK repositories are enabled.",
    ),
    ("status.detail.absent", "The UEK kernel is not installed and UEK repositories are disabled."),
    (
        "status.detail.inconsistent",
        "Neither control passed fully; the host is partially configured for UEK.",
    ),
    ("status.detail.indeterminate", "At least one probe could not be executed."),
    ("controls.list.entry", "{id}  {title}"),
    ("controls.list.check", "  - {description}"),
];

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the English catalog while substituting `args`.
///
/// The template is scanned once; substituted values are never rescanned, and
/// placeholders without a matching argument are kept verbatim.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let tail = &rest[open ..];
        let Some(close) = tail.find('}') else {
            break;
        };
        result.push_str(&rest[.. open]);
        let name = &tail[1 .. close];
        match args.iter().find(|arg| arg.key == name) {
            Some(arg) => result.push_str(&arg.value),
            None => result.push_str(&tail[..= close]),
        }
        rest = &tail[close + 1 ..];
    }
    result.push_str(rest);
    result
}

/// Returns the catalog keys, sorted.
#[must_use]
pub fn catalog_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = CATALOG_ITEMS.iter().map(|(key, _)| *key).collect();
    keys.sort_unstable();
    keys
}

/// Returns the static English catalog used by the CLI.
fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

    CATALOG.get_or_init(|| CATALOG_ITEMS.iter().copied().collect())
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
