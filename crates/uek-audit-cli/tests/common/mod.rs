// crates/uek-audit-cli/tests/common/mod.rs
// ============================================================================
// Module: CLI Test Helpers
// Description: Binary launcher, temp directories, and host fixtures.
// Purpose: Share setup across CLI integration suites.
// Dependencies: uek-audit-cli binary
// ============================================================================

//! ## Overview
//! Helpers that run the `uek-audit` binary in an isolated working directory
//! against recorded host fixtures.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

/// Host with the UEK kernel installed and the UEK repo enabled.
pub const UEK_HOST: &str = r#"
[[package]]
name = "kernel-uek"
version = "5.15.0-200.131.27.el9uek"

[[command]]
command = "yum repolist"
stdout = "repo id    repo name\nol9_UEKR7  Oracle Linux 9 UEK Release 7 (x86_64)\n"

[[command]]
command = "rpm -qa | grep -i uek"
stdout = "kernel-uek-5.15.0-200.131.27.el9uek.x86_64\n"
"#;

/// Host running the compatible kernel without UEK repos.
pub const RHCK_HOST: &str = r#"
[[package]]
name = "kernel"
version = "5.14.0-362.8.1.el9_3"

[[command]]
command = "yum repolist"
stdout = "repo id            repo name\nol9_baseos_latest  Oracle Linux 9 BaseOS Latest (x86_64)\n"

[[command]]
command = "rpm -qa | grep -i uek"
exit_status = 1
"#;

/// Host with the UEK package installed but the UEK repo disabled.
pub const MIXED_HOST: &str = r#"
[[package]]
name = "kernel-uek"
version = "5.15.0-200.131.27.el9uek"

[[command]]
command = "yum repolist"
stdout = "repo id            repo name\nol9_baseos_latest  Oracle Linux 9 BaseOS Latest (x86_64)\n"

[[command]]
command = "rpm -qa | grep -i uek"
stdout = "kernel-uek-5.15.0-200.131.27.el9uek.x86_64\n"
"#;

/// Host where `yum` is missing.
pub const NO_YUM_HOST: &str = r#"
[[package]]
name = "kernel"
version = "5.14.0-362.8.1.el9_3"

[[command]]
command = "rpm -qa | grep -i uek"
exit_status = 1
"#;

/// Returns the path of the built CLI binary.
pub fn uek_audit_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_uek-audit"))
}

/// Creates a fresh temp directory for one test.
pub fn temp_root(label: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).expect("clock drift").as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("uek-audit-cli-{label}-{nanos}"));
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

/// Removes a temp directory.
pub fn cleanup(path: &Path) {
    let _ = fs::remove_dir_all(path);
}

/// Writes a file under `root` and returns its path.
pub fn write_file(root: &Path, name: &str, contents: &str) -> PathBuf {
    let path = root.join(name);
    fs::write(&path, contents).expect("write file");
    path
}

/// Runs the binary in `root` with no inherited config override.
pub fn run_in(root: &Path, args: &[&str]) -> Output {
    Command::new(uek_audit_bin())
        .args(args)
        .current_dir(root)
        .env_remove("UEK_AUDIT_CONFIG")
        .output()
        .expect("run uek-audit")
}

/// Runs the binary against a fixture host written into `root`.
pub fn run_with_fixture(root: &Path, fixture: &str, args: &[&str]) -> Output {
    let fixture_path = write_file(root, "host.toml", fixture);
    let fixture_arg = fixture_path.to_string_lossy().into_owned();
    let mut full_args = vec!["--fixture", fixture_arg.as_str()];
    full_args.extend_from_slice(args);
    run_in(root, &full_args)
}

/// Returns stdout as a string.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Returns stderr as a string.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
