//! Embeds commit hash and build time for `panebridge --version`.
//!
//! Either value can be pinned through the environment variable of the same
//! name; missing git or date tooling degrades to "unknown".

use std::env;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const GIT_HASH_VAR: &str = "PANEBRIDGE_BUILD_GIT_HASH";
const TIMESTAMP_VAR: &str = "PANEBRIDGE_BUILD_TIMESTAMP";

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    if let Some(reference) = head_reference() {
        println!("cargo:rerun-if-changed=.git/{reference}");
    }

    let git_hash = pinned_or(GIT_HASH_VAR, || {
        command_output("git", &["rev-parse", "--short=12", "HEAD"])
            .unwrap_or_else(|| "unknown".to_string())
    });
    let timestamp = pinned_or(TIMESTAMP_VAR, || {
        command_output("date", &["-u", "+%Y-%m-%dT%H:%M:%SZ"]).unwrap_or_else(|| {
            let secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            format!("unix:{secs}")
        })
    });

    println!("cargo:rustc-env={GIT_HASH_VAR}={git_hash}");
    println!("cargo:rustc-env={TIMESTAMP_VAR}={timestamp}");
}

fn pinned_or(var: &str, compute: impl FnOnce() -> String) -> String {
    println!("cargo:rerun-if-env-changed={var}");
    env::var(var).unwrap_or_else(|_| compute())
}

/// Branch ref behind `.git/HEAD`, so new commits trigger a rebuild.
fn head_reference() -> Option<String> {
    let head = std::fs::read_to_string(".git/HEAD").ok()?;
    head.trim().strip_prefix("ref: ").map(str::to_string)
}

fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
