//! Build script for ecolesson.
//!
//! Embeds the current commit hash and commit date so the About screen can
//! show them. Outside a git checkout both values are left unset.

use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!value.is_empty()).then_some(value)
}

fn main() {
    println!("cargo::rerun-if-changed=../.git/HEAD");
    println!("cargo::rerun-if-changed=../.git/refs/heads");

    if let Some(hash) = git(&["rev-parse", "HEAD"]) {
        println!("cargo::rustc-env=ECOLESSON_COMMIT_HASH={hash}");
    }
    // %cs = committer date, YYYY-MM-DD
    if let Some(date) = git(&["log", "-1", "--format=%cs", "HEAD"]) {
        println!("cargo::rustc-env=ECOLESSON_BUILD_DATE={date}");
    }
}
