use colored::Colorize;
use std::path::Path;
use std::process::{Command, Stdio};

/// Decides whether an already installed binary is usable, so repeat installs
/// are cheap no-ops. Never errors: any failure is a "not working" verdict.
pub fn binary_works(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }

    if answers(path, "--version") || answers(path, "--help") {
        return true;
    }

    crate::info_message!("Existing binary not working, reinstalling...");
    false
}

fn answers(path: &Path, arg: &str) -> bool {
    Command::new(path)
        .arg(arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
