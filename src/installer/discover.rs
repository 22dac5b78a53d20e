//! Locates the executable inside the extraction output. The archive's
//! internal layout is not fully predictable: some releases unpack flat, some
//! into a directory named after the archive. Known layouts are probed first,
//! then a one-level directory scan takes over.
use super::candidates;
use crate::constants::BINARY_NAME;
use crate::error::InstallError;
use crate::platform::PlatformInfo;
use anyhow::Result;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

pub fn find_binary(work_dir: &Path, platform: &PlatformInfo, version: &str) -> Result<PathBuf> {
    let qualified = platform.exe_name(BINARY_NAME);

    let mut probes = vec![work_dir.join(&qualified)];
    if qualified != BINARY_NAME {
        probes.push(work_dir.join(BINARY_NAME));
    }
    for dir in candidates::extraction_dirs(platform, version) {
        probes.push(work_dir.join(dir).join(&qualified));
    }

    for probe in probes {
        if probe.is_file() {
            return Ok(probe);
        }
    }

    scan(work_dir, &qualified)
}

/// Last resort: accept any file that carries the binary's base name or an
/// `.exe` suffix, and look one level into subdirectories for an exact match.
fn scan(work_dir: &Path, qualified: &str) -> Result<PathBuf> {
    let mut listing = Vec::new();

    for entry in fs::read_dir(work_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        listing.push(name.clone());

        if path.is_file() {
            if is_archive(&name) {
                continue;
            }
            if name.contains(BINARY_NAME) || name.ends_with(".exe") {
                return Ok(path);
            }
        } else if path.is_dir() {
            let nested = path.join(qualified);
            if nested.is_file() {
                return Ok(nested);
            }
        }
    }

    crate::info_message!("Available files: {}", listing.join(", "));
    Err(InstallError::BinaryNotFound {
        dir: work_dir.to_path_buf(),
    }
    .into())
}

fn is_archive(name: &str) -> bool {
    name.ends_with(".tar.gz") || name.ends_with(".zip")
}
