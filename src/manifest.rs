use crate::constants::MANIFEST_FILE;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// The package manifest colocated with the installer. Only the version is
/// needed to pick a release tag; other fields are ignored.
#[derive(Debug, Deserialize)]
pub struct PackageManifest {
    pub version: String,
}

impl PackageManifest {
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read manifest at {}", path.display()))?;
        let manifest = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed manifest at {}", path.display()))?;
        Ok(manifest)
    }
}
