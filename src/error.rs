use std::path::PathBuf;
use thiserror::Error;

/// Fatal and per-candidate failure kinds of the install flow. Per-candidate
/// variants (`DownloadFailed`, `TooManyRedirects`) become fatal only once
/// every candidate archive name has been exhausted.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Unsupported platform: {os}-{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Failed to download {name}: {reason}")]
    DownloadFailed { name: String, reason: String },

    #[error("Too many redirects while fetching {url}")]
    TooManyRedirects { url: String },

    #[error("Extraction failed: {output}")]
    ExtractionFailed { output: String },

    #[error("Binary not found in extracted archive under {}", dir.display())]
    BinaryNotFound { dir: PathBuf },
}
