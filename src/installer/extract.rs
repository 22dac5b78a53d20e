//! Archive extraction via host-provided tooling. The installer never parses
//! archives itself: it dispatches to `tar`, `unzip`, or PowerShell by archive
//! suffix and host OS, falling through a fixed list of fallbacks.
use crate::error::InstallError;
use crate::platform::Os;
use anyhow::Result;
use std::path::Path;
use std::process::Command;
use which::which;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractTool {
    Unzip,
    ExpandArchive,
    Tar,
    TarGz,
    PowershellTarGz,
}

impl ExtractTool {
    fn program(&self) -> &'static str {
        match self {
            ExtractTool::Unzip => "unzip",
            ExtractTool::ExpandArchive | ExtractTool::PowershellTarGz => "powershell",
            ExtractTool::Tar | ExtractTool::TarGz => "tar",
        }
    }

    fn command(&self, archive: &Path, work_dir: &Path) -> Command {
        let mut cmd = Command::new(self.program());
        cmd.current_dir(work_dir);
        match self {
            ExtractTool::Unzip => {
                cmd.arg("-o").arg(archive);
            }
            ExtractTool::ExpandArchive => {
                cmd.arg("-command").arg(format!(
                    "Expand-Archive -Path '{}' -DestinationPath . -Force",
                    archive.display()
                ));
            }
            ExtractTool::Tar => {
                cmd.arg("-xf").arg(archive);
            }
            ExtractTool::TarGz => {
                cmd.arg("-xzf").arg(archive);
            }
            ExtractTool::PowershellTarGz => {
                cmd.arg("-command")
                    .arg(format!("tar -xzf '{}'", archive.display()));
            }
        }
        cmd
    }
}

fn plan(archive_name: &str, os: Os) -> Vec<ExtractTool> {
    let zip = archive_name.ends_with(".zip");
    match (zip, os.is_windows()) {
        (true, true) => vec![ExtractTool::ExpandArchive, ExtractTool::Tar],
        (true, false) => vec![ExtractTool::Unzip, ExtractTool::Tar],
        (false, true) => vec![ExtractTool::TarGz, ExtractTool::PowershellTarGz],
        (false, false) => vec![ExtractTool::TarGz],
    }
}

/// Unpack `archive` into `work_dir`. Missing tools count as failed attempts
/// and fall through; only an exhausted fallback chain is fatal.
pub fn extract_archive(archive: &Path, work_dir: &Path, os: Os) -> Result<()> {
    let name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let mut failures = Vec::new();
    for tool in plan(name, os) {
        if which(tool.program()).is_err() {
            failures.push(format!("{}: not found on PATH", tool.program()));
            continue;
        }

        match tool.command(archive, work_dir).output() {
            Ok(out) if out.status.success() => return Ok(()),
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr);
                failures.push(format!("{}: {}", tool.program(), stderr.trim()));
            }
            Err(err) => failures.push(format!("{}: {err}", tool.program())),
        }
    }

    Err(InstallError::ExtractionFailed {
        output: failures.join("; "),
    }
    .into())
}
