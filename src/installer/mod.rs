use crate::constants::{BIN_DIR, CLI_NAME, KEEP_ENTRIES, REPO_URL};
use crate::error::InstallError;
use crate::platform::PlatformInfo;
use crate::probe;
use crate::utils::{print_message, print_status, TagColor};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

mod candidates;
mod discover;
mod download;
mod extract;

pub use candidates::release_tag_url;

pub struct Installer {
    pub platform: PlatformInfo,
    pub version: String,
    pub work_dir: PathBuf,
    pub force: bool,
    release_base: String,
}

impl Installer {
    pub fn new(platform: PlatformInfo, version: String, work_dir: PathBuf, force: bool) -> Self {
        Installer {
            platform,
            version,
            work_dir,
            force,
            release_base: REPO_URL.to_string(),
        }
    }

    #[cfg(test)]
    fn with_release_base(mut self, base: &str) -> Self {
        self.release_base = base.to_string();
        self
    }

    fn bin_dir(&self) -> PathBuf {
        self.work_dir.join(BIN_DIR)
    }

    pub fn target_binary(&self) -> PathBuf {
        self.bin_dir().join(self.platform.exe_name(CLI_NAME))
    }

    /// Runs the install flow. Temporary artifacts are swept afterwards no
    /// matter how the flow ended; sweep failures never mask the outcome.
    pub async fn run(&self) -> Result<()> {
        let result = self.install().await;
        self.cleanup();
        result
    }

    async fn install(&self) -> Result<()> {
        if !self.force && probe::binary_works(&self.target_binary()) {
            crate::success_message!("Binary already installed and working!");
            return Ok(());
        }

        self.prepare_bin_dir()?;

        let archive = self.download_archive().await?;
        extract::extract_archive(&archive, &self.work_dir, self.platform.os)?;

        let binary = discover::find_binary(&self.work_dir, &self.platform, &self.version)?;
        self.install_binary(&binary)?;

        crate::success_message!("Installation completed successfully!");
        Ok(())
    }

    /// Tries every candidate archive name in order; the first successful
    /// download wins. A candidate failure is diagnostic only until the whole
    /// list is exhausted, at which point the last error propagates.
    async fn download_archive(&self) -> Result<PathBuf> {
        let client = download::release_client()?;
        let names = candidates::archive_names(&self.platform, &self.version);

        let mut last_err = None;
        for name in &names {
            let url = candidates::download_url(&self.release_base, &self.version, name);
            print_message("DOWNLOADING", &url, TagColor::Blue);

            let dest = self.work_dir.join(name);
            match download::fetch_to_file(&client, &url, &dest).await {
                Ok(()) => return Ok(dest),
                Err(err) => {
                    print_status("WARNING", name, &err.to_string(), TagColor::Cyan);
                    let _ = fs::remove_file(&dest);
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            InstallError::DownloadFailed {
                name: String::new(),
                reason: "no suitable archive for this platform".to_string(),
            }
            .into()
        }))
    }

    fn prepare_bin_dir(&self) -> Result<()> {
        let bin = self.bin_dir();
        if bin.exists() {
            fs::remove_dir_all(&bin)
                .with_context(|| format!("Failed to clear {}", bin.display()))?;
        }
        fs::create_dir_all(&bin).with_context(|| format!("Failed to create {}", bin.display()))?;
        Ok(())
    }

    fn install_binary(&self, from: &Path) -> Result<()> {
        let target = self.target_binary();

        // rename fails across filesystems; fall back to copy + remove
        if fs::rename(from, &target).is_err() {
            fs::copy(from, &target)
                .with_context(|| format!("Failed to move binary to {}", target.display()))?;
            let _ = fs::remove_file(from);
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(0o755))
                .with_context(|| format!("Failed to mark {} executable", target.display()))?;
        }

        Ok(())
    }

    /// Deletes every candidate archive that made it to disk, then sweeps the
    /// working directory down to the allow-list. Failures here are warnings.
    fn cleanup(&self) {
        for name in candidates::archive_names(&self.platform, &self.version) {
            let path = self.work_dir.join(&name);
            if path.exists() {
                if let Err(err) = fs::remove_file(&path) {
                    crate::warning_message!("Could not remove {}: {err}", path.display());
                }
            }
        }

        let own_exe = std::env::current_exe()
            .ok()
            .and_then(|path| path.file_name().map(|name| name.to_os_string()));

        let entries = match fs::read_dir(&self.work_dir) {
            Ok(entries) => entries,
            Err(err) => {
                crate::warning_message!("Could not clean up working directory: {err}");
                return;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            if KEEP_ENTRIES.iter().any(|keep| name == *keep) {
                continue;
            }
            if own_exe.as_deref() == Some(name.as_os_str()) {
                continue;
            }

            let path = entry.path();
            let removed = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            if let Err(err) = removed {
                crate::warning_message!("Could not remove {}: {err}", path.display());
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::download::fixture::{start, Canned};
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::process::Command;
    use tempfile::TempDir;

    const WORKING_SCRIPT: &str = "#!/bin/sh\nexit 0\n";
    const BROKEN_SCRIPT: &str = "#!/bin/sh\nexit 1\n";

    fn linux_installer(work_dir: &Path) -> Installer {
        Installer::new(
            PlatformInfo::resolve("linux", "x86_64").unwrap(),
            "0.1.2".to_string(),
            work_dir.to_path_buf(),
            false,
        )
    }

    fn write_script(path: &Path, body: &str) {
        std::fs::write(path, body).unwrap();
        std::fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Builds a gzipped tarball holding a `go-blueprint` shell script, the
    /// same shape the release builder publishes.
    fn release_tarball(body: &str) -> Vec<u8> {
        let staging = TempDir::new().unwrap();
        write_script(&staging.path().join("go-blueprint"), body);

        let out = Command::new("tar")
            .args(["-czf", "-", "go-blueprint"])
            .current_dir(staging.path())
            .output()
            .unwrap();
        assert!(out.status.success());
        out.stdout
    }

    #[tokio::test]
    async fn working_binary_short_circuits_the_install() {
        let work = TempDir::new().unwrap();
        let bin = work.path().join("bin");
        std::fs::create_dir(&bin).unwrap();
        write_script(&bin.join("go-blueprint"), WORKING_SCRIPT);
        std::fs::write(bin.join("marker"), "untouched").unwrap();

        let installer = linux_installer(work.path());
        installer.run().await.unwrap();

        // bin/ was not reset and nothing was downloaded
        assert!(bin.join("marker").exists());
        assert_eq!(
            std::fs::read_to_string(bin.join("go-blueprint")).unwrap(),
            WORKING_SCRIPT
        );
    }

    #[tokio::test]
    async fn installs_from_the_first_working_candidate() {
        let work = TempDir::new().unwrap();
        std::fs::write(work.path().join("package.json"), r#"{"version":"0.1.2"}"#).unwrap();
        std::fs::write(work.path().join("README.md"), "readme").unwrap();
        std::fs::write(work.path().join("junk.txt"), "leftover").unwrap();

        let tarball = release_tarball(WORKING_SCRIPT);
        let (base, handle) =
            start(|_| vec![Canned::status(404, "Not Found"), Canned::ok(&tarball)]);

        let installer = linux_installer(work.path()).with_release_base(&base);
        installer.run().await.unwrap();

        let requests = handle.join().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0]
            .starts_with("GET /releases/download/v0.1.2/go-blueprint_0.1.2_Linux_x86_64.tar.gz"));
        assert!(requests[1]
            .starts_with("GET /releases/download/v0.1.2/go-blueprint_v0.1.2_Linux_x86_64.tar.gz"));

        let target = work.path().join("bin/go-blueprint");
        assert!(target.exists());
        let mode = std::fs::metadata(&target).unwrap().permissions().mode();
        assert_ne!(mode & 0o111, 0);

        // allow-listed entries survive the sweep, everything else is gone
        assert!(work.path().join("package.json").exists());
        assert!(work.path().join("README.md").exists());
        assert!(!work.path().join("junk.txt").exists());
        for entry in std::fs::read_dir(work.path()).unwrap().flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            assert!(!name.ends_with(".tar.gz"), "leftover archive: {name}");
        }
    }

    #[tokio::test]
    async fn broken_binary_triggers_a_fresh_install() {
        let work = TempDir::new().unwrap();
        let bin = work.path().join("bin");
        std::fs::create_dir(&bin).unwrap();
        write_script(&bin.join("go-blueprint"), BROKEN_SCRIPT);

        let tarball = release_tarball(WORKING_SCRIPT);
        let (base, handle) = start(|_| vec![Canned::ok(&tarball)]);

        let installer = linux_installer(work.path()).with_release_base(&base);
        installer.run().await.unwrap();

        assert_eq!(handle.join().unwrap().len(), 1);
        assert_eq!(
            std::fs::read_to_string(bin.join("go-blueprint")).unwrap(),
            WORKING_SCRIPT
        );
    }

    #[tokio::test]
    async fn force_reinstalls_over_a_working_binary() {
        let work = TempDir::new().unwrap();
        let bin = work.path().join("bin");
        std::fs::create_dir(&bin).unwrap();
        write_script(&bin.join("go-blueprint"), BROKEN_SCRIPT);

        let fresh = "#!/bin/sh\necho fresh\nexit 0\n";
        let tarball = release_tarball(fresh);
        let (base, handle) = start(|_| vec![Canned::ok(&tarball)]);

        let mut installer = linux_installer(work.path()).with_release_base(&base);
        installer.force = true;
        installer.run().await.unwrap();

        assert_eq!(handle.join().unwrap().len(), 1);
        assert_eq!(
            std::fs::read_to_string(bin.join("go-blueprint")).unwrap(),
            fresh
        );
    }

    #[tokio::test]
    async fn redirect_loop_on_one_candidate_does_not_abort_the_next() {
        let work = TempDir::new().unwrap();

        let tarball = release_tarball(WORKING_SCRIPT);
        // first candidate spins through its whole redirect budget, second is good
        let (base, handle) = start(|base| {
            let mut script: Vec<Canned> = (0..6)
                .map(|_| Canned::redirect(&format!("{base}/loop")))
                .collect();
            script.push(Canned::ok(&tarball));
            script
        });

        let installer = linux_installer(work.path()).with_release_base(&base);
        installer.run().await.unwrap();

        let requests = handle.join().unwrap();
        assert_eq!(requests.len(), 7);
        assert!(requests[6]
            .starts_with("GET /releases/download/v0.1.2/go-blueprint_v0.1.2_Linux_x86_64.tar.gz"));
        assert!(work.path().join("bin/go-blueprint").exists());
    }

    #[tokio::test]
    async fn exhausted_candidates_fail_with_the_last_error() {
        let work = TempDir::new().unwrap();
        std::fs::write(work.path().join("package.json"), r#"{"version":"0.1.2"}"#).unwrap();

        // linux/x86_64 enumerates exactly three candidates
        let (base, handle) = start(|_| {
            vec![
                Canned::status(404, "Not Found"),
                Canned::status(404, "Not Found"),
                Canned::status(404, "Not Found"),
            ]
        });

        let installer = linux_installer(work.path()).with_release_base(&base);
        let err = installer.run().await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InstallError>(),
            Some(InstallError::DownloadFailed { .. })
        ));
        assert_eq!(handle.join().unwrap().len(), 3);

        // a failed run leaves an empty bin/, never a stale binary
        let bin = work.path().join("bin");
        assert!(bin.is_dir());
        assert_eq!(std::fs::read_dir(&bin).unwrap().count(), 0);
        assert!(work.path().join("package.json").exists());
    }

    #[tokio::test]
    async fn sweep_runs_even_when_the_install_is_a_no_op() {
        let work = TempDir::new().unwrap();
        let bin = work.path().join("bin");
        std::fs::create_dir(&bin).unwrap();
        write_script(&bin.join("go-blueprint"), WORKING_SCRIPT);
        std::fs::write(work.path().join("stale-download.tmp"), "stale").unwrap();

        let installer = linux_installer(work.path());
        installer.run().await.unwrap();

        assert!(!work.path().join("stale-download.tmp").exists());
        assert!(bin.join("go-blueprint").exists());
    }
}
