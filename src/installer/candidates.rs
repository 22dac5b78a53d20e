//! Naming-convention guesses for release artifacts. The release builder has
//! changed its conventions over time, so the installer tries an ordered list
//! of archive names and, after extraction, an ordered list of directory
//! layouts. Order encodes preference; the first hit wins.
use crate::constants::{BINARY_NAME, REPO_URL};
use crate::platform::PlatformInfo;

/// Candidate remote archive filenames, most likely first. Zip renditions are
/// only published for Windows releases.
pub fn archive_names(platform: &PlatformInfo, version: &str) -> Vec<String> {
    let os = platform.os.release_token();
    let arch = platform.arch.release_token();

    let mut names = vec![
        format!("{BINARY_NAME}_{version}_{os}_{arch}.tar.gz"),
        format!("{BINARY_NAME}_v{version}_{os}_{arch}.tar.gz"),
        format!("{BINARY_NAME}_{version}_{}_{arch}.tar.gz", os.to_lowercase()),
    ];

    if platform.raw_arch != arch {
        names.push(format!(
            "{BINARY_NAME}_{version}_{os}_{}.tar.gz",
            platform.raw_arch
        ));
    }

    if platform.os.is_windows() {
        names.push(format!("{BINARY_NAME}_{version}_{os}_{arch}.zip"));
        names.push(format!("{BINARY_NAME}_v{version}_{os}_{arch}.zip"));
    }

    names
}

/// Directory names an archive may have unpacked the binary into.
pub fn extraction_dirs(platform: &PlatformInfo, version: &str) -> Vec<String> {
    let os = platform.os.release_token();
    let arch = platform.arch.release_token();

    vec![
        format!("{BINARY_NAME}_{version}_{os}_{arch}"),
        format!("{BINARY_NAME}_v{version}_{os}_{arch}"),
        format!("{BINARY_NAME}_{version}_{}_{arch}", os.to_lowercase()),
    ]
}

pub fn download_url(base: &str, version: &str, filename: &str) -> String {
    format!("{base}/releases/download/v{version}/{filename}")
}

/// Human-facing page to check when no artifact could be fetched.
pub fn release_tag_url(version: &str) -> String {
    format!("{REPO_URL}/releases/tag/v{version}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linux() -> PlatformInfo {
        PlatformInfo::resolve("linux", "x86_64").unwrap()
    }

    #[test]
    fn primary_candidate_matches_release_convention() {
        let names = archive_names(&linux(), "0.1.2");
        assert_eq!(names[0], "go-blueprint_0.1.2_Linux_x86_64.tar.gz");
    }

    #[test]
    fn version_prefix_variant_comes_second() {
        let names = archive_names(&linux(), "0.1.2");
        assert_eq!(names[1], "go-blueprint_v0.1.2_Linux_x86_64.tar.gz");
        assert_eq!(names[2], "go-blueprint_0.1.2_linux_x86_64.tar.gz");
    }

    #[test]
    fn raw_arch_variant_only_when_it_differs() {
        let names = archive_names(&linux(), "0.1.2");
        assert_eq!(names.len(), 3);

        let arm = PlatformInfo::resolve("linux", "aarch64").unwrap();
        let names = archive_names(&arm, "0.1.2");
        assert!(names.contains(&"go-blueprint_0.1.2_Linux_aarch64.tar.gz".to_string()));
    }

    #[test]
    fn zip_candidates_are_windows_only() {
        let names = archive_names(&linux(), "0.1.2");
        assert!(names.iter().all(|name| !name.ends_with(".zip")));

        let windows = PlatformInfo::resolve("win32", "x64").unwrap();
        let names = archive_names(&windows, "0.1.2");
        assert!(names.contains(&"go-blueprint_0.1.2_Windows_x86_64.zip".to_string()));
        // tarballs stay preferred even on Windows
        assert!(names[0].ends_with(".tar.gz"));
    }

    #[test]
    fn extraction_dirs_mirror_archive_names() {
        let dirs = extraction_dirs(&linux(), "0.1.2");
        assert_eq!(dirs[0], "go-blueprint_0.1.2_Linux_x86_64");
        assert_eq!(dirs[1], "go-blueprint_v0.1.2_Linux_x86_64");
    }

    #[test]
    fn download_url_uses_the_version_tag() {
        let url = download_url(REPO_URL, "0.1.2", "go-blueprint_0.1.2_Linux_x86_64.tar.gz");
        assert_eq!(
            url,
            "https://github.com/Melkeydev/go-blueprint/releases/download/v0.1.2/go-blueprint_0.1.2_Linux_x86_64.tar.gz"
        );
    }
}
