use clap::Parser;
use colored::Colorize;
use installer::{release_tag_url, Installer};
use manifest::PackageManifest;
use platform::PlatformInfo;
use types::{InstallBlueprintCli, InstallerCommand};
use utils::{print_banner, print_status, TagColor};

mod constants;
mod error;
mod installer;
mod manifest;
mod platform;
mod probe;
mod types;
mod utils;

#[tokio::main]
async fn main() {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let args = InstallBlueprintCli::parse();

    match args.command {
        InstallerCommand::Run { dir, force } => {
            print_banner();

            // Platform resolution happens before any network or filesystem work
            let platform = match PlatformInfo::build() {
                Ok(platform) => platform,
                Err(err) => {
                    crate::error_message!("{err}");
                    crate::error_message!(
                        "See {}/releases for supported artifacts",
                        constants::REPO_URL
                    );
                    std::process::exit(1);
                }
            };
            platform.print_summary();

            let manifest = match PackageManifest::load(&dir) {
                Ok(manifest) => manifest,
                Err(err) => {
                    crate::error_message!("{err}");
                    std::process::exit(1);
                }
            };
            print_status("INFO", "Package version", &manifest.version, TagColor::Cyan);

            let installer = Installer::new(platform, manifest.version.clone(), dir, force);
            if let Err(err) = installer.run().await {
                crate::error_message!("Installation failed: {err}");
                crate::error_message!(
                    "Check {} for a matching artifact",
                    release_tag_url(&manifest.version)
                );
                std::process::exit(1);
            }
        }
    }
}
