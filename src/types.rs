use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "blueprint-installer",
    version,
    about = "Installs the go-blueprint CLI"
)]
pub struct InstallBlueprintCli {
    #[command(subcommand)]
    pub command: InstallerCommand,
}

#[derive(Subcommand, Debug)]
pub enum InstallerCommand {
    /// Fetch the go-blueprint release archive for this platform and install
    /// the binary into `bin/`
    Run {
        /// Directory holding the package manifest; downloads are staged here.
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Reinstall even if an existing binary answers the liveness probe.
        #[arg(long)]
        force: bool,
    },
}
