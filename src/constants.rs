pub const BINARY_NAME: &str = "go-blueprint";
pub const CLI_NAME: &str = "go-blueprint";
pub const REPO_URL: &str = "https://github.com/Melkeydev/go-blueprint";
pub const MAX_REDIRECTS: u32 = 5;

pub const BIN_DIR: &str = "bin";
pub const MANIFEST_FILE: &str = "package.json";

/// Entries the post-install sweep never removes from the working directory.
pub const KEEP_ENTRIES: [&str; 5] = [
    "package.json",
    "install.js",
    "bin",
    "README.md",
    "node_modules",
];
