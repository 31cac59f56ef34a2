use crate::error::{KickstartError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File constants
// ---------------------------------------------------------------------------

pub const ENV_FILE: &str = ".env";
pub const ENV_EXAMPLE_FILE: &str = ".env.example";
pub const MANIFEST_FILE: &str = "pyproject.toml";
pub const CONFIG_FILE: &str = ".kickstart.yaml";

/// Launcher scripts a template ships so the bootstrapper can be invoked on
/// each platform. Removed together with the config file on completion.
pub const SETUP_SCRIPTS: &[&str] = &["setup.sh", "setup.ps1"];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Resolve a configured path against the project root. Absolute paths are
/// kept as-is.
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    root.join(path)
}

/// The project name is the final segment of the root path, unmodified.
pub fn project_name(root: &Path) -> Result<String> {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| KickstartError::InvalidRoot(root.to_path_buf()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
