use crate::error::{KickstartError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ProvisionConfig
// ---------------------------------------------------------------------------

/// The external dependency manager and the calls made to it, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionConfig {
    #[serde(default = "default_program")]
    pub program: String,
    /// Argument lists, one per invocation. The defaults create the virtual
    /// environment and then install the declared dependencies into it.
    #[serde(default = "default_steps")]
    pub steps: Vec<Vec<String>>,
}

fn default_program() -> String {
    "uv".to_string()
}

fn default_steps() -> Vec<Vec<String>> {
    vec![vec!["venv".to_string()], vec!["sync".to_string()]]
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            steps: default_steps(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Contents of the optional `.kickstart.yaml` shipped with a template.
/// Every field has a default, so an absent or empty file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,
    #[serde(default = "default_env_example")]
    pub env_example: PathBuf,
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
    #[serde(default)]
    pub provision: ProvisionConfig,
    /// Bootstrapper files removed as the last step. The config file itself is
    /// always removed as well.
    #[serde(default = "default_cleanup")]
    pub cleanup: Vec<PathBuf>,
}

fn default_env_file() -> PathBuf {
    PathBuf::from(paths::ENV_FILE)
}

fn default_env_example() -> PathBuf {
    PathBuf::from(paths::ENV_EXAMPLE_FILE)
}

fn default_manifest() -> PathBuf {
    PathBuf::from(paths::MANIFEST_FILE)
}

fn default_cleanup() -> Vec<PathBuf> {
    paths::SETUP_SCRIPTS.iter().map(PathBuf::from).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env_file: default_env_file(),
            env_example: default_env_example(),
            manifest: default_manifest(),
            provision: ProvisionConfig::default(),
            cleanup: default_cleanup(),
        }
    }
}

impl Config {
    /// Load `.kickstart.yaml` from `root`, falling back to defaults when the
    /// file is absent or empty.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&data).map_err(|source| KickstartError::Config { path, source })
    }

    pub fn env_file_path(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.env_file)
    }

    pub fn env_example_path(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.env_example)
    }

    pub fn manifest_path(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.manifest)
    }

    /// Every file to delete during self-removal, resolved against `root`,
    /// without duplicates and ending with the config file.
    pub fn cleanup_paths(&self, root: &Path) -> Vec<PathBuf> {
        let mut out: Vec<PathBuf> = Vec::with_capacity(self.cleanup.len() + 1);
        let config = paths::config_path(root);
        for p in &self.cleanup {
            let resolved = paths::resolve(root, p);
            if resolved != config && !out.contains(&resolved) {
                out.push(resolved);
            }
        }
        out.push(config);
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
