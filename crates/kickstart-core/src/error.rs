use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KickstartError {
    #[error("project root has no directory name: {}", .0.display())]
    InvalidRoot(PathBuf),

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KickstartError>;
