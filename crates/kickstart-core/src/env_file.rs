//! Seeding of the local `.env` secrets file from its checked-in example.

use crate::error::Result;
use crate::io;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvOutcome {
    /// The env file was copied from the example.
    Created,
    /// An env file was already present and left untouched.
    Exists,
    /// Neither file exists; nothing was written.
    NoExample,
}

/// Copy `example` to `env_file` unless `env_file` already exists.
///
/// An existing env file is never overwritten, so re-running is safe. A
/// missing example is not an error.
pub fn seed(env_file: &Path, example: &Path) -> Result<EnvOutcome> {
    if env_file.exists() {
        return Ok(EnvOutcome::Exists);
    }
    if !example.exists() {
        return Ok(EnvOutcome::NoExample);
    }
    if io::copy_if_missing(example, env_file)? {
        tracing::debug!(from = %example.display(), to = %env_file.display(), "seeded env file");
        Ok(EnvOutcome::Created)
    } else {
        Ok(EnvOutcome::Exists)
    }
}
