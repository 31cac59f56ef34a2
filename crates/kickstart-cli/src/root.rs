use anyhow::Context;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Resolve the project root.
///
/// Priority:
/// 1. `--root` flag / `KICKSTART_ROOT` env var (passed in as `explicit`),
///    relative paths taken from the current directory
/// 2. The current directory, as the shell spells it
///
/// A root containing `..` is canonicalized, since its last segment would
/// otherwise not name the project directory.
pub fn resolve_root(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    let physical = std::env::current_dir().context("cannot determine current directory")?;
    let cwd = logical_cwd(physical, std::env::var_os("PWD").as_deref());
    match explicit {
        Some(p) => without_parent_dirs(cwd.join(p)),
        None => Ok(cwd),
    }
}

fn without_parent_dirs(path: PathBuf) -> anyhow::Result<PathBuf> {
    if !path.components().any(|c| c == Component::ParentDir) {
        return Ok(path);
    }
    path.canonicalize()
        .with_context(|| format!("cannot resolve project root {}", path.display()))
}

/// Prefer `$PWD` over the physical path when both name the same directory, so
/// a project entered through a symlink is named after the link.
fn logical_cwd(physical: PathBuf, pwd: Option<&OsStr>) -> PathBuf {
    let Some(pwd) = pwd.map(Path::new).filter(|p| p.is_absolute()) else {
        return physical;
    };
    match (pwd.canonicalize(), physical.canonicalize()) {
        (Ok(a), Ok(b)) if a == b => pwd.to_path_buf(),
        _ => physical,
    }
}
