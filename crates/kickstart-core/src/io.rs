use crate::error::Result;
use std::fs::Permissions;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `data` to a tempfile beside `path` and move it into place, so a
/// crash never leaves a half-written file. With `clobber` unset an existing
/// `path` is kept and `false` is returned.
fn persist_beside(
    path: &Path,
    data: &[u8],
    permissions: Option<Permissions>,
    clobber: bool,
) -> Result<bool> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    if let Some(permissions) = permissions {
        tmp.as_file().set_permissions(permissions)?;
    }
    if clobber {
        tmp.persist(path).map_err(|e| e.error)?;
        return Ok(true);
    }
    match tmp.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.error.into()),
    }
}

/// Replace the content of an existing file, keeping its permissions.
pub fn atomic_rewrite(path: &Path, data: &[u8]) -> Result<()> {
    let permissions = std::fs::metadata(path)?.permissions();
    persist_beside(path, data, Some(permissions), true)?;
    Ok(())
}

/// Copy `src` to `dst` byte-for-byte unless `dst` exists, creating parent
/// directories as needed. Returns true if written.
pub fn copy_if_missing(src: &Path, dst: &Path) -> Result<bool> {
    if dst.exists() {
        return Ok(false);
    }
    let data = std::fs::read(src)?;
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)?;
    }
    persist_beside(dst, &data, None, false)
}
