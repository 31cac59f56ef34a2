//! Line-oriented rewrite of the `name = "..."` field in `pyproject.toml`.
//!
//! The manifest is never parsed as TOML. Only the quoted value on a single
//! line is replaced; every other byte, including line endings, comments and
//! anything after the closing quote, is written back unchanged.

use crate::error::Result;
use crate::io;
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;

const PROJECT_TABLE: &str = "project";

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| Regex::new(r#"^name\s*=\s*"([^"]*)""#).unwrap())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ManifestOutcome {
    /// The name line was rewritten; `from` is the previous value.
    Renamed { from: String },
    /// The name already matched; the file was not touched.
    Unchanged,
    /// The manifest exists but has no matching `name` line.
    NoNameField,
    /// There is no manifest to rewrite.
    Missing,
}

/// A successful in-memory rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renamed {
    pub content: String,
    pub previous: String,
    /// Zero-based index of the rewritten line.
    pub line: usize,
}

/// Table name of a `[table]` header line, or `None` for any other line.
/// Array-of-tables headers (`[[...]]`) yield the full bracketed header so they
/// never compare equal to a plain table name.
fn table_header(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let array = trimmed.starts_with("[[");
    let (open, close) = if array { ("[[", "]]") } else { ("[", "]") };
    let inner = trimmed.strip_prefix(open)?;
    let end = inner.find(close)?;
    let after = inner[end + close.len()..].trim_start();
    // `["a", "b"],` inside a multi-line array is not a header.
    if !(after.is_empty() || after.starts_with('#')) {
        return None;
    }
    if array {
        Some(&trimmed[..open.len() + end + close.len()])
    } else {
        Some(inner[..end].trim())
    }
}

fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Replace the value of the first `name = "..."` line with `new_name`.
///
/// When the manifest declares a `[project]` table only lines inside that table
/// are considered, so `[tool.*]` sections that also carry a `name` key are left
/// alone. Without a `[project]` table the first match anywhere wins.
pub fn rename(content: &str, new_name: &str) -> Option<Renamed> {
    let has_project_table = content
        .lines()
        .any(|l| table_header(l) == Some(PROJECT_TABLE));

    let mut section: Option<&str> = None;
    let mut out = String::with_capacity(content.len() + new_name.len());
    let mut found: Option<(String, usize)> = None;

    for (idx, line) in content.split_inclusive('\n').enumerate() {
        if found.is_some() {
            out.push_str(line);
            continue;
        }
        if let Some(table) = table_header(line) {
            section = Some(table);
            out.push_str(line);
            continue;
        }
        let in_scope = !has_project_table || section == Some(PROJECT_TABLE);
        let (body, terminator) = split_terminator(line);
        let captures = if in_scope { name_re().captures(body) } else { None };
        match captures.and_then(|c| c.get(1)) {
            Some(value) => {
                out.push_str(&body[..value.start()]);
                out.push_str(new_name);
                out.push_str(&body[value.end()..]);
                out.push_str(terminator);
                found = Some((value.as_str().to_string(), idx));
            }
            None => out.push_str(line),
        }
    }

    found.map(|(previous, line)| Renamed {
        content: out,
        previous,
        line,
    })
}

/// Rewrite the manifest at `path` in place so its project name is `new_name`.
pub fn rewrite(path: &Path, new_name: &str) -> Result<ManifestOutcome> {
    if !path.exists() {
        return Ok(ManifestOutcome::Missing);
    }
    let content = std::fs::read_to_string(path)?;
    let Some(renamed) = rename(&content, new_name) else {
        return Ok(ManifestOutcome::NoNameField);
    };
    if renamed.previous == new_name {
        return Ok(ManifestOutcome::Unchanged);
    }
    io::atomic_rewrite(path, renamed.content.as_bytes())?;
    tracing::debug!(
        path = %path.display(),
        line = renamed.line + 1,
        from = %renamed.previous,
        to = new_name,
        "rewrote manifest name"
    );
    Ok(ManifestOutcome::Renamed {
        from: renamed.previous,
    })
}
