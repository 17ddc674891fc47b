//! Reading and writing Waybar's JSON-with-comments config
//!
//! Comments are stripped line by line: everything from `//` to the end of the
//! line is dropped, even inside a string literal. A value such as
//! `"https://example.com"` is therefore truncated. Waybar configs rarely
//! contain `//` inside strings, and the output is written back as plain JSON,
//! so comments do not survive a round-trip.

use anyhow::{Context, Result};
use regex_lite::Regex;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::error::{kind_of, ShapeError};

/// The whole parsed Waybar config
pub type ConfigDocument = Map<String, Value>;

fn line_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)//.*$").expect("valid comment pattern"))
}

/// Remove `//` line comments
pub fn strip_line_comments(raw: &str) -> String {
    line_comment().replace_all(raw, "").into_owned()
}

/// Parse config text (comments allowed) into a document
pub fn parse_document(raw: &str) -> Result<ConfigDocument> {
    let stripped = strip_line_comments(raw);
    let value: Value =
        serde_json::from_str(&stripped).context("Failed to parse Waybar config as JSON")?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ShapeError::NotAnObject {
            found: kind_of(&other),
        }
        .into()),
    }
}

/// Pretty-print a document with two-space indent and a trailing newline
pub fn serialize_document(doc: &ConfigDocument) -> Result<String> {
    let mut out = serde_json::to_string_pretty(doc).context("Failed to serialize config")?;
    out.push('\n');
    Ok(out)
}

/// Read and parse the config at `path`
pub fn load<P: AsRef<Path>>(path: P) -> Result<ConfigDocument> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    parse_document(&raw).with_context(|| format!("Invalid config: {}", path.display()))
}

/// Serialize `doc` and replace the file at `path` with it
///
/// The new content is written to a temporary file next to the target and
/// renamed over it, so the original stays intact if anything fails. A
/// symlinked config is followed and its target rewritten.
pub fn save<P: AsRef<Path>>(path: P, doc: &ConfigDocument) -> Result<PathBuf> {
    let content = serialize_document(doc)?;

    let path = path.as_ref();
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("Failed to create temp file in: {}", dir.display()))?;
    tmp.write_all(content.as_bytes())
        .context("Failed to write temp file")?;

    if let Ok(metadata) = fs::metadata(&target) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .context("Failed to copy permissions")?;
    }

    tmp.persist(&target)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write: {}", target.display()))?;

    Ok(target)
}
