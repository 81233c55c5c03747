//! Reading and writing workflow files
//!
//! Structured values are stored as JSON. `read_file` sniffs the first byte and
//! hands back parsed JSON when it can, plain text otherwise.

use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Content read from or written to a workflow file
#[derive(Debug, Clone, PartialEq)]
pub enum Contents {
    /// Parsed JSON (read) or a value to encode (write)
    Json(Value),
    /// Raw text
    Text(String),
    /// Raw bytes, written unchanged
    Bytes(Vec<u8>),
}

impl Contents {
    /// Encode for disk: arrays and objects become JSON, everything else is written as-is
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(match self {
            Contents::Json(value @ (Value::Array(_) | Value::Object(_))) => {
                serde_json::to_vec(value)?
            }
            Contents::Json(Value::String(s)) => s.clone().into_bytes(),
            Contents::Json(Value::Null) => Vec::new(),
            Contents::Json(other) => other.to_string().into_bytes(),
            Contents::Text(text) => text.clone().into_bytes(),
            Contents::Bytes(bytes) => bytes.clone(),
        })
    }

    /// Get the parsed JSON value, if this is one
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Contents::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Get the text, if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Contents::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<Value> for Contents {
    fn from(value: Value) -> Self {
        Contents::Json(value)
    }
}

impl From<String> for Contents {
    fn from(text: String) -> Self {
        Contents::Text(text)
    }
}

impl From<&str> for Contents {
    fn from(text: &str) -> Self {
        Contents::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Contents {
    fn from(bytes: Vec<u8>) -> Self {
        Contents::Bytes(bytes)
    }
}

/// Read a file, decoding JSON when the content starts with `{` or `[`
///
/// A failed parse is not an error: the raw text is returned instead.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Contents> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if matches!(bytes.first(), Some(b'{') | Some(b'[')) {
        match serde_json::from_slice(&bytes) {
            Ok(value) => return Ok(Contents::Json(value)),
            Err(e) => log::debug!("{} is not valid JSON ({}), returning text", path.display(), e),
        }
    }

    Ok(Contents::Text(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Write directly to `path`, returning the number of bytes written
///
/// Not crash-safe: an interrupted write leaves a truncated file behind.
pub fn write_file<P: AsRef<Path>>(path: P, data: &Contents) -> Result<usize> {
    let path = path.as_ref();
    let bytes = data.to_bytes()?;

    fs::write(path, &bytes).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(bytes.len())
}

/// Write to `<path>.<suffix>` under an exclusive lock, then rename onto `path`
///
/// On failure `path` is untouched and the temp file stays behind.
pub fn atomic_write<P: AsRef<Path>>(path: P, data: &Contents, suffix: &str) -> Result<usize> {
    atomic_write_with(path.as_ref(), data, suffix, |from, to| fs::rename(from, to))
}

/// Get the temp file `atomic_write` uses for `path`
pub fn temp_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

pub(crate) fn atomic_write_with<F>(
    path: &Path,
    data: &Contents,
    suffix: &str,
    rename: F,
) -> Result<usize>
where
    F: FnOnce(&Path, &Path) -> io::Result<()>,
{
    let bytes = data.to_bytes()?;
    let tmp = temp_path(path, suffix);

    write_locked(&tmp, &bytes).map_err(|source| Error::Write {
        path: tmp.clone(),
        source,
    })?;

    rename(&tmp, path).map_err(|source| Error::Rename {
        from: tmp.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    log::debug!("Atomically wrote {} bytes to {}", bytes.len(), path.display());
    Ok(bytes.len())
}

// Truncate only once the lock is held
fn write_locked(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create(true).open(path)?;
    file.lock()?;
    file.set_len(0)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    file.unlock()
}
