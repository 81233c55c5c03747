//! Key/value settings backed by plist files
//!
//! The real store shells out to `defaults read` / `defaults write`. Each
//! argument is quoted individually, and the tool's error output is discarded,
//! so a failed read cannot be told apart from a missing key.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config;
use crate::error::{Error, Result};
use crate::shell;

/// Narrow interface to an external settings store
pub trait SettingsStore {
    /// Read the value of `key` in `file`
    fn get(&self, file: &Path, key: &str) -> Result<String>;

    /// Write `value` under `key` in `file`. Failures are not observable.
    fn set(&self, file: &Path, key: &str, value: &str);
}

/// Settings store backed by the `defaults` command
#[derive(Debug, Clone)]
pub struct DefaultsStore {
    tool: String,
}

impl DefaultsStore {
    /// Use `tool` instead of `defaults`. It receives `read`/`write` as its first argument.
    pub fn with_tool(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }

    fn read_command(&self, file: &Path, key: &str) -> String {
        shell::command_line(
            &self.tool,
            [
                "read".to_string(),
                shell::escape_arg(&file.to_string_lossy()),
                shell::escape_arg(key),
            ],
        )
    }

    fn write_command(&self, file: &Path, key: &str, value: &str) -> String {
        shell::command_line(
            &self.tool,
            [
                "write".to_string(),
                shell::escape_arg(&file.to_string_lossy()),
                shell::escape_arg(key),
                shell::escape_arg(value),
            ],
        )
    }
}

impl Default for DefaultsStore {
    fn default() -> Self {
        Self::with_tool(config::SETTINGS_TOOL)
    }
}

impl SettingsStore for DefaultsStore {
    fn get(&self, file: &Path, key: &str) -> Result<String> {
        shell::run_lines(&self.read_command(file, key))
            .into_iter()
            .next()
            .ok_or_else(|| Error::KeyNotFound {
                file: file.to_path_buf(),
                key: key.to_string(),
            })
    }

    fn set(&self, file: &Path, key: &str, value: &str) {
        shell::run_quiet(&self.write_command(file, key, value));
    }
}

/// A single write seen by a [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    pub file: PathBuf,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    values: BTreeMap<(PathBuf, String), String>,
    writes: Vec<Write>,
    read_only: bool,
}

/// In-memory settings store for tests and dry runs
///
/// Clones share the same state, so a test can keep one handle while the
/// workflow owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that records writes but never persists them, like a read-only plist
    pub fn read_only() -> Self {
        let store = Self::default();
        store.state.borrow_mut().read_only = true;
        store
    }

    /// Seed a value without recording a write
    pub fn insert(&self, file: impl Into<PathBuf>, key: &str, value: &str) {
        self.state
            .borrow_mut()
            .values
            .insert((file.into(), key.to_string()), value.to_string());
    }

    /// Every write attempted so far, in order
    pub fn writes(&self) -> Vec<Write> {
        self.state.borrow().writes.clone()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, file: &Path, key: &str) -> Result<String> {
        self.state
            .borrow()
            .values
            .get(&(file.to_path_buf(), key.to_string()))
            .map(|v| v.lines().next().unwrap_or("").trim_end().to_string())
            .ok_or_else(|| Error::KeyNotFound {
                file: file.to_path_buf(),
                key: key.to_string(),
            })
    }

    fn set(&self, file: &Path, key: &str, value: &str) {
        let mut state = self.state.borrow_mut();
        state.writes.push(Write {
            file: file.to_path_buf(),
            key: key.to_string(),
            value: value.to_string(),
        });
        if !state.read_only {
            state
                .values
                .insert((file.to_path_buf(), key.to_string()), value.to_string());
        }
    }
}
