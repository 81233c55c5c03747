//! Read/Write commands - JSON-aware file access

use anyhow::{Context, Result};
use serde_json::Value;

use workflow_context::{Contents, Workflow};

/// Options for the write command
pub struct WriteOptions<'a> {
    /// Parse the data as JSON before writing
    pub json: bool,
    /// Write through a temp file and rename
    pub atomic: bool,
    /// Temp file suffix for atomic writes
    pub suffix: Option<&'a str>,
}

/// Read a file; JSON is pretty-printed, anything else is returned as-is
pub fn read(workflow: &Workflow, file: &str) -> Result<String> {
    let path = workflow.locate(file);
    match workflow.read_file(&path)? {
        Contents::Json(value) => Ok(serde_json::to_string_pretty(&value)?),
        Contents::Text(text) => Ok(text),
        Contents::Bytes(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

/// Write `data` to a file and return the number of bytes written
pub fn write(workflow: &Workflow, file: &str, data: &str, options: &WriteOptions) -> Result<usize> {
    let path = workflow.locate(file);
    let contents = if options.json {
        let value: Value = serde_json::from_str(data).context("Data is not valid JSON")?;
        Contents::Json(value)
    } else {
        Contents::Text(data.to_string())
    };

    let written = if options.atomic {
        workflow.atomic_write(&path, contents, options.suffix)?
    } else {
        workflow.write_file(&path, contents)?
    };
    log::info!("Wrote {} bytes to {}", written, path.display());
    Ok(written)
}
