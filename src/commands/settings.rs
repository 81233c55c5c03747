//! Get/Set commands - Read and write plist settings

use anyhow::{bail, Result};

use workflow_context::Workflow;

/// Print the value stored under `key`
pub fn get(workflow: &Workflow, file: &str, key: &str) -> Result<String> {
    let file = workflow.locate(file);
    Ok(workflow.get_value(&file, key)?)
}

/// Write `KEY=VALUE` pairs in the order given
pub fn set(workflow: &Workflow, file: &str, pairs: &[String]) -> Result<usize> {
    let values = parse_pairs(pairs)?;
    let file = workflow.locate(file);
    log::info!("Writing {} value(s) to {}", values.len(), file.display());

    let count = values.len();
    workflow.set_values(&file, values);
    Ok(count)
}

fn parse_pairs(pairs: &[String]) -> Result<Vec<(&str, &str)>> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if key.is_empty() => bail!("Empty key in '{}'", pair),
            Some((key, value)) => Ok((key, value)),
            None => bail!("Expected KEY=VALUE, got '{}'", pair),
        })
        .collect()
}
