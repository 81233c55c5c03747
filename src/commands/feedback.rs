//! Feedback command - Render a JSON item list as Alfred XML

use anyhow::{Context, Result};
use std::io::Read;

use workflow_context::{ResultsOverride, Workflow};

/// Render items given as JSON, read from stdin when `json` is `None`
pub fn execute(workflow: &Workflow, json: Option<String>) -> Result<String> {
    let json = match json {
        Some(json) => json,
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read items from stdin")?;
            input
        }
    };

    workflow
        .render_xml(Some(ResultsOverride::Json(json)))
        .context("Failed to render feedback")
}
