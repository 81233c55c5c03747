//! Request command - Fetch a URL

use anyhow::{Context, Result};
use std::time::Duration;

use workflow_context::{RequestOptions, Workflow};

/// Build request options from command-line values
pub fn options(
    method: Option<String>,
    timeout: Option<u64>,
    headers: &[String],
    body: Option<String>,
) -> Result<RequestOptions> {
    let headers = headers
        .iter()
        .map(|header| {
            header
                .split_once(':')
                .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
                .with_context(|| format!("Expected 'Name: value', got '{}'", header))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RequestOptions {
        method,
        timeout: timeout.map(Duration::from_secs),
        headers,
        body,
        ..Default::default()
    })
}

/// Fetch `url` and return the body
pub fn execute(workflow: &Workflow, url: &str, options: &RequestOptions) -> Result<String> {
    workflow
        .http_request(url, options)
        .with_context(|| format!("Request to {} failed", url))
}
