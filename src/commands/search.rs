//! Search command - Spotlight metadata search

use workflow_context::Workflow;

/// Run the query and return one path per line
pub fn execute(workflow: &Workflow, query: &str, raw: bool) -> String {
    let results = workflow.metadata_search(query, !raw);
    log::info!("{} result(s) for {}", results.len(), query);
    results.join("\n")
}
