//! Info command - Show the resolved workflow locations

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;

use workflow_context::{Location, Workflow};

/// Render the bundle id, host version and every base location as a table
pub fn execute(workflow: &Workflow) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new("Name"), Cell::new("Value")]);

    let bundle_id = if workflow.is_placeholder_bundle() {
        format!("{} (placeholder)", workflow.bundle_id())
    } else {
        workflow.bundle_id().to_string()
    };
    table.add_row(vec![Cell::new("bundle id"), Cell::new(bundle_id)]);
    table.add_row(vec![
        Cell::new("host version"),
        Cell::new(workflow.host_version()),
    ]);

    for location in Location::ALL {
        let value = match workflow.location(location) {
            Ok(path) => path.display().to_string(),
            Err(e) => e.to_string().red().to_string(),
        };
        table.add_row(vec![Cell::new(location), Cell::new(value)]);
    }

    table.to_string()
}
