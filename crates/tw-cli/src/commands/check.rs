//! `tw check`: validate a story file.

use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

/// Validate a story and print its summary.
pub fn run(story: &Path) -> Result<(), String> {
    let graph = super::load_story(story)?;

    for issue in graph.warnings() {
        eprintln!("  {}", issue.to_string().yellow());
    }

    let stats = graph.stats();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Kind", "Count"]);
    for (kind, count) in [
        ("Nodes", stats.nodes),
        ("Choices", stats.choices),
        ("Conditional choices", stats.conditional_choices),
        ("Free-input nodes", stats.free_input_nodes),
        ("Auto-redirect nodes", stats.auto_redirect_nodes),
        ("Endings", stats.terminal_nodes),
    ] {
        table.add_row(vec![kind.to_string(), count.to_string()]);
    }

    println!("{table}");
    println!();
    println!(
        "  All checks passed for '{}' (start: {}).",
        story.display(),
        graph.start_node().id.bold()
    );
    if !graph.warnings().is_empty() {
        println!("  {} warning(s)", graph.warnings().len());
    }

    Ok(())
}
