//! `tw status`: summarize saved progress.

use std::iter;
use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tw_engine::{JsonFileStorage, MemoryStorage, Session, Storage, StorageKey};

/// Print where saved progress stands.
pub fn run(story: &Path, save: Option<&Path>) -> Result<(), String> {
    let graph = super::load_story(story)?;
    let path = super::save_path(story, save);

    // Rebuild from a copy so looking never writes to the save file.
    let file = JsonFileStorage::open(&path).map_err(|e| e.to_string())?;
    let mut snapshot = MemoryStorage::new();
    for key in iter::once(StorageKey::Settings).chain(StorageKey::SESSION) {
        if let Some(value) = file.load(key.as_str()) {
            snapshot
                .save(key.as_str(), value)
                .map_err(|e| e.to_string())?;
        }
    }
    if snapshot.load(StorageKey::VisitedNodes.as_str()).is_none() {
        println!("  No saved progress at '{}'.", path.display());
        return Ok(());
    }

    let mut session = Session::new(graph, snapshot);
    session.start().map_err(|e| e.to_string())?;
    session.settle().map_err(|e| e.to_string())?;

    let player = session.player();
    let node = session
        .current_node()
        .map_or_else(|| "-".to_string(), |n| n.id.clone());

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Name".to_string(), player.name.clone()]);
    table.add_row(vec!["Node".to_string(), node]);
    table.add_row(vec!["Health".to_string(), player.health.to_string()]);
    table.add_row(vec!["Moral points".to_string(), player.moral_points.to_string()]);
    table.add_row(vec!["Inventory".to_string(), list_or_dash(&player.inventory)]);
    table.add_row(vec!["Knowledge".to_string(), list_or_dash(&player.knowledge)]);
    table.add_row(vec![
        "Steps".to_string(),
        session.history().visited_nodes.len().to_string(),
    ]);

    println!("{table}");
    println!("  Save file: {}", path.display().to_string().dimmed());

    Ok(())
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
