//! `tw reset`: forget saved progress.

use std::path::Path;

use tw_engine::{JsonFileStorage, PersistenceGateway};

/// Delete saved progress. Settings are kept.
pub fn run(story: &Path, save: Option<&Path>) -> Result<(), String> {
    let path = super::save_path(story, save);
    if !path.exists() {
        println!("  No saved progress at '{}'.", path.display());
        return Ok(());
    }

    let storage = JsonFileStorage::open(&path).map_err(|e| e.to_string())?;
    let mut gateway = PersistenceGateway::new(Box::new(storage));
    gateway.clear_session().map_err(|e| e.to_string())?;

    println!("  Cleared saved progress in '{}'.", path.display());
    Ok(())
}
