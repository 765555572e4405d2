pub mod check;
pub mod play;
pub mod reset;
pub mod status;

use std::path::{Path, PathBuf};

use colored::Colorize;
use tw_story::{StoryError, StoryGraph};

/// The save file used for a story when none is given.
pub fn default_save_path(story: &Path) -> PathBuf {
    story.with_extension("save.json")
}

/// The explicit save path, or the story's default.
fn save_path(story: &Path, save: Option<&Path>) -> PathBuf {
    save.map_or_else(|| default_save_path(story), Path::to_path_buf)
}

/// Load a story file, printing validation problems to stderr.
fn load_story(path: &Path) -> Result<StoryGraph, String> {
    match StoryGraph::from_path(path) {
        Ok(graph) => Ok(graph),
        Err(StoryError::Invalid(issues)) => {
            for issue in &issues {
                eprintln!("  {}", issue.to_string().red());
            }
            Err(format!(
                "'{}' has {} error{}",
                path.display(),
                issues.len(),
                if issues.len() == 1 { "" } else { "s" },
            ))
        }
        Err(e) => Err(format!("cannot load '{}': {e}", path.display())),
    }
}
