//! CLI frontend for the Taleweaver story engine.

mod commands;
mod tui;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tw",
    about = "Taleweaver: play branching text adventures in the terminal",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a story
    Play {
        /// Story file (JSON)
        story: PathBuf,

        /// Save file (default: the story path with extension `save.json`)
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Line mode: read input lines from stdin and print new lines, no animation
        #[arg(long)]
        plain: bool,

        /// Milliseconds between revealed characters (saved as a setting)
        #[arg(long, value_name = "MS")]
        speed: Option<u64>,

        /// Discard saved progress and start from the beginning
        #[arg(long)]
        fresh: bool,
    },

    /// Load and validate a story file
    Check {
        /// Story file (JSON)
        story: PathBuf,
    },

    /// Show where a saved session stands
    Status {
        /// Story file (JSON)
        story: PathBuf,

        /// Save file (default: the story path with extension `save.json`)
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Forget saved progress for a story (settings are kept)
    Reset {
        /// Story file (JSON)
        story: PathBuf,

        /// Save file (default: the story path with extension `save.json`)
        #[arg(short, long)]
        save: Option<PathBuf>,
    },
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
///
/// The full-screen player only logs when `RUST_LOG` is set explicitly.
fn init_logging(full_screen: bool) {
    if full_screen && std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let full_screen = matches!(cli.command, Commands::Play { plain: false, .. });
    init_logging(full_screen);

    let result = match cli.command {
        Commands::Play {
            story,
            save,
            plain,
            speed,
            fresh,
        } => commands::play::run(
            &story,
            save.as_deref(),
            commands::play::PlayOptions {
                plain,
                speed,
                fresh,
            },
        ),
        Commands::Check { story } => commands::check::run(&story),
        Commands::Status { story, save } => commands::status::run(&story, save.as_deref()),
        Commands::Reset { story, save } => commands::reset::run(&story, save.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
