mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "flashdeck-cli", about = "Flashcard deck resolver and practice CLI", version)]
struct Cli {
    /// Configuration file (default: <config dir>/flashdeck/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory deck ids are resolved against
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a deck and its extensions
    Resolve {
        /// Deck id (path relative to the data directory)
        deck: String,
    },

    /// Show every practice card of a deck
    Cards {
        deck: String,
    },

    /// Show cards due for practice
    Due {
        deck: String,
        /// mixed, review or new
        #[arg(long, default_value = "mixed")]
        mode: String,
        /// standard or random (default: the deck's shuffle setting)
        #[arg(long)]
        order: Option<String>,
    },

    /// Grade a card (1 = again, 2 = hard, 3 = good, 4 = easy)
    Review {
        deck: String,
        card: String,
        rating: u8,
    },

    /// Show the stored scheduling state of a card
    State {
        deck: String,
        card: String,
    },

    /// Show the review log of a card
    History {
        deck: String,
        card: String,
    },

    /// Validate a deck file and copy it into the uploads directory
    Upload {
        /// Deck file to register
        file: PathBuf,
        /// Stored file name (defaults to the source file name)
        #[arg(long)]
        name: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.config.as_deref(), cli.data_dir)?;

    match cli.command {
        Command::Resolve { deck } => {
            commands::resolve::run(&app, &deck, &cli.format, use_color)?;
        }
        Command::Cards { deck } => {
            commands::cards::run(&app, &deck, &cli.format, use_color)?;
        }
        Command::Due { deck, mode, order } => {
            commands::due::run(&app, &deck, &mode, order.as_deref(), &cli.format, use_color)?;
        }
        Command::Review { deck, card, rating } => {
            commands::review::run(&app, &deck, &card, rating, &cli.format, use_color)?;
        }
        Command::State { deck, card } => {
            commands::state::run(&app, &deck, &card, &cli.format)?;
        }
        Command::History { deck, card } => {
            commands::history::run(&app, &deck, &card, &cli.format)?;
        }
        Command::Upload { file, name } => {
            commands::upload::run(&app, &file, name.as_deref(), &cli.format)?;
        }
    }

    Ok(())
}
