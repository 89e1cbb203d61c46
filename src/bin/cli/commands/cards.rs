use anyhow::Result;

use flashdeck_lib::deck::{project_all, NormalizedCard};

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, deck_id: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let deck = app.resolve_deck(deck_id)?;
    let cards = project_all(&deck.cards);
    print_cards(&cards, format, use_color)
}

/// Shared by `cards` and `due`
pub fn print_cards(cards: &[NormalizedCard], format: &OutputFormat, use_color: bool) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(cards)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No cards.");
                return Ok(());
            }
            for card in cards {
                println!("{}\n", terminal::render_card(card, use_color));
            }
            println!("{} cards", cards.len());
        }
    }

    Ok(())
}
