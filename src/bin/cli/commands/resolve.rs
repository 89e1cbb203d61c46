use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, deck_id: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let deck = app.resolve_deck(deck_id)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": deck.id,
                "version": deck.version,
                "name": deck.name,
                "description": deck.description,
                "author": deck.author,
                "settings": deck.settings,
                "cardIds": deck.cards.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{} ({} v{})", paint(&deck.name, Color::BOLD, use_color), deck.id, deck.version);
            if let Some(author) = &deck.author {
                println!("by {}", author);
            }
            if let Some(description) = &deck.description {
                println!("{}", paint(description, Color::DIM, use_color));
            }
            println!();
            for card in &deck.cards {
                println!("  {}", card.id);
            }
            println!("\n{} cards total", deck.cards.len());
        }
    }

    Ok(())
}
