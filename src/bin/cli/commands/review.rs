use anyhow::{bail, Context, Result};
use chrono::Utc;

use flashdeck_lib::practice::sm2::{format_interval, Sm2Fields};
use flashdeck_lib::practice::{grade, Rating, Sm2Scheduler};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    deck_id: &str,
    card_id: &str,
    rating: u8,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let rating = Rating::try_from(rating)?;
    let (deck, mut store) = app.open_deck(deck_id)?;
    if deck.card(card_id).is_none() {
        bail!("No card '{}' in deck '{}'", card_id, deck.id);
    }

    let state = grade(&mut store, &Sm2Scheduler, card_id, rating, Utc::now())
        .with_context(|| format!("Failed to record review of '{}'", card_id))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        OutputFormat::Plain => {
            let fields = Sm2Fields::from_state(&state);
            let due = state
                .due
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "now".to_string());
            println!(
                "{} next review in {} ({})",
                paint(card_id, Color::BOLD, use_color),
                format_interval(fields.interval),
                due
            );
        }
    }

    Ok(())
}
