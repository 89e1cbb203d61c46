use anyhow::Result;
use chrono::Utc;

use flashdeck_lib::practice::{due_cards, PracticeMode, PracticeOrder};

use crate::app::App;
use crate::commands::cards::print_cards;
use crate::OutputFormat;

pub fn run(
    app: &App,
    deck_id: &str,
    mode: &str,
    order: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let mode: PracticeMode = mode.parse()?;
    let (deck, store) = app.open_deck(deck_id)?;
    let order = match order {
        Some(order) => order.parse()?,
        None => PracticeOrder::for_deck(&deck),
    };

    let cards = due_cards(&deck, &store, mode, order, Utc::now());
    print_cards(&cards, format, use_color)
}
