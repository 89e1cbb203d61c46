use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, deck_id: &str, card_id: &str, format: &OutputFormat) -> Result<()> {
    let store = app.open_activity(deck_id)?;
    let log = store.review_log(card_id);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(log)?);
        }
        OutputFormat::Plain => {
            if log.is_empty() {
                println!("No reviews for {}.", card_id);
                return Ok(());
            }

            println!("{:<20} {:<20} Rating", "Reviewed", "Due");
            println!("{} {} {}", "\u{2500}".repeat(20), "\u{2500}".repeat(20), "\u{2500}".repeat(6));
            for entry in log {
                let show = |t: Option<chrono::DateTime<chrono::Utc>>| {
                    t.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "-".to_string())
                };
                let rating = entry
                    .field("rating")
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{:<20} {:<20} {}", show(entry.review), show(entry.due), rating);
            }

            println!("\n{} reviews total", log.len());
        }
    }

    Ok(())
}
