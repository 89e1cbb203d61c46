use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, deck_id: &str, card_id: &str, format: &OutputFormat) -> Result<()> {
    let store = app.open_activity(deck_id)?;
    let state = store.card_state(card_id);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        OutputFormat::Plain => {
            let Some(state) = state else {
                println!("{} has not been reviewed.", card_id);
                return Ok(());
            };
            let show = |t: Option<chrono::DateTime<chrono::Utc>>| {
                t.map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".to_string())
            };
            println!("due:         {}", show(state.due));
            println!("last review: {}", show(state.last_review));
            for (key, value) in &state.fields {
                println!("{:<12} {}", format!("{}:", key), value);
            }
        }
    }

    Ok(())
}
